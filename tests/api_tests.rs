use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use kuroneko::config::Config;
use kuroneko::db::migrator::DEFAULT_API_KEY;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

async fn spawn_app() -> (Arc<kuroneko::api::AppState>, Router) {
    let db_path =
        std::env::temp_dir().join(format!("kuroneko-api-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    let state = kuroneko::api::create_app_state_from_config(config, None)
        .await
        .expect("failed to create app state");
    let router = kuroneko::api::router(state.clone());
    (state, router)
}

fn request(method: &str, uri: &str, key: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = key {
        builder = builder.header("X-Api-Key", key);
    }
    match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_auth_endpoints() {
    let (_, app) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(request("GET", "/api/titles", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(request("GET", "/api/titles", Some("wrong-key"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
    assert!(body.get("data").is_none_or(Value::is_null));

    let response = app
        .clone()
        .oneshot(request("GET", "/api/titles", Some(DEFAULT_API_KEY), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/titles")
                .header("Authorization", format!("Bearer {DEFAULT_API_KEY}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_is_public() {
    let (_, app) = spawn_app().await;

    let response = app
        .oneshot(request("GET", "/api/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], true);
}

#[tokio::test]
async fn test_title_lifecycle() {
    let (_, app) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/titles",
            Some(DEFAULT_API_KEY),
            Some(json!({
                "name": "Serial Experiments Lain",
                "release_year": 1998,
                "genres": ["psychological"],
                "episodes": [
                    {"season": 1, "number": 1, "name": "Weird", "link": "https://cdn.example/1"},
                    {"season": 1, "number": 2, "name": "Girls", "link": "https://cdn.example/2", "alert": true}
                ]
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["data"]["id"], 1);

    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            "/api/titles/1",
            Some(DEFAULT_API_KEY),
            Some(json!({
                "name": "Lain",
                "new_id": 7,
                "episodes": [
                    {"season": 1, "number": 1, "name": "Weird", "link": "https://cdn.example/1"}
                ],
                "display": {
                    "name": "Lain",
                    "episodes": [
                        {"season": 1, "episode_number": 1, "description": "Weird", "link": "https://mirror.example/1"}
                    ]
                }
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["id"], 7);
    assert_eq!(body["data"]["episodes"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["display"]["title_id"], 7);

    let response = app
        .clone()
        .oneshot(request("GET", "/api/titles/1", Some(DEFAULT_API_KEY), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/titles/7/views",
            Some(DEFAULT_API_KEY),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["views"], 1);

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            "/api/display/7/episodes/1/next",
            Some(DEFAULT_API_KEY),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(json_body(response).await["data"].is_null());

    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            "/api/titles/7",
            Some(DEFAULT_API_KEY),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(request("GET", "/api/display/7", Some(DEFAULT_API_KEY), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_failed_insert_hides_database_detail() {
    let (_, app) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/titles",
            Some(DEFAULT_API_KEY),
            Some(json!({
                "name": "Duplicated",
                "episodes": [
                    {"season": 1, "number": 1, "name": "A", "link": "https://cdn.example/a"},
                    {"season": 1, "number": 1, "name": "B", "link": "https://cdn.example/b"}
                ]
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "The operation could not be completed");

    let response = app
        .oneshot(request("GET", "/api/titles", Some(DEFAULT_API_KEY), None))
        .await
        .unwrap();
    assert_eq!(
        json_body(response).await["data"].as_array().unwrap().len(),
        0
    );
}

#[tokio::test]
async fn test_validation_errors_are_bad_requests() {
    let (_, app) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/titles",
            Some(DEFAULT_API_KEY),
            Some(json!({"name": "   "})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(request("GET", "/api/titles/0", Some(DEFAULT_API_KEY), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(request(
            "GET",
            "/api/display/1/episodes/1/sideways",
            Some(DEFAULT_API_KEY),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_admin_can_read_and_collect_but_not_write_catalog() {
    let (state, app) = spawn_app().await;
    let (_, viewer_key) = state.store().create_user("viewer", false).await.unwrap();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/titles",
            Some(DEFAULT_API_KEY),
            Some(json!({"name": "Ergo Proxy"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/titles",
            Some(&viewer_key),
            Some(json!({"name": "Not allowed"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(request("DELETE", "/api/display", Some(&viewer_key), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(request("GET", "/api/titles/1", Some(&viewer_key), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            "/api/collection",
            Some(&viewer_key),
            Some(json!({"title_id": 1, "status": "watching", "last_watched_episode": 2})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["status"], "watching");
    assert_eq!(body["data"]["title"]["name"], "Ergo Proxy");

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            "/api/collection?status=watching",
            Some(&viewer_key),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await["data"].as_array().unwrap().len(),
        1
    );

    let response = app
        .oneshot(request("GET", "/api/collection", Some(DEFAULT_API_KEY), None))
        .await
        .unwrap();
    assert_eq!(
        json_body(response).await["data"].as_array().unwrap().len(),
        0
    );
}
