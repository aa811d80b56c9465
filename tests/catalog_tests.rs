//! Catalog write pipeline against a real SQLite file.

use kuroneko::config::Config;
use kuroneko::db::Store;
use kuroneko::domain::{EpisodeWriteMode, Identity, TitleId};
use kuroneko::models::collection::CollectionEntryInput;
use kuroneko::models::display::{DisplayEpisodeInput, DisplaySync};
use kuroneko::models::title::{EpisodeInput, NewTitle, TitleInput, TitleUpdate};
use kuroneko::services::CatalogError;
use kuroneko::state::SharedState;

async fn spawn_state(mode: EpisodeWriteMode) -> SharedState {
    let db_path =
        std::env::temp_dir().join(format!("kuroneko-catalog-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.catalog.episode_write_mode = mode;

    let store = Store::new(&config.general.database_path)
        .await
        .expect("failed to open store");
    SharedState::with_store(config, store)
}

fn episode(season: i32, number: i32) -> EpisodeInput {
    EpisodeInput {
        season,
        number,
        name: format!("Episode {number}"),
        link: format!("https://cdn.example/{season}/{number}.m3u8"),
        cover_image: None,
        alert: false,
    }
}

fn new_title(name: &str, episodes: Vec<EpisodeInput>) -> NewTitle {
    NewTitle {
        title: TitleInput {
            name: name.to_string(),
            ..Default::default()
        },
        episodes,
    }
}

fn update(name: &str, new_id: Option<i32>, episodes: Vec<EpisodeInput>) -> TitleUpdate {
    TitleUpdate {
        title: TitleInput {
            name: name.to_string(),
            ..Default::default()
        },
        new_id: new_id.map(TitleId::new),
        episodes,
    }
}

#[tokio::test]
async fn insert_assigns_sequential_ids_starting_at_one() {
    let state = spawn_state(EpisodeWriteMode::Replace).await;

    let first = state
        .catalog
        .insert_title(&new_title("Serial Experiments Lain", vec![episode(1, 1)]))
        .await
        .unwrap();
    assert_eq!(first, TitleId::new(1));

    let second = state
        .catalog
        .insert_title(&new_title("Ergo Proxy", vec![]))
        .await
        .unwrap();
    assert_eq!(second, TitleId::new(2));

    let details = state.catalog.get_title(first).await.unwrap();
    assert_eq!(details.title.name, "Serial Experiments Lain");
    assert_eq!(details.title.views, 0);
    assert_eq!(details.episodes.len(), 1);
}

#[tokio::test]
async fn insert_continues_after_highest_id() {
    let state = spawn_state(EpisodeWriteMode::Replace).await;

    for name in ["A", "B", "C"] {
        state
            .catalog
            .insert_title(&new_title(name, vec![]))
            .await
            .unwrap();
    }
    state
        .catalog
        .update_title(TitleId::new(3), &update("C", Some(9), vec![]))
        .await
        .unwrap();

    let id = state
        .catalog
        .insert_title(&new_title("D", vec![]))
        .await
        .unwrap();
    assert_eq!(id, TitleId::new(10));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_inserts_all_get_distinct_ids() {
    let state = spawn_state(EpisodeWriteMode::Replace).await;

    let handles: Vec<_> = (1..=8)
        .map(|n| {
            let state = state.clone();
            tokio::spawn(async move {
                state
                    .catalog
                    .insert_title(&new_title(
                        &format!("Title {n}"),
                        vec![episode(1, 1), episode(1, 2)],
                    ))
                    .await
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().value());
    }
    ids.sort_unstable();
    assert_eq!(ids, (1..=8).collect::<Vec<_>>());

    let titles = state.catalog.list_titles().await.unwrap();
    assert_eq!(titles.len(), 8);
    for id in ids {
        let details = state.catalog.get_title(TitleId::new(id)).await.unwrap();
        assert_eq!(details.episodes.len(), 2);
    }
}

#[tokio::test]
async fn insert_after_highest_possible_id_fails_cleanly() {
    let state = spawn_state(EpisodeWriteMode::Replace).await;

    let id = state
        .catalog
        .insert_title(&new_title("Kemonozume", vec![]))
        .await
        .unwrap();
    state
        .catalog
        .update_title(id, &update("Kemonozume", Some(i32::MAX), vec![]))
        .await
        .unwrap();

    let err = state
        .catalog
        .insert_title(&new_title("Mind Game", vec![episode(1, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::TransactionFailure(_)));

    let titles = state.catalog.list_titles().await.unwrap();
    assert_eq!(titles.len(), 1);
    assert!(state.catalog.get_title(TitleId::new(i32::MAX)).await.is_ok());
}

#[tokio::test]
async fn episodes_come_back_unchanged_in_season_order() {
    let state = spawn_state(EpisodeWriteMode::Replace).await;

    let mut finale = episode(2, 1);
    finale.cover_image = Some("https://img.example/2-1.webp".to_string());
    finale.alert = true;
    let mut second = episode(1, 2);
    second.name = "Chapter Two".to_string();
    second.cover_image = Some("https://img.example/1-2.webp".to_string());
    let first = episode(1, 1);

    let id = state
        .catalog
        .insert_title(&new_title(
            "Paranoia Agent",
            vec![finale.clone(), second.clone(), first.clone()],
        ))
        .await
        .unwrap();

    let details = state.catalog.get_title(id).await.unwrap();
    let stored: Vec<_> = details
        .episodes
        .iter()
        .map(|ep| {
            (
                ep.title_id,
                ep.season,
                ep.number,
                ep.name.clone(),
                ep.link.clone(),
                ep.cover_image.clone(),
                ep.alert,
            )
        })
        .collect();
    let expected: Vec<_> = [first, second, finale]
        .into_iter()
        .map(|ep| {
            (
                id.value(),
                ep.season,
                ep.number,
                ep.name,
                ep.link,
                ep.cover_image,
                ep.alert,
            )
        })
        .collect();
    assert_eq!(stored, expected);
}

#[tokio::test]
async fn duplicate_episode_rolls_back_whole_insert() {
    let state = spawn_state(EpisodeWriteMode::Replace).await;

    let err = state
        .catalog
        .insert_title(&new_title(
            "Planetes",
            vec![episode(1, 1), episode(1, 2), episode(1, 2)],
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::TransactionFailure(_)));

    assert!(state.catalog.list_titles().await.unwrap().is_empty());
    assert!(matches!(
        state.catalog.get_title(TitleId::new(1)).await,
        Err(CatalogError::NotFound(_))
    ));

    let id = state
        .catalog
        .insert_title(&new_title("Planetes", vec![episode(1, 1)]))
        .await
        .unwrap();
    assert_eq!(id, TitleId::new(1));
}

#[tokio::test]
async fn invalid_insert_is_rejected_before_writing() {
    let state = spawn_state(EpisodeWriteMode::Replace).await;

    let err = state
        .catalog
        .insert_title(&new_title("  ", vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));
    assert!(state.catalog.list_titles().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_moves_title_and_dependents_to_new_id() {
    let state = spawn_state(EpisodeWriteMode::Replace).await;
    let identity = Identity {
        user_id: 1,
        is_admin: true,
    };

    for name in ["One", "Two", "Three", "Four", "Five"] {
        state
            .catalog
            .insert_title(&new_title(name, vec![episode(1, 1), episode(1, 2)]))
            .await
            .unwrap();
    }
    let original = TitleId::new(5);

    state
        .collection
        .upsert_entry(
            &identity,
            &CollectionEntryInput {
                title_id: 5,
                status: "watching".to_string(),
                last_watched_episode: Some(1),
                notes: None,
            },
        )
        .await
        .unwrap();
    state
        .display
        .upsert_display_title(
            original,
            &DisplaySync {
                name: "Five".to_string(),
                episodes: vec![],
            },
        )
        .await
        .unwrap();

    let details = state
        .catalog
        .update_title(
            original,
            &update("Five (2nd cut)", Some(7), vec![episode(1, 1)]),
        )
        .await
        .unwrap();
    assert_eq!(details.title.id, 7);
    assert_eq!(details.title.name, "Five (2nd cut)");
    assert_eq!(details.episodes.len(), 1);
    assert!(details.episodes.iter().all(|ep| ep.title_id == 7));

    let moved = state.catalog.get_title(TitleId::new(7)).await.unwrap();
    assert_eq!(moved.episodes.len(), 1);
    assert_eq!((moved.episodes[0].season, moved.episodes[0].number), (1, 1));

    assert!(matches!(
        state.catalog.get_title(original).await,
        Err(CatalogError::NotFound(_))
    ));

    let entries = state.collection.list_entries(&identity, None).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entry.title_id, 7);
    assert_eq!(entries[0].title.name, "Five (2nd cut)");

    let mirror = state
        .display
        .get_display_title(TitleId::new(7))
        .await
        .unwrap();
    assert_eq!(mirror.name, "Five");
}

#[tokio::test]
async fn update_onto_taken_id_leaves_everything_unchanged() {
    let state = spawn_state(EpisodeWriteMode::Replace).await;

    state
        .catalog
        .insert_title(&new_title("Kaiba", vec![episode(1, 1)]))
        .await
        .unwrap();
    state
        .catalog
        .insert_title(&new_title("Dennou Coil", vec![]))
        .await
        .unwrap();

    let err = state
        .catalog
        .update_title(TitleId::new(1), &update("Kaiba", Some(2), vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::TransactionFailure(_)));

    let kaiba = state.catalog.get_title(TitleId::new(1)).await.unwrap();
    assert_eq!(kaiba.episodes.len(), 1);
}

#[tokio::test]
async fn update_of_missing_title_is_not_found() {
    let state = spawn_state(EpisodeWriteMode::Replace).await;

    let err = state
        .catalog
        .update_title(TitleId::new(42), &update("Ghost", None, vec![episode(1, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
    assert!(state.catalog.list_titles().await.unwrap().is_empty());
}

async fn rewrite_episodes(mode: EpisodeWriteMode) -> Vec<(i32, i32, String)> {
    let state = spawn_state(mode).await;
    let id = state
        .catalog
        .insert_title(&new_title(
            "Mononoke",
            vec![episode(1, 1), episode(1, 2), episode(1, 3)],
        ))
        .await
        .unwrap();

    let mut renamed = episode(1, 2);
    renamed.name = "Nue".to_string();
    let details = state
        .catalog
        .update_title(
            id,
            &update("Mononoke", None, vec![renamed, episode(1, 4), episode(2, 1)]),
        )
        .await
        .unwrap();

    details
        .episodes
        .into_iter()
        .map(|ep| (ep.season, ep.number, ep.name))
        .collect()
}

#[tokio::test]
async fn replace_and_diff_modes_store_the_same_episode_set() {
    let replaced = rewrite_episodes(EpisodeWriteMode::Replace).await;
    let diffed = rewrite_episodes(EpisodeWriteMode::Diff).await;

    assert_eq!(replaced, diffed);
    assert_eq!(
        replaced,
        vec![
            (1, 2, "Nue".to_string()),
            (1, 4, "Episode 4".to_string()),
            (2, 1, "Episode 1".to_string()),
        ]
    );
}

#[tokio::test]
async fn diff_mode_keeps_row_ids_of_matched_episodes() {
    let state = spawn_state(EpisodeWriteMode::Diff).await;
    let id = state
        .catalog
        .insert_title(&new_title("Shinsekai Yori", vec![episode(1, 1), episode(1, 2)]))
        .await
        .unwrap();
    let before = state.catalog.get_title(id).await.unwrap();

    let after = state
        .catalog
        .update_title(id, &update("Shinsekai Yori", None, vec![episode(1, 1), episode(1, 2)]))
        .await
        .unwrap();

    let ids = |eps: &[kuroneko::models::title::Episode]| eps.iter().map(|e| e.id).collect::<Vec<_>>();
    assert_eq!(ids(&before.episodes), ids(&after.episodes));
}

#[tokio::test]
async fn update_with_display_rolls_back_both_on_failure() {
    let state = spawn_state(EpisodeWriteMode::Replace).await;
    let id = state
        .catalog
        .insert_title(&new_title("Akagi", vec![episode(1, 1)]))
        .await
        .unwrap();

    let sync = DisplaySync {
        name: "Akagi".to_string(),
        episodes: vec![DisplayEpisodeInput {
            season: 1,
            episode_number: 1,
            description: "Mahjong".to_string(),
            link: "https://mirror.example/1".to_string(),
            extra_link1: None,
            extra_link2: None,
            extra_link3: None,
        }],
    };

    let err = state
        .catalog
        .update_title_with_display(
            id,
            &update("Akagi: renamed", None, vec![episode(1, 1), episode(1, 1)]),
            &sync,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::TransactionFailure(_)));

    let details = state.catalog.get_title(id).await.unwrap();
    assert_eq!(details.title.name, "Akagi");
    assert!(matches!(
        state.display.get_display_title(id).await,
        Err(CatalogError::NotFound(_))
    ));

    let (details, mirror) = state
        .catalog
        .update_title_with_display(id, &update("Akagi: renamed", None, vec![episode(1, 1)]), &sync)
        .await
        .unwrap();
    assert_eq!(details.title.name, "Akagi: renamed");
    assert_eq!(mirror.episodes.len(), 1);
}

#[tokio::test]
async fn delete_removes_dependents() {
    let state = spawn_state(EpisodeWriteMode::Replace).await;
    let identity = Identity {
        user_id: 1,
        is_admin: true,
    };
    let id = state
        .catalog
        .insert_title(&new_title("Haibane Renmei", vec![episode(1, 1)]))
        .await
        .unwrap();
    state.display.rebuild_from_catalog(id).await.unwrap();
    state
        .collection
        .upsert_entry(
            &identity,
            &CollectionEntryInput {
                title_id: id.value(),
                status: "completed".to_string(),
                last_watched_episode: None,
                notes: None,
            },
        )
        .await
        .unwrap();

    state.catalog.delete_title(id).await.unwrap();

    assert!(state.catalog.list_titles().await.unwrap().is_empty());
    assert!(state.display.get_display_title(id).await.is_err());
    assert!(
        state
            .collection
            .list_entries(&identity, None)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(matches!(
        state.catalog.delete_title(id).await,
        Err(CatalogError::NotFound(_))
    ));
}

#[tokio::test]
async fn record_view_counts_up() {
    let state = spawn_state(EpisodeWriteMode::Replace).await;
    let id = state
        .catalog
        .insert_title(&new_title("Texhnolyze", vec![]))
        .await
        .unwrap();

    assert_eq!(state.catalog.record_view(id).await.unwrap(), 1);
    assert_eq!(state.catalog.record_view(id).await.unwrap(), 2);
    assert!(matches!(
        state.catalog.record_view(TitleId::new(99)).await,
        Err(CatalogError::NotFound(_))
    ));
}
