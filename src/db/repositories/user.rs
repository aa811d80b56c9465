use anyhow::{Context, Result};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::domain::Identity;
use crate::entities::users;

/// User data returned from the repository; the key is only shown at creation.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub is_admin: bool,
    pub created_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            is_admin: model.is_admin,
            created_at: model.created_at,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Resolve an API key to the identity the core trusts.
    pub async fn identity_for_api_key(&self, api_key: &str) -> Result<Option<Identity>> {
        let user = users::Entity::find()
            .filter(users::Column::ApiKey.eq(api_key))
            .one(&self.conn)
            .await
            .context("Failed to query user by API key")?;

        Ok(user.map(|u| Identity {
            user_id: u.id,
            is_admin: u.is_admin,
        }))
    }

    /// Create a user with a freshly generated API key. Returns the user and the key.
    pub async fn create(&self, username: &str, is_admin: bool) -> Result<(User, String)> {
        let api_key = uuid::Uuid::new_v4().simple().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        let active = users::ActiveModel {
            username: Set(username.to_string()),
            api_key: Set(api_key.clone()),
            is_admin: Set(is_admin),
            created_at: Set(now),
            ..Default::default()
        };

        let model = users::Entity::insert(active)
            .exec_with_returning(&self.conn)
            .await
            .with_context(|| format!("Failed to create user {username}"))?;

        Ok((User::from(model), api_key))
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let users = users::Entity::find()
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        Ok(users.into_iter().map(User::from).collect())
    }
}
