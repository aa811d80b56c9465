use serde::{Deserialize, Serialize};

use crate::entities::collection_entries;
use crate::models::title::TitleSummary;

/// Upsert request; the user id comes from the authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionEntryInput {
    pub title_id: i32,
    pub status: String,
    #[serde(default)]
    pub last_watched_episode: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CollectionEntryInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.title_id <= 0 {
            return Err(format!("Invalid title ID: {}", self.title_id));
        }
        if self.status.trim().is_empty() {
            return Err("Collection status is required".to_string());
        }
        if let Some(ep) = self.last_watched_episode
            && ep < 0
        {
            return Err(format!("Invalid last watched episode: {ep}"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionEntry {
    pub user_id: i32,
    pub title_id: i32,
    pub status: String,
    pub last_watched_episode: Option<i32>,
    pub notes: Option<String>,
    pub added_at: String,
    pub status_changed_at: String,
}

impl From<collection_entries::Model> for CollectionEntry {
    fn from(m: collection_entries::Model) -> Self {
        Self {
            user_id: m.user_id,
            title_id: m.title_id,
            status: m.status,
            last_watched_episode: m.last_watched_episode,
            notes: m.notes,
            added_at: m.added_at,
            status_changed_at: m.status_changed_at,
        }
    }
}

/// A collection entry merged with a summary of the title it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionEntryView {
    #[serde(flatten)]
    pub entry: CollectionEntry,
    pub title: TitleSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(status: &str) -> CollectionEntryInput {
        CollectionEntryInput {
            title_id: 1,
            status: status.to_string(),
            last_watched_episode: None,
            notes: None,
        }
    }

    #[test]
    fn status_is_required() {
        assert!(input("watching").validate().is_ok());
        assert!(input("").validate().is_err());
        assert!(input("  ").validate().is_err());
    }

    #[test]
    fn title_id_must_be_positive() {
        let mut i = input("watching");
        i.title_id = 0;
        assert!(i.validate().is_err());
    }
}
