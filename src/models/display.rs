use serde::{Deserialize, Serialize};

use crate::entities::{display_episodes, display_titles, episodes, titles};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayEpisodeInput {
    pub season: i32,
    pub episode_number: i32,
    pub description: String,
    pub link: String,
    #[serde(default)]
    pub extra_link1: Option<String>,
    #[serde(default)]
    pub extra_link2: Option<String>,
    #[serde(default)]
    pub extra_link3: Option<String>,
}

impl DisplayEpisodeInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.season < 0 || self.episode_number < 0 {
            return Err(format!(
                "Invalid display episode S{}E{}",
                self.season, self.episode_number
            ));
        }
        if self.link.trim().is_empty() {
            return Err(format!(
                "Display episode S{}E{} is missing a link",
                self.season, self.episode_number
            ));
        }
        Ok(())
    }
}

/// Full payload of one mirror sync call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySync {
    pub name: String,
    #[serde(default)]
    pub episodes: Vec<DisplayEpisodeInput>,
}

impl DisplaySync {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Display name is required".to_string());
        }
        self.episodes
            .iter()
            .try_for_each(DisplayEpisodeInput::validate)
    }
}

impl DisplaySync {
    /// Recomputes a mirror entry from canonical catalog rows.
    ///
    /// Episode names become descriptions; extra links are left empty.
    #[must_use]
    pub fn from_catalog(title: &titles::Model, episodes: &[episodes::Model]) -> Self {
        Self {
            name: title.name.clone(),
            episodes: episodes
                .iter()
                .map(|ep| DisplayEpisodeInput {
                    season: ep.season,
                    episode_number: ep.number,
                    description: ep.name.clone(),
                    link: ep.link.clone(),
                    extra_link1: None,
                    extra_link2: None,
                    extra_link3: None,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayEpisode {
    pub id: i32,
    pub title_id: i32,
    pub season: i32,
    pub episode_number: i32,
    pub description: String,
    pub link: String,
    pub extra_link1: Option<String>,
    pub extra_link2: Option<String>,
    pub extra_link3: Option<String>,
}

impl From<display_episodes::Model> for DisplayEpisode {
    fn from(m: display_episodes::Model) -> Self {
        Self {
            id: m.id,
            title_id: m.title_id,
            season: m.season,
            episode_number: m.episode_number,
            description: m.description,
            link: m.link,
            extra_link1: m.extra_link1,
            extra_link2: m.extra_link2,
            extra_link3: m.extra_link3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayTitle {
    pub title_id: i32,
    pub name: String,
    pub updated_at: String,
    pub episodes: Vec<DisplayEpisode>,
}

impl DisplayTitle {
    pub(crate) fn from_parts(
        model: display_titles::Model,
        episodes: Vec<display_episodes::Model>,
    ) -> Self {
        Self {
            title_id: model.title_id,
            name: model.name,
            updated_at: model.updated_at,
            episodes: episodes.into_iter().map(DisplayEpisode::from).collect(),
        }
    }
}
