use serde::{Deserialize, Serialize};

use crate::domain::TitleId;
use crate::entities::{episodes, titles};

/// Caller-supplied title fields for insert and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleInput {
    pub name: String,
    #[serde(default)]
    pub alt_name: Option<String>,
    #[serde(default)]
    pub seal: Option<String>,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub seasons: Option<i32>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub ova_notes: Option<String>,
    #[serde(default)]
    pub studio: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub media_type: Option<String>,
}

impl TitleInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Title name is required".to_string());
        }
        if let Some(seasons) = self.seasons
            && seasons < 0
        {
            return Err(format!("Invalid season count: {seasons}"));
        }
        if self.genres.iter().any(|g| g.trim().is_empty()) {
            return Err("Genre tags cannot be empty".to_string());
        }
        Ok(())
    }

    pub(crate) fn genres_json(&self) -> String {
        serde_json::to_string(&self.genres).unwrap_or_else(|_| "[]".to_string())
    }
}

/// One episode as supplied by an insert or update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeInput {
    pub season: i32,
    pub number: i32,
    pub name: String,
    pub link: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub alert: bool,
}

impl EpisodeInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.season < 0 {
            return Err(format!("Invalid season: {}", self.season));
        }
        if self.number < 0 {
            return Err(format!("Invalid episode number: {}", self.number));
        }
        if self.name.trim().is_empty() {
            return Err(format!(
                "Episode S{}E{} is missing a name",
                self.season, self.number
            ));
        }
        if self.link.trim().is_empty() {
            return Err(format!(
                "Episode S{}E{} is missing a link",
                self.season, self.number
            ));
        }
        Ok(())
    }
}

/// Validates a full title write before any transaction is opened.
pub fn validate_title_write(title: &TitleInput, episodes: &[EpisodeInput]) -> Result<(), String> {
    title.validate()?;
    episodes.iter().try_for_each(EpisodeInput::validate)
}

/// Insert request: the title fields with its initial episode list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTitle {
    #[serde(flatten)]
    pub title: TitleInput,
    #[serde(default)]
    pub episodes: Vec<EpisodeInput>,
}

/// Update request. `new_id` moves the title to another id; `episodes`
/// is the complete resulting episode set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleUpdate {
    #[serde(flatten)]
    pub title: TitleInput,
    #[serde(default)]
    pub new_id: Option<TitleId>,
    #[serde(default)]
    pub episodes: Vec<EpisodeInput>,
}

impl TitleUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(id) = self.new_id
            && id.value() <= 0
        {
            return Err(format!("Invalid new title ID: {id}"));
        }
        validate_title_write(&self.title, &self.episodes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Title {
    pub id: i32,
    pub name: String,
    pub alt_name: Option<String>,
    pub seal: Option<String>,
    pub synopsis: Option<String>,
    pub rating: Option<String>,
    pub status: Option<String>,
    pub seasons: Option<i32>,
    pub release_year: Option<i32>,
    pub posted_at: String,
    pub ova_notes: Option<String>,
    pub studio: Option<String>,
    pub director: Option<String>,
    pub genres: Vec<String>,
    pub media_type: Option<String>,
    pub views: i64,
}

impl From<titles::Model> for Title {
    fn from(m: titles::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            alt_name: m.alt_name,
            seal: m.seal,
            synopsis: m.synopsis,
            rating: m.rating,
            status: m.status,
            seasons: m.seasons,
            release_year: m.release_year,
            posted_at: m.posted_at,
            ova_notes: m.ova_notes,
            studio: m.studio,
            director: m.director,
            genres: serde_json::from_str(&m.genres).unwrap_or_default(),
            media_type: m.media_type,
            views: m.views,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Episode {
    pub id: i32,
    pub title_id: i32,
    pub season: i32,
    pub number: i32,
    pub name: String,
    pub link: String,
    pub cover_image: Option<String>,
    pub alert: bool,
    pub released_at: String,
}

impl From<episodes::Model> for Episode {
    fn from(m: episodes::Model) -> Self {
        Self {
            id: m.id,
            title_id: m.title_id,
            season: m.season,
            number: m.number,
            name: m.name,
            link: m.link,
            cover_image: m.cover_image,
            alert: m.alert,
            released_at: m.released_at,
        }
    }
}

/// A title together with its episodes ordered by season, then number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleDetails {
    #[serde(flatten)]
    pub title: Title,
    pub episodes: Vec<Episode>,
}

/// Short form of a title embedded in listings and collection entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleSummary {
    pub id: i32,
    pub name: String,
    pub alt_name: Option<String>,
    pub media_type: Option<String>,
    pub release_year: Option<i32>,
    pub views: i64,
}

impl From<titles::Model> for TitleSummary {
    fn from(m: titles::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            alt_name: m.alt_name,
            media_type: m.media_type,
            release_year: m.release_year,
            views: m.views,
        }
    }
}

/// An episode matched by the new-release query, with its owning title's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleasedEpisode {
    pub title_id: i32,
    pub title_name: String,
    pub season: i32,
    pub number: i32,
    pub name: String,
    pub link: String,
    pub cover_image: Option<String>,
    pub alert: bool,
    pub released_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn blank_name_is_rejected() {
        let title = TitleInput {
            name: "   ".to_string(),
            ..Default::default()
        };
        assert!(title.validate().is_err());
    }

    #[test]
    fn episode_requires_name_and_link() {
        let mut ep = episode(1, 1);
        assert!(ep.validate().is_ok());

        ep.link = String::new();
        assert!(ep.validate().unwrap_err().contains("link"));

        let mut ep = episode(1, 2);
        ep.name = " ".to_string();
        assert!(ep.validate().unwrap_err().contains("name"));
    }

    #[test]
    fn negative_numbers_are_rejected() {
        assert!(episode(-1, 1).validate().is_err());
        assert!(episode(1, -3).validate().is_err());
    }

    #[test]
    fn title_write_checks_every_episode() {
        let title = TitleInput {
            name: "Mushishi".to_string(),
            ..Default::default()
        };
        let mut eps = vec![episode(1, 1), episode(1, 2)];
        assert!(validate_title_write(&title, &eps).is_ok());

        eps[1].link.clear();
        assert!(validate_title_write(&title, &eps).is_err());
    }

    #[test]
    fn alert_defaults_to_false_when_omitted() {
        let ep: EpisodeInput = serde_json::from_str(
            r#"{"season":1,"number":4,"name":"Pilot","link":"https://cdn.example/4"}"#,
        )
        .unwrap();
        assert!(!ep.alert);
        assert!(ep.cover_image.is_none());
    }

    #[test]
    fn update_request_flattens_title_fields() {
        let update: TitleUpdate = serde_json::from_str(
            r#"{"name":"Texhnolyze","release_year":2003,"new_id":7,"episodes":[]}"#,
        )
        .unwrap();
        assert_eq!(update.title.name, "Texhnolyze");
        assert_eq!(update.title.release_year, Some(2003));
        assert_eq!(update.new_id, Some(TitleId::new(7)));
        assert!(update.validate().is_ok());

        let update: TitleUpdate =
            serde_json::from_str(r#"{"name":"Texhnolyze","new_id":0}"#).unwrap();
        assert!(update.validate().is_err());
    }

    #[test]
    fn genres_round_trip_through_model() {
        let input = TitleInput {
            name: "Haibane Renmei".to_string(),
            genres: vec!["drama".to_string(), "mystery".to_string()],
            ..Default::default()
        };
        let model = titles::Model {
            id: 3,
            name: input.name.clone(),
            alt_name: None,
            seal: None,
            synopsis: None,
            rating: None,
            status: None,
            seasons: None,
            release_year: None,
            posted_at: "2026-01-01T00:00:00+00:00".to_string(),
            ova_notes: None,
            studio: None,
            director: None,
            genres: input.genres_json(),
            media_type: None,
            views: 0,
        };
        assert_eq!(Title::from(model).genres, input.genres);
    }
}
