//! Domain primitives shared by the catalog, mirror and collection layers.
//!
//! Identifiers are wrapped in newtypes so a title id cannot be passed where a
//! user id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a catalog title.
///
/// Title ids are assigned by the catalog itself (`max(id) + 1`) and are
/// visible to callers, so they travel as plain integers on the wire.
///
/// # Examples
///
/// ```rust
/// use kuroneko::domain::TitleId;
///
/// let id = TitleId::new(5);
/// assert_eq!(id.value(), 5);
/// assert_eq!(id.next(), Some(TitleId::new(6)));
/// assert_eq!(TitleId::new(i32::MAX).next(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TitleId(i32);

impl TitleId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        debug_assert!(id >= 0, "TitleId should be non-negative");
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }

    /// The id following this one in assignment order.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<TitleId> for i32 {
    fn from(id: TitleId) -> Self {
        id.0
    }
}

impl From<i32> for TitleId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for TitleId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for TitleId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        Ok(Self(id))
    }
}

/// Verified caller identity handed to the core by the authentication layer.
///
/// The core never re-checks credentials; it only trusts this pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i32,
    pub is_admin: bool,
}

/// Walk direction along a title's display episodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Previous,
    Next,
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "previous" | "prev" => Ok(Self::Previous),
            "next" => Ok(Self::Next),
            other => Err(format!("Unknown direction: {other}")),
        }
    }
}

/// How an update writes a title's episode set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EpisodeWriteMode {
    /// Delete every episode row and insert the supplied list.
    #[default]
    Replace,
    /// Match on `(season, number)`: update matches, insert new keys, delete the rest.
    Diff,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_id_conversions() {
        let id = TitleId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(i32::from(id), 42);
        assert_eq!(TitleId::from(42), id);
        assert_eq!(TitleId::default().next(), Some(TitleId::new(1)));
        assert_eq!(TitleId::new(i32::MAX).next(), None);
    }

    #[test]
    fn title_id_serialization() {
        let id = TitleId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let deserialized: TitleId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }

    #[test]
    fn direction_parsing() {
        assert_eq!("next".parse::<Direction>().unwrap(), Direction::Next);
        assert_eq!("Previous".parse::<Direction>().unwrap(), Direction::Previous);
        assert_eq!("prev".parse::<Direction>().unwrap(), Direction::Previous);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn episode_write_mode_from_toml_value() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: EpisodeWriteMode,
        }
        let w: Wrapper = toml::from_str(r#"mode = "diff""#).unwrap();
        assert_eq!(w.mode, EpisodeWriteMode::Diff);
        assert_eq!(EpisodeWriteMode::default(), EpisodeWriteMode::Replace);
    }
}
