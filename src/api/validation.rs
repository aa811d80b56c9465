use super::ApiError;
use crate::domain::{Direction, TitleId};

pub fn validate_title_id(id: i32) -> Result<TitleId, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid title ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(TitleId::new(id))
}

pub fn validate_episode_number(episode: i32) -> Result<i32, ApiError> {
    if episode < 0 {
        return Err(ApiError::validation(format!(
            "Invalid episode number: {}. Episode must not be negative",
            episode
        )));
    }
    Ok(episode)
}

pub fn parse_direction(raw: &str) -> Result<Direction, ApiError> {
    raw.parse::<Direction>()
        .map_err(|_| ApiError::validation(format!("Invalid direction: {raw}. Use next or previous")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_title_id() {
        assert_eq!(validate_title_id(1).unwrap(), TitleId::new(1));
        assert!(validate_title_id(12345).is_ok());
        assert!(validate_title_id(0).is_err());
        assert!(validate_title_id(-1).is_err());
    }

    #[test]
    fn test_validate_episode_number() {
        assert!(validate_episode_number(0).is_ok());
        assert!(validate_episode_number(12).is_ok());
        assert!(validate_episode_number(-2).is_err());
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!(parse_direction("next").unwrap(), Direction::Next);
        assert_eq!(parse_direction("previous").unwrap(), Direction::Previous);
        assert!(parse_direction("up").is_err());
    }
}
