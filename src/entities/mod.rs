pub mod prelude;

pub mod collection_entries;
pub mod display_episodes;
pub mod display_titles;
pub mod episodes;
pub mod titles;
pub mod users;
