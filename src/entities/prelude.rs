pub use super::collection_entries::Entity as CollectionEntries;
pub use super::display_episodes::Entity as DisplayEpisodes;
pub use super::display_titles::Entity as DisplayTitles;
pub use super::episodes::Entity as Episodes;
pub use super::titles::Entity as Titles;
pub use super::users::Entity as Users;
