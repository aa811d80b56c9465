pub mod collection;
pub mod display;
pub mod episode;
pub mod title;
pub mod user;
