pub mod collection;
pub mod display;
pub mod title;
