mod display;
mod releases;
mod titles;
mod users;

pub use display::{cmd_clear_display, cmd_rebuild_display};
pub use releases::{cmd_clear_alert, cmd_today};
pub use titles::{cmd_list_titles, cmd_show_title};
pub use users::{cmd_user_add, cmd_user_list};
