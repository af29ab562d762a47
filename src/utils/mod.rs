pub mod text;
pub mod time;

pub use text::normalize_ticker;
pub use time::{current_human_timestamp, format_epoch_local};
