//! Utility functions

pub mod crypto;
pub mod stats;
pub mod time;
pub mod validation;

pub use crypto::{generate_join_code, normalize_join_code};
pub use time::{clamp_time_taken, seconds_to_ms};
pub use validation::{sanitize_string, validate_join_code};
