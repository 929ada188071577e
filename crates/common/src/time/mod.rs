//! Time formatting utilities

pub mod reset;

pub use reset::{format_reset_countdown, RESET_TIME_UNKNOWN};
