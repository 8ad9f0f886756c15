//! Utility functions for string matching and date parsing.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{contains_ignore_case, parse_calendar_date, parse_timestamp, truncate_string};
