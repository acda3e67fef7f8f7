//! Error types for calendar access and recurrence expansion.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("calendar fetch failed: {0}")]
    Fetch(String),

    #[error("calendar parse failed: {0}")]
    Parse(String),

    #[error("invalid recurrence rule: {0}")]
    InvalidRule(String),

    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),
}

pub type Result<T> = std::result::Result<T, CalendarError>;
