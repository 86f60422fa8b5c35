#![forbid(unsafe_code)]

//! Configuration errors.
//!
//! These are the only errors the page layer reports. Everything that can go
//! wrong while handling a DOM event (a missing scroll target, a tile without a
//! heading, an absent form) is an existence check that skips the action.

use thiserror::Error;

/// Rejected [`PageConfig`](crate::PageConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Options were not valid JSON or had the wrong shape.
    #[error("invalid page options: {0}")]
    Json(#[from] serde_json::Error),

    /// The reveal threshold must be a visible fraction.
    #[error("reveal threshold {0} is outside 0.0..=1.0")]
    ThresholdOutOfRange(f64),

    /// A selector, id or class name that must be non-empty was empty.
    #[error("`{field}` must not be empty")]
    EmptySelector { field: &'static str },

    /// The configured email field is not among the required fields.
    #[error("email field `{0}` is not listed in required_fields")]
    MissingEmailField(String),
}
