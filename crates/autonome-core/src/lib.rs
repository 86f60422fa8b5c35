#![forbid(unsafe_code)]

//! Host-agnostic behavior for the Autonome portfolio page enhancements.
//!
//! Every component of the page layer is modeled here as plain data in, plain
//! data out:
//! - the embedding host (the `autonome-web` crate, or a test) reports DOM
//!   facts such as hrefs, form fields, intersection entries and scroll
//!   metrics,
//! - the core decides what should happen and returns requests or command
//!   lists,
//! - the host applies them to the document.
//!
//! Nothing in this crate touches a DOM type, so all of it runs natively.

pub mod anchor;
pub mod config;
pub mod error;
pub mod events;
pub mod form;
pub mod lazy;
pub mod logging;
pub mod overlay;
pub mod progress;
pub mod reveal;
pub mod styles;
pub mod teardown;

pub use config::PageConfig;
pub use error::ConfigError;

// Logging macros live at the crate root so modules call `crate::debug!` and
// friends regardless of whether the `tracing` feature is on.
#[cfg(feature = "tracing")]
pub use logging::{debug, info, trace, warn};

/// Scroll animation style requested from the host. Every scroll the page
/// layer issues is animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollBehavior {
    Smooth,
}

/// A viewport scroll the host should perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    /// Absolute document offset in CSS pixels.
    pub top: f64,
    pub behavior: ScrollBehavior,
}

impl ScrollRequest {
    /// Smooth scroll to an absolute offset.
    #[must_use]
    pub const fn smooth(top: f64) -> Self {
        Self {
            top,
            behavior: ScrollBehavior::Smooth,
        }
    }

    /// Smooth scroll back to the top of the document.
    #[must_use]
    pub const fn top() -> Self {
        Self::smooth(0.0)
    }
}

/// One entry of an intersection observer callback, reduced to what the
/// components need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionReport {
    /// Index of the observed element in the host's registration order.
    pub index: usize,
    pub is_intersecting: bool,
}

impl IntersectionReport {
    #[must_use]
    pub const fn new(index: usize, is_intersecting: bool) -> Self {
        Self {
            index,
            is_intersecting,
        }
    }
}
