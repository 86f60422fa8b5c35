#![forbid(unsafe_code)]

//! WASM frontend for the Autonome portfolio page.
//!
//! Wires the decisions made in `autonome-core` to a live document:
//! - in-page anchors scroll smoothly below the fixed header,
//! - the contact form is validated locally,
//! - sections reveal as they scroll into view,
//! - portfolio tiles get hover overlays,
//! - deferred images load near the viewport,
//! - a progress bar and back-to-top button follow the scroll position.
//!
//! JS calls `boot` once and keeps the returned
//! `PortfolioEnhancer`; dropping or destroying it detaches everything.

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod listeners;
#[cfg(target_arch = "wasm32")]
mod page;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{PortfolioEnhancer, boot};

pub use autonome_core::PageConfig;

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets. The stub validates options but never attaches.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct PortfolioEnhancer {
    config: PageConfig,
}

#[cfg(not(target_arch = "wasm32"))]
impl PortfolioEnhancer {
    /// Build an enhancer from JSON options.
    pub fn from_json(options: &str) -> Result<Self, autonome_core::ConfigError> {
        Ok(Self {
            config: PageConfig::from_json_str(options)?,
        })
    }

    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Without a document nothing is ever revealed.
    #[must_use]
    pub fn revealed_count(&self) -> usize {
        0
    }

    /// Without a document nothing is ever loaded.
    #[must_use]
    pub fn loaded_image_count(&self) -> usize {
        0
    }

    pub fn destroy(&mut self) {}
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn stub_accepts_options() {
        let enhancer = PortfolioEnhancer::from_json(r#"{ "header_offset_px": 96 }"#).unwrap();
        assert_eq!(enhancer.config().header_offset_px, 96.0);
        assert_eq!(enhancer.revealed_count(), 0);
    }

    #[test]
    fn stub_rejects_invalid_options() {
        assert!(PortfolioEnhancer::from_json(r#"{ "reveal": { "threshold": -1 } }"#).is_err());
    }
}
