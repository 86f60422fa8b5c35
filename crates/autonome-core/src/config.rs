#![forbid(unsafe_code)]

//! Page options.
//!
//! Every selector, class name, delay and message the page layer uses is a
//! field here. Defaults reproduce the stock portfolio page; hosts override any
//! subset by passing a JSON (or JS) object whose missing fields fall back to
//! the defaults.
//!
//! ```
//! use autonome_core::PageConfig;
//!
//! let config = PageConfig::from_json_str(r#"{ "header_offset_px": 64 }"#).unwrap();
//! assert_eq!(config.header_offset_px, 64.0);
//! assert_eq!(config.contact_form_id, "contactForm");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Notices shown to the visitor after a contact-form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub missing_fields: String,
    pub invalid_email: String,
    pub success: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            missing_fields: "Please fill in all fields.".to_string(),
            invalid_email: "Please enter a valid email address.".to_string(),
            success: "Thank you for your message! We will get back to you soon.".to_string(),
        }
    }
}

/// Scroll-triggered reveal of section elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub selector: String,
    /// Class added once an element is revealed.
    pub class_name: String,
    /// Visible fraction that counts as intersecting.
    pub threshold: f64,
    /// CSS margin applied to the viewport when testing intersection.
    pub root_margin: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: "section".to_string(),
            class_name: "animate-in".to_string(),
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_string(),
        }
    }
}

/// Hover overlays on portfolio tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub tile_selector: String,
    /// Delay between mounting an overlay and starting its fade-in.
    pub fade_in_delay_ms: u32,
    /// Length of the fade-out; the overlay is unmounted once it elapses.
    pub fade_out_ms: u32,
    pub action_label: String,
    pub action_href: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            tile_selector: ".portfolio-item".to_string(),
            fade_in_delay_ms: 10,
            fade_out_ms: 300,
            action_label: "View Project".to_string(),
            action_href: "#".to_string(),
        }
    }
}

/// Deferred image loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LazyConfig {
    pub selector: String,
    /// Attribute holding the deferred source.
    pub source_attribute: String,
    /// Class removed from an image once its source is assigned.
    pub pending_class: String,
}

impl Default for LazyConfig {
    fn default() -> Self {
        Self {
            selector: "img[data-src]".to_string(),
            source_attribute: "data-src".to_string(),
            pending_class: "lazy".to_string(),
        }
    }
}

/// Floating back-to-top button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackToTopConfig {
    /// Scroll distance past which the button becomes visible.
    pub show_after_px: f64,
}

impl Default for BackToTopConfig {
    fn default() -> Self {
        Self {
            show_after_px: 300.0,
        }
    }
}

/// All page options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Height of the fixed header; anchor scrolls stop this far above the target.
    pub header_offset_px: f64,
    pub anchor_selector: String,
    pub contact_form_id: String,
    pub required_fields: Vec<String>,
    pub email_field: String,
    pub messages: Messages,
    pub reveal: RevealConfig,
    pub overlay: OverlayConfig,
    pub lazy: LazyConfig,
    pub back_to_top: BackToTopConfig,
    /// Class added to `<body>` once the layer has attached.
    pub ready_class: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            header_offset_px: 80.0,
            anchor_selector: "a[href^=\"#\"]".to_string(),
            contact_form_id: "contactForm".to_string(),
            required_fields: vec![
                "name".to_string(),
                "email".to_string(),
                "message".to_string(),
            ],
            email_field: "email".to_string(),
            messages: Messages::default(),
            reveal: RevealConfig::default(),
            overlay: OverlayConfig::default(),
            lazy: LazyConfig::default(),
            back_to_top: BackToTopConfig::default(),
            ready_class: "loaded".to_string(),
        }
    }
}

impl PageConfig {
    /// Parse options from JSON and validate them.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the components rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.reveal.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::ThresholdOutOfRange(threshold));
        }

        let required = [
            ("anchor_selector", &self.anchor_selector),
            ("contact_form_id", &self.contact_form_id),
            ("email_field", &self.email_field),
            ("ready_class", &self.ready_class),
            ("reveal.selector", &self.reveal.selector),
            ("reveal.class_name", &self.reveal.class_name),
            ("overlay.tile_selector", &self.overlay.tile_selector),
            ("lazy.selector", &self.lazy.selector),
            ("lazy.source_attribute", &self.lazy.source_attribute),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptySelector { field });
            }
        }

        if !self.required_fields.iter().any(|f| f == &self.email_field) {
            return Err(ConfigError::MissingEmailField(self.email_field.clone()));
        }
        Ok(())
    }
}
