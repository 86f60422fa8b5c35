#![forbid(unsafe_code)]

//! Scroll progress bar and back-to-top button.
//!
//! Both widgets are fixed-position elements appended to the body at startup
//! and driven by the window's scroll position. [`ScrollWidgets`] remembers
//! what it last applied so the host only writes styles that changed.

use crate::debug;

/// Inline style of the progress bar.
pub const PROGRESS_BAR_STYLE: &str = "position: fixed; top: 0; left: 0; width: 0%; \
height: 3px; background: linear-gradient(90deg, #000, #333); z-index: 1000; \
transition: width 0.25s ease;";

/// Inline style of the back-to-top button.
pub const BACK_TO_TOP_STYLE: &str = "position: fixed; bottom: 20px; right: 20px; \
width: 50px; height: 50px; border-radius: 50%; background: #000; color: white; \
border: none; cursor: pointer; opacity: 0; transition: opacity 0.3s ease; \
z-index: 1000; font-size: 20px;";

/// Label of the back-to-top button.
pub const BACK_TO_TOP_LABEL: &str = "\u{2191}";

/// Scroll position snapshot read from the window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Vertical scroll offset.
    pub scroll_y: f64,
    /// Full height of the document element.
    pub scroll_height: f64,
    /// Height of the viewport.
    pub viewport_height: f64,
}

impl ScrollMetrics {
    /// Distance the document can scroll.
    #[must_use]
    pub fn scrollable_range(&self) -> f64 {
        self.scroll_height - self.viewport_height
    }
}

/// Share of the scrollable range already scrolled, in percent.
///
/// Clamped to `0..=100`. A page that cannot scroll reports 0.
#[must_use]
pub fn progress_percent(metrics: &ScrollMetrics) -> f64 {
    let range = metrics.scrollable_range();
    if range <= 0.0 || !range.is_finite() || !metrics.scroll_y.is_finite() {
        return 0.0;
    }
    (metrics.scroll_y / range * 100.0).clamp(0.0, 100.0)
}

/// The button shows once the page has scrolled strictly past `threshold_px`.
#[must_use]
pub fn back_to_top_visible(scroll_y: f64, threshold_px: f64) -> bool {
    scroll_y > threshold_px
}

/// Style changes for one scroll event. `None` means unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WidgetUpdate {
    /// New CSS `width` of the progress bar, e.g. `"42.5%"`.
    pub progress_width: Option<String>,
    /// New CSS `opacity` of the back-to-top button.
    pub back_to_top_opacity: Option<&'static str>,
}

impl WidgetUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.progress_width.is_none() && self.back_to_top_opacity.is_none()
    }
}

/// State of the progress bar and back-to-top button.
#[derive(Debug, Clone)]
pub struct ScrollWidgets {
    show_after_px: f64,
    last_percent: Option<f64>,
    button_visible: bool,
}

impl ScrollWidgets {
    /// Widgets start with an empty bar and a hidden button.
    #[must_use]
    pub fn new(show_after_px: f64) -> Self {
        Self {
            show_after_px,
            last_percent: None,
            button_visible: false,
        }
    }

    /// Compute the style changes for the current scroll position.
    pub fn on_scroll(&mut self, metrics: &ScrollMetrics) -> WidgetUpdate {
        let mut update = WidgetUpdate::default();

        let percent = progress_percent(metrics);
        if self.last_percent != Some(percent) {
            self.last_percent = Some(percent);
            update.progress_width = Some(format!("{percent}%"));
        }

        let visible = back_to_top_visible(metrics.scroll_y, self.show_after_px);
        if visible != self.button_visible {
            self.button_visible = visible;
            debug!(visible, "back-to-top visibility changed");
            update.back_to_top_opacity = Some(if visible { "1" } else { "0" });
        }
        update
    }

    #[must_use]
    pub fn button_visible(&self) -> bool {
        self.button_visible
    }
}
