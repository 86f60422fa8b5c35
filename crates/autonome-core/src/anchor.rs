#![forbid(unsafe_code)]

//! Smooth scrolling for in-page anchors.
//!
//! Clicking a bound anchor never navigates. If its fragment names an element
//! that exists, the viewport scrolls smoothly to that element's top minus the
//! fixed header offset; otherwise nothing happens.

use crate::{ScrollRequest, debug};

/// Extract the element id from an in-page href.
///
/// Returns `None` for hrefs that are not fragments and for the bare `#`,
/// which names no element.
#[must_use]
pub fn fragment_id(href: &str) -> Option<&str> {
    let id = href.strip_prefix('#')?;
    if id.is_empty() { None } else { Some(id) }
}

/// Decide the scroll for a click on an anchor with `href`.
///
/// `locate` maps an element id to its top offset within the document, or
/// `None` when no such element exists.
pub fn scroll_request<F>(href: &str, header_offset_px: f64, locate: F) -> Option<ScrollRequest>
where
    F: FnOnce(&str) -> Option<f64>,
{
    let Some(id) = fragment_id(href) else {
        debug!(href, "anchor without fragment target");
        return None;
    };
    let Some(offset_top) = locate(id) else {
        debug!(id, "anchor target missing");
        return None;
    };
    Some(ScrollRequest::smooth(offset_top - header_offset_px))
}
