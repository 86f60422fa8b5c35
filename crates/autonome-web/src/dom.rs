#![forbid(unsafe_code)]

//! Small DOM helpers shared by the page components.

use autonome_core::ScrollRequest;
use autonome_core::progress::ScrollMetrics;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, ScrollToOptions, Window};

pub(crate) fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

pub(crate) fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

pub(crate) fn body(document: &Document) -> Result<HtmlElement, JsValue> {
    document.body().ok_or_else(|| JsValue::from_str("no body"))
}

/// All elements matching `selector`, in document order.
pub(crate) fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let list = document.query_selector_all(selector)?;
    let mut out = Vec::with_capacity(list.length() as usize);
    for i in 0..list.length() {
        if let Some(el) = list.item(i).and_then(|node| node.dyn_into::<Element>().ok()) {
            out.push(el);
        }
    }
    Ok(out)
}

/// Text of the first descendant matching `selector`, if any.
pub(crate) fn child_text(parent: &Element, selector: &str) -> Option<String> {
    parent.query_selector(selector).ok().flatten()?.text_content()
}

pub(crate) fn set_style(el: &HtmlElement, property: &str, value: &str) -> Result<(), JsValue> {
    el.style().set_property(property, value)
}

/// Create an element with a class and optional text.
pub(crate) fn create(
    document: &Document,
    tag: &str,
    class: Option<&str>,
    text: Option<&str>,
) -> Result<Element, JsValue> {
    let el = document.create_element(tag)?;
    if let Some(class) = class {
        el.set_class_name(class);
    }
    if text.is_some() {
        el.set_text_content(text);
    }
    Ok(el)
}

pub(crate) fn scroll_to(window: &Window, request: ScrollRequest) {
    let options = ScrollToOptions::new();
    options.set_top(request.top);
    options.set_behavior(match request.behavior {
        autonome_core::ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
    });
    window.scroll_to_with_scroll_to_options(&options);
}

/// Current scroll position and document extent.
pub(crate) fn scroll_metrics(window: &Window) -> ScrollMetrics {
    let scroll_y = window.scroll_y().unwrap_or(0.0);
    let viewport_height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let scroll_height = window
        .document()
        .and_then(|d| d.document_element())
        .map_or(0.0, |el| f64::from(el.scroll_height()));
    ScrollMetrics {
        scroll_y,
        scroll_height,
        viewport_height,
    }
}

/// Document offset of the element with `id`, if it exists.
pub(crate) fn offset_top_of(document: &Document, id: &str) -> Option<f64> {
    let el = document.get_element_by_id(id)?;
    let el = el.dyn_into::<HtmlElement>().ok()?;
    Some(f64::from(el.offset_top()))
}
