#![forbid(unsafe_code)]

//! The page components, attached to a live document.
//!
//! [`AttachedPage`] owns everything the layer adds to the page: listeners,
//! observers, the injected stylesheet, the scroll widgets and any mounted
//! overlays. Dropping it detaches all of it. Document mutations are recorded
//! in a [`Teardown`] as they happen, so a failed attach unwinds them too.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use autonome_core::config::OverlayConfig;
use autonome_core::events::{EventKind, ListenerKey, ListenerTarget};
use autonome_core::form::{self, FormFields};
use autonome_core::lazy::LazyImages;
use autonome_core::overlay::{
    ACTION_CLASS, OVERLAY_CLASS, OVERLAY_CONTENT_CLASS, OverlayCommand, OverlayContent,
    OverlayManager, TimerToken,
};
use autonome_core::progress::{
    BACK_TO_TOP_LABEL, BACK_TO_TOP_STYLE, PROGRESS_BAR_STYLE, ScrollWidgets,
};
use autonome_core::reveal::RevealTracker;
use autonome_core::teardown::Teardown;
use autonome_core::{IntersectionReport, PageConfig, ScrollRequest, anchor, styles};
use js_sys::Array;
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, FormData, HtmlElement, HtmlFormElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, Node, Window,
};

use crate::dom;
use crate::listeners::ListenerSet;

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// An intersection observer together with the state its callback drives.
struct Observed<T> {
    observer: IntersectionObserver,
    _callback: ObserverCallback,
    state: Rc<RefCell<T>>,
}

impl<T> Drop for Observed<T> {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

pub(crate) struct AttachedPage {
    listeners: ListenerSet,
    reveal: Observed<RevealTracker>,
    lazy: Observed<LazyImages>,
    overlays: Rc<OverlayHost>,
    teardown: Teardown,
}

impl AttachedPage {
    /// Attach every component, in startup order.
    pub(crate) fn attach(config: Rc<PageConfig>) -> Result<Self, JsValue> {
        let window = dom::window()?;
        let document = dom::document()?;
        let body = dom::body(&document)?;
        let mut listeners = ListenerSet::new();
        let mut teardown = Teardown::new();

        let anchors = bind_anchors(&document, &config, &mut listeners)?;
        let form_bound = bind_contact_form(&document, &config, &mut listeners)?;
        let reveal = observe_sections(&document, &config)?;
        let overlays = OverlayHost::new(&document, &config.overlay)?;
        overlays.bind(&mut listeners)?;

        mark_ready(&body, &config.ready_class, &mut teardown)?;
        inject_styles(&document, &config, &mut teardown)?;
        let lazy = observe_images(&document, &config)?;
        mount_scroll_widgets(
            &window,
            &document,
            &body,
            &config,
            &mut listeners,
            &mut teardown,
        )?;

        info!(
            anchors,
            form_bound,
            sections = reveal.state.borrow().len(),
            tiles = overlays.tiles.len(),
            deferred_images = lazy.state.borrow().pending_count(),
            listeners = listeners.len(),
            "page enhancements attached"
        );

        Ok(Self {
            listeners,
            reveal,
            lazy,
            overlays,
            teardown,
        })
    }

    pub(crate) fn revealed_count(&self) -> usize {
        self.reveal.state.borrow().revealed_count()
    }

    pub(crate) fn loaded_image_count(&self) -> usize {
        self.lazy.state.borrow().loaded_count()
    }
}

impl Drop for AttachedPage {
    fn drop(&mut self) {
        self.listeners.clear();
        self.overlays.clear();
        self.teardown.run();
        debug!("page enhancements detached");
    }
}

// ── Smooth scroll ─────────────────────────────────────────────────────

fn bind_anchors(
    document: &Document,
    config: &PageConfig,
    listeners: &mut ListenerSet,
) -> Result<usize, JsValue> {
    let anchors = dom::query_all(document, &config.anchor_selector)?;
    let offset = config.header_offset_px;
    for (index, anchor_el) in anchors.iter().enumerate() {
        let link = anchor_el.clone();
        listeners.listen(
            ListenerKey::new(ListenerTarget::Anchor(index), EventKind::Click),
            anchor_el,
            move |event: Event| {
                event.prevent_default();
                let Some(href) = link.get_attribute("href") else {
                    return;
                };
                let Ok(window) = dom::window() else {
                    return;
                };
                let Some(document) = window.document() else {
                    return;
                };
                let request =
                    anchor::scroll_request(&href, offset, |id| dom::offset_top_of(&document, id));
                if let Some(request) = request {
                    dom::scroll_to(&window, request);
                }
            },
        )?;
    }
    Ok(anchors.len())
}

// ── Contact form ──────────────────────────────────────────────────────

fn bind_contact_form(
    document: &Document,
    config: &Rc<PageConfig>,
    listeners: &mut ListenerSet,
) -> Result<bool, JsValue> {
    let Some(found) = document.get_element_by_id(&config.contact_form_id) else {
        debug!(id = config.contact_form_id.as_str(), "no contact form");
        return Ok(false);
    };
    let Ok(form_el) = found.dyn_into::<HtmlFormElement>() else {
        debug!(id = config.contact_form_id.as_str(), "contact form id is not a form");
        return Ok(false);
    };

    let config = Rc::clone(config);
    let target = form_el.clone();
    listeners.listen(
        ListenerKey::new(ListenerTarget::Form, EventKind::Submit),
        &target,
        move |event: Event| {
            event.prevent_default();
            let fields = match read_fields(&form_el) {
                Ok(fields) => fields,
                Err(err) => {
                    warn!(?err, "failed to read contact form");
                    return;
                }
            };
            let verdict = form::validate(&fields, &config);
            debug!(?verdict, "contact form submitted");
            if let Ok(window) = dom::window() {
                if let Err(err) = window.alert_with_message(verdict.notice(&config.messages)) {
                    warn!(?err, "failed to show form notice");
                }
            }
            if verdict.should_reset() {
                form_el.reset();
            }
        },
    )?;
    Ok(true)
}

fn read_fields(form_el: &HtmlFormElement) -> Result<FormFields, JsValue> {
    let data = FormData::new_with_form(form_el)?;
    let mut fields = FormFields::new();
    let Some(entries) = js_sys::try_iter(&data)? else {
        return Ok(fields);
    };
    for entry in entries {
        let pair: Array = entry?.dyn_into()?;
        let Some(name) = pair.get(0).as_string() else {
            continue;
        };
        // File inputs carry no text.
        fields.insert(name, pair.get(1).as_string().unwrap_or_default());
    }
    Ok(fields)
}

// ── Intersection observers ────────────────────────────────────────────

/// Map observer entries back to registration indices.
fn reports(entries: &Array, targets: &[Element]) -> Vec<IntersectionReport> {
    entries
        .iter()
        .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
        .filter_map(|entry| {
            let target: Node = entry.target().into();
            let index = targets
                .iter()
                .position(|el| el.is_same_node(Some(&target)))?;
            Some(IntersectionReport::new(index, entry.is_intersecting()))
        })
        .collect()
}

fn observe_sections(
    document: &Document,
    config: &PageConfig,
) -> Result<Observed<RevealTracker>, JsValue> {
    let sections = dom::query_all(document, &config.reveal.selector)?;
    let state = Rc::new(RefCell::new(RevealTracker::new(sections.len())));

    let tracker = Rc::clone(&state);
    let targets = sections.clone();
    let class = config.reveal.class_name.clone();
    let callback = Closure::wrap(Box::new(move |entries: Array, _observer: IntersectionObserver| {
        let newly = tracker.borrow_mut().observe(&reports(&entries, &targets));
        for index in newly {
            if let Err(err) = targets[index].class_list().add_1(&class) {
                warn!(index, ?err, "failed to mark section revealed");
            }
        }
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(config.reveal.threshold));
    init.set_root_margin(&config.reveal.root_margin);
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    for section in &sections {
        observer.observe(section);
    }

    Ok(Observed {
        observer,
        _callback: callback,
        state,
    })
}

fn observe_images(
    document: &Document,
    config: &PageConfig,
) -> Result<Observed<LazyImages>, JsValue> {
    let images = dom::query_all(document, &config.lazy.selector)?;
    let attribute = config.lazy.source_attribute.as_str();
    let state = Rc::new(RefCell::new(LazyImages::new(
        images.iter().map(|img| img.get_attribute(attribute)),
    )));

    let lazy = Rc::clone(&state);
    let targets = images.clone();
    let pending_class = config.lazy.pending_class.clone();
    let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
        let loads = lazy.borrow_mut().on_intersection(&reports(&entries, &targets));
        for load in loads {
            let img = &targets[load.index];
            if let Err(err) = img.set_attribute("src", &load.src) {
                warn!(index = load.index, ?err, "failed to assign image source");
                continue;
            }
            if !pending_class.is_empty() {
                if let Err(err) = img.class_list().remove_1(&pending_class) {
                    warn!(index = load.index, ?err, "failed to clear pending class");
                }
            }
            observer.unobserve(img);
        }
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let observer = IntersectionObserver::new(callback.as_ref().unchecked_ref())?;
    {
        let tracked = state.borrow();
        for (index, img) in images.iter().enumerate() {
            if tracked.is_tracked(index) {
                observer.observe(img);
            }
        }
    }

    Ok(Observed {
        observer,
        _callback: callback,
        state,
    })
}

// ── Hover overlays ────────────────────────────────────────────────────

struct OverlayHost {
    document: Document,
    tiles: Vec<Element>,
    config: OverlayConfig,
    manager: RefCell<OverlayManager>,
    nodes: RefCell<HashMap<usize, HtmlElement>>,
}

impl OverlayHost {
    fn new(document: &Document, config: &OverlayConfig) -> Result<Rc<Self>, JsValue> {
        Ok(Rc::new(Self {
            document: document.clone(),
            tiles: dom::query_all(document, &config.tile_selector)?,
            config: config.clone(),
            manager: RefCell::new(OverlayManager::new(config)),
            nodes: RefCell::new(HashMap::new()),
        }))
    }

    fn bind(self: &Rc<Self>, listeners: &mut ListenerSet) -> Result<(), JsValue> {
        for (index, tile) in self.tiles.iter().enumerate() {
            let host = Rc::clone(self);
            listeners.listen(
                ListenerKey::new(ListenerTarget::Tile(index), EventKind::MouseEnter),
                tile,
                move |_event: Event| host.pointer_enter(index),
            )?;
            let host = Rc::clone(self);
            listeners.listen(
                ListenerKey::new(ListenerTarget::Tile(index), EventKind::MouseLeave),
                tile,
                move |_event: Event| host.pointer_leave(index),
            )?;
        }
        Ok(())
    }

    fn content(&self, tile: usize) -> OverlayContent {
        let el = &self.tiles[tile];
        OverlayContent::from_tile(
            dom::child_text(el, "h3"),
            dom::child_text(el, "p"),
            &self.config,
        )
    }

    fn pointer_enter(self: &Rc<Self>, tile: usize) {
        let commands = self
            .manager
            .borrow_mut()
            .pointer_enter(tile, || self.content(tile));
        self.apply(commands);
    }

    fn pointer_leave(self: &Rc<Self>, tile: usize) {
        let commands = self.manager.borrow_mut().pointer_leave(tile);
        self.apply(commands);
    }

    fn timer_fired(self: &Rc<Self>, tile: usize, token: TimerToken) {
        let commands = self.manager.borrow_mut().timer_fired(tile, token);
        self.apply(commands);
    }

    /// Unmount every overlay; pending timers go stale.
    fn clear(self: &Rc<Self>) {
        let commands = self.manager.borrow_mut().drain();
        self.apply(commands);
    }

    fn apply(self: &Rc<Self>, commands: Vec<OverlayCommand>) {
        for command in commands {
            if let Err(err) = self.apply_one(command) {
                warn!(?err, "overlay update failed");
            }
        }
    }

    fn apply_one(self: &Rc<Self>, command: OverlayCommand) -> Result<(), JsValue> {
        match command {
            OverlayCommand::Mount { tile, content } => {
                let Some(tile_el) = self.tiles.get(tile) else {
                    return Ok(());
                };
                let node = self.build(&content)?;
                tile_el.append_child(&node)?;
                self.nodes.borrow_mut().insert(tile, node);
            }
            OverlayCommand::SetOpacity { tile, opacity } => {
                if let Some(node) = self.nodes.borrow().get(&tile) {
                    dom::set_style(node, "opacity", &opacity.to_string())?;
                }
            }
            OverlayCommand::Schedule {
                tile,
                token,
                delay_ms,
            } => {
                let host = Rc::clone(self);
                let callback = Closure::once_into_js(move || host.timer_fired(tile, token));
                dom::window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
                    callback.unchecked_ref(),
                    i32::try_from(delay_ms).unwrap_or(i32::MAX),
                )?;
            }
            OverlayCommand::Unmount { tile } => {
                if let Some(node) = self.nodes.borrow_mut().remove(&tile) {
                    node.remove();
                }
            }
        }
        Ok(())
    }

    /// Build the overlay subtree. Tile text goes in as text nodes.
    fn build(&self, content: &OverlayContent) -> Result<HtmlElement, JsValue> {
        let doc = &self.document;
        let root: HtmlElement = dom::create(doc, "div", Some(OVERLAY_CLASS), None)?.dyn_into()?;
        dom::set_style(&root, "opacity", "0")?;

        let inner = dom::create(doc, "div", Some(OVERLAY_CONTENT_CLASS), None)?;
        inner.append_child(&dom::create(doc, "h3", None, Some(&content.heading))?)?;
        inner.append_child(&dom::create(doc, "p", None, Some(&content.description))?)?;
        let action = dom::create(doc, "a", Some(ACTION_CLASS), Some(&content.action_label))?;
        action.set_attribute("href", &content.action_href)?;
        inner.append_child(&action)?;

        root.append_child(&inner)?;
        Ok(root)
    }
}

// ── Ready marker + stylesheet ─────────────────────────────────────────

fn mark_ready(body: &HtmlElement, class: &str, teardown: &mut Teardown) -> Result<(), JsValue> {
    body.class_list().add_1(class)?;
    let (body, class) = (body.clone(), class.to_owned());
    teardown.push("ready class", move || {
        if let Err(err) = body.class_list().remove_1(&class) {
            warn!(?err, "failed to clear ready class");
        }
    });
    Ok(())
}

fn inject_styles(
    document: &Document,
    config: &PageConfig,
    teardown: &mut Teardown,
) -> Result<(), JsValue> {
    let Some(head) = document.head() else {
        debug!("no <head>, skipping stylesheet");
        return Ok(());
    };
    let css = styles::stylesheet(config);
    let style = dom::create(document, "style", None, Some(&css))?;
    head.append_child(&style)?;
    teardown.push("stylesheet", move || style.remove());
    Ok(())
}

// ── Progress bar + back to top ────────────────────────────────────────

fn mount_scroll_widgets(
    window: &Window,
    document: &Document,
    body: &HtmlElement,
    config: &PageConfig,
    listeners: &mut ListenerSet,
    teardown: &mut Teardown,
) -> Result<(), JsValue> {
    let bar: HtmlElement = dom::create(document, "div", None, None)?.dyn_into()?;
    bar.set_attribute("style", PROGRESS_BAR_STYLE)?;
    body.append_child(&bar)?;
    let node = bar.clone();
    teardown.push("progress bar", move || node.remove());

    let button: HtmlElement =
        dom::create(document, "button", None, Some(BACK_TO_TOP_LABEL))?.dyn_into()?;
    button.set_attribute("style", BACK_TO_TOP_STYLE)?;
    button.set_attribute("aria-label", "Back to top")?;
    body.append_child(&button)?;
    let node = button.clone();
    teardown.push("back-to-top", move || node.remove());

    let mut widgets = ScrollWidgets::new(config.back_to_top.show_after_px);
    let scroll_window = window.clone();
    let (bar_el, button_el) = (bar, button.clone());
    listeners.listen(
        ListenerKey::new(ListenerTarget::Window, EventKind::Scroll),
        window,
        move |_event: Event| {
            let metrics = dom::scroll_metrics(&scroll_window);
            let update = widgets.on_scroll(&metrics);
            if let Some(width) = update.progress_width {
                if let Err(err) = dom::set_style(&bar_el, "width", &width) {
                    warn!(?err, "failed to update progress bar");
                }
            }
            if let Some(opacity) = update.back_to_top_opacity {
                if let Err(err) = dom::set_style(&button_el, "opacity", opacity) {
                    warn!(?err, "failed to update back-to-top button");
                }
            }
        },
    )?;

    listeners.listen(
        ListenerKey::new(ListenerTarget::BackToTop, EventKind::Click),
        &button,
        |_event: Event| {
            if let Ok(window) = dom::window() {
                dom::scroll_to(&window, ScrollRequest::top());
            }
        },
    )?;

    Ok(())
}
