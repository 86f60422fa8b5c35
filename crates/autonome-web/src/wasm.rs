#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::Rc;

use autonome_core::PageConfig;
use autonome_core::events::{EventKind, ListenerKey, ListenerTarget};
use tracing::warn;
use wasm_bindgen::prelude::*;

use crate::dom;
use crate::listeners::ListenerSet;
use crate::page::AttachedPage;

struct Shared {
    config: Rc<PageConfig>,
    page: RefCell<Option<AttachedPage>>,
    /// Holds the `DOMContentLoaded` subscription when attachment is deferred.
    boot_listeners: RefCell<ListenerSet>,
}

impl Shared {
    fn attach(&self) -> Result<(), JsValue> {
        if self.page.borrow().is_some() {
            return Ok(());
        }
        let page = AttachedPage::attach(Rc::clone(&self.config))?;
        *self.page.borrow_mut() = Some(page);
        Ok(())
    }
}

fn parse_options(options: Option<JsValue>) -> Result<PageConfig, JsValue> {
    let config = match options {
        Some(value) if !value.is_undefined() && !value.is_null() => {
            serde_wasm_bindgen::from_value::<PageConfig>(value)?
        }
        _ => PageConfig::default(),
    };
    config
        .validate()
        .map_err(|err| js_sys::Error::new(&err.to_string()))?;
    Ok(config)
}

/// Page enhancement layer for the portfolio page.
///
/// Owns every listener, observer and injected node. Calling `destroy` (or
/// freeing the object from JS) detaches all of them.
#[wasm_bindgen]
pub struct PortfolioEnhancer {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl PortfolioEnhancer {
    /// Build an enhancer from an options object. Missing fields take their
    /// defaults; `undefined` means all defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<JsValue>) -> Result<PortfolioEnhancer, JsValue> {
        Ok(Self {
            shared: Rc::new(Shared {
                config: Rc::new(parse_options(options)?),
                page: RefCell::new(None),
                boot_listeners: RefCell::new(ListenerSet::new()),
            }),
        })
    }

    /// Attach to the document now. Attaching twice is a no-op.
    pub fn attach(&self) -> Result<(), JsValue> {
        self.shared.attach()
    }

    /// Attach now if the document has been parsed, otherwise on
    /// `DOMContentLoaded`.
    #[wasm_bindgen(js_name = attachWhenReady)]
    pub fn attach_when_ready(&self) -> Result<(), JsValue> {
        let document = dom::document()?;
        if document.ready_state() != "loading" {
            return self.attach();
        }
        let shared = Rc::downgrade(&self.shared);
        self.shared.boot_listeners.borrow_mut().listen(
            ListenerKey::new(ListenerTarget::Document, EventKind::DomContentLoaded),
            &document,
            move |_event: web_sys::Event| {
                let Some(shared) = shared.upgrade() else {
                    return;
                };
                if let Err(err) = shared.attach() {
                    warn!(?err, "deferred attach failed");
                }
            },
        )
    }

    #[wasm_bindgen(getter, js_name = isAttached)]
    pub fn is_attached(&self) -> bool {
        self.shared.page.borrow().is_some()
    }

    /// Sections revealed so far.
    #[wasm_bindgen(js_name = revealedCount)]
    pub fn revealed_count(&self) -> usize {
        self.shared
            .page
            .borrow()
            .as_ref()
            .map_or(0, AttachedPage::revealed_count)
    }

    /// Deferred images whose source has been assigned.
    #[wasm_bindgen(js_name = loadedImageCount)]
    pub fn loaded_image_count(&self) -> usize {
        self.shared
            .page
            .borrow()
            .as_ref()
            .map_or(0, AttachedPage::loaded_image_count)
    }

    /// Detach listeners, disconnect observers and remove injected nodes.
    pub fn destroy(&self) {
        self.shared.boot_listeners.borrow_mut().clear();
        let page = self.shared.page.borrow_mut().take();
        drop(page);
    }
}

/// Entry point for the page script: build an enhancer and attach it as soon
/// as the document is ready.
#[wasm_bindgen]
pub fn boot(options: Option<JsValue>) -> Result<PortfolioEnhancer, JsValue> {
    #[cfg(feature = "console-panic")]
    console_error_panic_hook::set_once();

    let enhancer = PortfolioEnhancer::new(options)?;
    enhancer.attach_when_ready()?;
    Ok(enhancer)
}
