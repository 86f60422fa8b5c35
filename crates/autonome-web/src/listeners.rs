#![forbid(unsafe_code)]

//! Owned DOM event subscriptions.
//!
//! Each `(element, event)` pair maps to exactly one closure. The set removes
//! every listener from the DOM before the closures are dropped, so JS never
//! calls into a freed closure.

use std::collections::HashMap;

use autonome_core::events::ListenerKey;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget};

type Handler = Closure<dyn FnMut(Event)>;

#[derive(Default)]
pub(crate) struct ListenerSet {
    entries: HashMap<ListenerKey, (EventTarget, Handler)>,
}

impl ListenerSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to `key.kind` on `target`, replacing any earlier
    /// handler registered under the same key.
    pub(crate) fn listen<F>(
        &mut self,
        key: ListenerKey,
        target: &EventTarget,
        handler: F,
    ) -> Result<(), JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(
            key.kind.dom_name(),
            closure.as_ref().unchecked_ref(),
        )?;
        if let Some((old_target, old)) = self.entries.insert(key, (target.clone(), closure)) {
            detach(key, &old_target, &old);
        }
        Ok(())
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Remove every listener from the DOM and drop its closure.
    pub(crate) fn clear(&mut self) {
        for (key, (target, closure)) in self.entries.drain() {
            detach(key, &target, &closure);
        }
    }
}

impl Drop for ListenerSet {
    fn drop(&mut self) {
        self.clear();
    }
}

fn detach(key: ListenerKey, target: &EventTarget, closure: &Handler) {
    if let Err(err) = target
        .remove_event_listener_with_callback(key.kind.dom_name(), closure.as_ref().unchecked_ref())
    {
        tracing::warn!(?key, ?err, "failed to remove listener");
    }
}
