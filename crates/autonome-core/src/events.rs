#![forbid(unsafe_code)]

//! Names for the DOM subscriptions the page layer makes.
//!
//! The web host keeps one listener per [`ListenerKey`], which lets it detach
//! everything on teardown without holding on to anonymous closures.

/// DOM events the page layer listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Submit,
    MouseEnter,
    MouseLeave,
    Scroll,
    DomContentLoaded,
}

impl EventKind {
    /// Event type string passed to `addEventListener`.
    #[must_use]
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Submit => "submit",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::Scroll => "scroll",
            Self::DomContentLoaded => "DOMContentLoaded",
        }
    }
}

/// Element a listener is attached to.
///
/// Anchors and tiles are numbered in document order as returned by the
/// host's selector query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    Window,
    Document,
    Form,
    BackToTop,
    Anchor(usize),
    Tile(usize),
}

/// One `(element, event)` subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerKey {
    pub target: ListenerTarget,
    pub kind: EventKind,
}

impl ListenerKey {
    #[must_use]
    pub const fn new(target: ListenerTarget, kind: EventKind) -> Self {
        Self { target, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn dom_names_match_browser_event_types() {
        assert_eq!(EventKind::MouseEnter.dom_name(), "mouseenter");
        assert_eq!(EventKind::DomContentLoaded.dom_name(), "DOMContentLoaded");
    }

    #[test]
    fn keys_distinguish_target_and_kind() {
        let keys: HashSet<_> = [
            ListenerKey::new(ListenerTarget::Tile(0), EventKind::MouseEnter),
            ListenerKey::new(ListenerTarget::Tile(0), EventKind::MouseLeave),
            ListenerKey::new(ListenerTarget::Tile(1), EventKind::MouseEnter),
            ListenerKey::new(ListenerTarget::Tile(0), EventKind::MouseEnter),
        ]
        .into_iter()
        .collect();
        assert_eq!(keys.len(), 3);
    }
}
