#![forbid(unsafe_code)]

//! Deferred image loading.
//!
//! Images carrying a deferred source get their real `src` the first time they
//! near the viewport. The transition is one-way and happens at most once per
//! image; the host stops observing an image as soon as it is loaded.

use crate::{IntersectionReport, trace};

/// Source assignment for one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLoad {
    /// Index of the image in the host's registration order.
    pub index: usize,
    pub src: String,
}

#[derive(Debug, Clone)]
enum Slot {
    Pending(String),
    Loaded,
    /// No deferred source was present at startup.
    Untracked,
}

/// Load state for every deferred image on the page.
#[derive(Debug, Clone, Default)]
pub struct LazyImages {
    slots: Vec<Slot>,
}

impl LazyImages {
    /// Register images by their deferred source, in host order.
    #[must_use]
    pub fn new<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let slots = sources
            .into_iter()
            .map(|src| src.map_or(Slot::Untracked, Slot::Pending))
            .collect();
        Self { slots }
    }

    /// Whether the host should observe image `index` at all.
    #[must_use]
    pub fn is_tracked(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Slot::Pending(_)))
    }

    /// Process one observer callback and return the loads to apply.
    pub fn on_intersection(&mut self, entries: &[IntersectionReport]) -> Vec<ImageLoad> {
        let mut loads = Vec::new();
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            let Some(slot) = self.slots.get_mut(entry.index) else {
                continue;
            };
            match std::mem::replace(slot, Slot::Loaded) {
                Slot::Pending(src) => {
                    trace!(index = entry.index, src = src.as_str(), "deferred image loaded");
                    loads.push(ImageLoad {
                        index: entry.index,
                        src,
                    });
                }
                other => *slot = other,
            }
        }
        loads
    }

    #[cfg(test)]
    fn is_loaded(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Slot::Loaded))
    }

    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Loaded))
            .count()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Pending(_)))
            .count()
    }
}
