#![forbid(unsafe_code)]

//! Scroll-triggered reveal of sections.
//!
//! Each observed element gains the reveal class the first time it intersects
//! the viewport. Observation continues afterwards, but later intersections
//! change nothing.

use crate::{IntersectionReport, trace};

/// Tracks which observed elements have been revealed.
#[derive(Debug, Clone, Default)]
pub struct RevealTracker {
    revealed: Vec<bool>,
}

impl RevealTracker {
    /// Track `count` elements, none revealed yet.
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            revealed: vec![false; count],
        }
    }

    /// Process one observer callback and return the indices revealed by it,
    /// in entry order. Unknown indices are ignored.
    pub fn observe(&mut self, entries: &[IntersectionReport]) -> Vec<usize> {
        let mut newly = Vec::new();
        for entry in entries {
            if !entry.is_intersecting {
                continue;
            }
            let Some(flag) = self.revealed.get_mut(entry.index) else {
                continue;
            };
            if !*flag {
                *flag = true;
                trace!(index = entry.index, "section revealed");
                newly.push(entry.index);
            }
        }
        newly
    }

    #[must_use]
    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.revealed.iter().filter(|r| **r).count()
    }

    /// Number of observed elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.revealed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revealed.is_empty()
    }
}
