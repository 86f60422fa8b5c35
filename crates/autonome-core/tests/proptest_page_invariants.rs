//! Property-based invariant tests for the page components.
//!
//! Verifies:
//! 1.  Anchor scroll: an existing target always lands at (target top - offset)
//! 2.  Anchor scroll: a missing target never produces a scroll
//! 3.  Form: any blank required field is rejected as missing, regardless of email
//! 4.  Form: acceptance implies the email matches the shape and every field is filled
//! 5.  Form: only accepted submissions reset
//! 6.  Reveal: every section is reported at most once across any entry sequence
//! 7.  Reveal: revealed sections stay revealed
//! 8.  Overlay: at most one overlay is ever mounted per tile
//! 9.  Overlay: after leave + all timers fired, nothing stays mounted
//! 10. Lazy images: each tracked image yields exactly one load, never more
//! 11. Progress: percent always within 0..=100
//! 12. Scroll widgets: replaying the same metrics produces an empty update

use std::collections::{HashMap, HashSet};

use autonome_core::anchor::scroll_request;
use autonome_core::form::{FormFields, Rejection, Verdict, is_valid_email, validate};
use autonome_core::lazy::LazyImages;
use autonome_core::overlay::{OverlayCommand, OverlayContent, OverlayManager, TimerToken};
use autonome_core::progress::{ScrollMetrics, ScrollWidgets, progress_percent};
use autonome_core::reveal::RevealTracker;
use autonome_core::{IntersectionReport, PageConfig};
use proptest::prelude::*;

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_field_value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just(" ".to_string()),
        "[a-zA-Z ]{1,12}",
    ]
}

fn arb_email() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-z]{1,8}@[a-z]{1,8}\\.[a-z]{2,4}",
        "[a-z]{1,8}@[a-z]{1,8}",
        "[a-z @.]{0,16}",
    ]
}

fn arb_entries(count: usize) -> impl Strategy<Value = Vec<Vec<IntersectionReport>>> {
    prop::collection::vec(
        prop::collection::vec(
            (0..count + 2, any::<bool>()).prop_map(|(i, b)| IntersectionReport::new(i, b)),
            0..6,
        ),
        0..12,
    )
}

#[derive(Debug, Clone, Copy)]
enum PointerOp {
    Enter(usize),
    Leave(usize),
    /// Fire the oldest outstanding timer.
    FireOldest,
    /// Fire the newest outstanding timer.
    FireNewest,
}

fn arb_pointer_ops() -> impl Strategy<Value = Vec<PointerOp>> {
    prop::collection::vec(
        prop_oneof![
            (0usize..3).prop_map(PointerOp::Enter),
            (0usize..3).prop_map(PointerOp::Leave),
            Just(PointerOp::FireOldest),
            Just(PointerOp::FireNewest),
        ],
        0..40,
    )
}

fn content() -> OverlayContent {
    OverlayContent::from_tile(
        Some("Tile".to_string()),
        Some("Text".to_string()),
        &PageConfig::default().overlay,
    )
}

/// Applies overlay commands to a fake page: mounted node counts per tile and
/// a queue of pending timers.
#[derive(Default)]
struct FakePage {
    nodes: HashMap<usize, usize>,
    timers: Vec<(usize, TimerToken)>,
}

impl FakePage {
    fn apply(&mut self, commands: Vec<OverlayCommand>) {
        for command in commands {
            match command {
                OverlayCommand::Mount { tile, .. } => *self.nodes.entry(tile).or_default() += 1,
                OverlayCommand::Unmount { tile } => {
                    let count = self.nodes.entry(tile).or_default();
                    *count = count.saturating_sub(1);
                }
                OverlayCommand::Schedule { tile, token, .. } => self.timers.push((tile, token)),
                OverlayCommand::SetOpacity { .. } => {}
            }
        }
    }

    fn max_nodes(&self) -> usize {
        self.nodes.values().copied().max().unwrap_or(0)
    }

    fn total_nodes(&self) -> usize {
        self.nodes.values().sum()
    }
}

proptest! {
    // 1
    #[test]
    fn existing_target_lands_at_offset(top in -1e6f64..1e6, offset in 0f64..400.0, id in "[a-z]{1,10}") {
        let href = format!("#{id}");
        let request = scroll_request(&href, offset, |_| Some(top)).unwrap();
        prop_assert_eq!(request.top, top - offset);
    }

    // 2
    #[test]
    fn missing_target_never_scrolls(href in "#?[a-z]{0,10}") {
        prop_assert!(scroll_request(&href, 80.0, |_| None).is_none());
    }

    // 3
    #[test]
    fn blank_required_field_is_missing(
        name in arb_field_value(),
        email in arb_email(),
        message in arb_field_value(),
    ) {
        let config = PageConfig::default();
        let fields: FormFields = [("name", name.as_str()), ("email", email.as_str()), ("message", message.as_str())]
            .into_iter()
            .collect();
        let verdict = validate(&fields, &config);
        if name.is_empty() || email.is_empty() || message.is_empty() {
            prop_assert_eq!(verdict, Verdict::Rejected(Rejection::MissingFields));
        }
    }

    // 4 + 5
    #[test]
    fn acceptance_implies_valid_email(
        name in arb_field_value(),
        email in arb_email(),
        message in arb_field_value(),
    ) {
        let config = PageConfig::default();
        let fields: FormFields = [("name", name.as_str()), ("email", email.as_str()), ("message", message.as_str())]
            .into_iter()
            .collect();
        let verdict = validate(&fields, &config);
        if verdict == Verdict::Accepted {
            prop_assert!(is_valid_email(&email));
            prop_assert!(!name.is_empty() && !message.is_empty());
        }
        prop_assert_eq!(verdict.should_reset(), verdict == Verdict::Accepted);
    }

    // 6 + 7
    #[test]
    fn sections_revealed_at_most_once(batches in arb_entries(4)) {
        let mut tracker = RevealTracker::new(4);
        let mut seen = HashSet::new();
        for batch in &batches {
            for index in tracker.observe(batch) {
                prop_assert!(seen.insert(index), "section {} revealed twice", index);
            }
            for index in &seen {
                prop_assert!(tracker.is_revealed(*index));
            }
        }
        prop_assert_eq!(tracker.revealed_count(), seen.len());
    }

    // 8 + 9
    #[test]
    fn one_overlay_per_tile(ops in arb_pointer_ops()) {
        let mut manager = OverlayManager::new(&PageConfig::default().overlay);
        let mut page = FakePage::default();
        for op in ops {
            let commands = match op {
                PointerOp::Enter(tile) => manager.pointer_enter(tile, content),
                PointerOp::Leave(tile) => manager.pointer_leave(tile),
                PointerOp::FireOldest if !page.timers.is_empty() => {
                    let (tile, token) = page.timers.remove(0);
                    manager.timer_fired(tile, token)
                }
                PointerOp::FireNewest => match page.timers.pop() {
                    Some((tile, token)) => manager.timer_fired(tile, token),
                    None => Vec::new(),
                },
                PointerOp::FireOldest => Vec::new(),
            };
            page.apply(commands);
            prop_assert!(page.max_nodes() <= 1);
            prop_assert_eq!(page.total_nodes(), manager.mounted_count());
        }

        for tile in 0..3 {
            let commands = manager.pointer_leave(tile);
            page.apply(commands);
        }
        while !page.timers.is_empty() {
            let (tile, token) = page.timers.remove(0);
            let commands = manager.timer_fired(tile, token);
            page.apply(commands);
        }
        prop_assert_eq!(page.total_nodes(), 0);
        prop_assert_eq!(manager.mounted_count(), 0);
    }

    // 10
    #[test]
    fn each_image_loads_once(
        sources in prop::collection::vec(prop::option::of("/img/[a-z]{1,6}\\.jpg"), 0..6),
        batches in arb_entries(6),
    ) {
        let tracked: HashSet<usize> = sources
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|_| i))
            .collect();
        let mut lazy = LazyImages::new(sources.clone());
        let mut loaded = HashSet::new();
        for batch in &batches {
            for load in lazy.on_intersection(batch) {
                prop_assert!(tracked.contains(&load.index));
                prop_assert_eq!(Some(&load.src), sources[load.index].as_ref());
                prop_assert!(loaded.insert(load.index), "image {} loaded twice", load.index);
            }
        }
        prop_assert_eq!(lazy.loaded_count(), loaded.len());
    }

    // 11
    #[test]
    fn percent_in_bounds(
        scroll_y in -1e5f64..1e6,
        scroll_height in 0f64..1e6,
        viewport_height in 0f64..1e5,
    ) {
        let p = progress_percent(&ScrollMetrics { scroll_y, scroll_height, viewport_height });
        prop_assert!((0.0..=100.0).contains(&p));
    }

    // 12
    #[test]
    fn repeated_metrics_are_quiet(scroll_y in 0f64..5000.0) {
        let mut widgets = ScrollWidgets::new(300.0);
        let metrics = ScrollMetrics { scroll_y, scroll_height: 6000.0, viewport_height: 900.0 };
        widgets.on_scroll(&metrics);
        prop_assert!(widgets.on_scroll(&metrics).is_empty());
    }
}
