#![forbid(unsafe_code)]

//! Hover overlays for portfolio tiles.
//!
//! Entering a tile mounts an overlay that mirrors the tile's heading and
//! description and carries an action link; the overlay fades in shortly after
//! mounting. Leaving fades it out and unmounts it once the fade has elapsed.
//!
//! # Invariants
//!
//! 1. A tile has at most one overlay mounted at any time.
//! 2. Every scheduled timer carries a [`TimerToken`]; only the most recent
//!    token of a tile is honored, so a stale fade-in or removal timer is a
//!    no-op.
//! 3. Re-entering a tile whose overlay is fading out cancels the removal and
//!    fades the same overlay back in.
//!
//! The manager never touches the DOM. It returns [`OverlayCommand`]s for the
//! host to apply and expects [`OverlayManager::timer_fired`] to be called when
//! a scheduled delay elapses.

use std::collections::HashMap;

use crate::config::OverlayConfig;
use crate::trace;

/// Class of the overlay root appended to a tile.
pub const OVERLAY_CLASS: &str = "portfolio-overlay";
/// Class of the wrapper around the mirrored text and action link.
pub const OVERLAY_CONTENT_CLASS: &str = "portfolio-overlay-content";
/// Class of the action link.
pub const ACTION_CLASS: &str = "view-project-btn";

/// Identifies one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// Text mirrored into a tile's overlay.
///
/// Inserted as text, never parsed as markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayContent {
    pub heading: String,
    pub description: String,
    pub action_label: String,
    pub action_href: String,
}

impl OverlayContent {
    /// Content for a tile; a tile without a heading or description yields
    /// empty text for it.
    #[must_use]
    pub fn from_tile(
        heading: Option<String>,
        description: Option<String>,
        config: &OverlayConfig,
    ) -> Self {
        Self {
            heading: heading.unwrap_or_default(),
            description: description.unwrap_or_default(),
            action_label: config.action_label.clone(),
            action_href: config.action_href.clone(),
        }
    }
}

/// A DOM change the host should apply.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayCommand {
    /// Build the overlay with opacity 0 and append it to the tile.
    Mount { tile: usize, content: OverlayContent },
    SetOpacity { tile: usize, opacity: f64 },
    /// Call [`OverlayManager::timer_fired`] with `token` after `delay_ms`.
    Schedule {
        tile: usize,
        token: TimerToken,
        delay_ms: u32,
    },
    Unmount { tile: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Mounted at opacity 0, waiting for the fade-in timer.
    FadingIn,
    Shown,
    /// Opacity 0, waiting for the removal timer.
    FadingOut,
}

#[derive(Debug, Clone, Copy)]
struct TileState {
    phase: Phase,
    token: TimerToken,
}

/// Overlay lifecycle for every tile on the page.
#[derive(Debug, Clone)]
pub struct OverlayManager {
    fade_in_delay_ms: u32,
    fade_out_ms: u32,
    tiles: HashMap<usize, TileState>,
    next_token: u64,
}

impl OverlayManager {
    #[must_use]
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            fade_in_delay_ms: config.fade_in_delay_ms,
            fade_out_ms: config.fade_out_ms,
            tiles: HashMap::new(),
            next_token: 0,
        }
    }

    fn issue_token(&mut self) -> TimerToken {
        self.next_token += 1;
        TimerToken(self.next_token)
    }

    /// Pointer entered `tile`. `content` is only evaluated when a new overlay
    /// has to be mounted.
    pub fn pointer_enter<F>(&mut self, tile: usize, content: F) -> Vec<OverlayCommand>
    where
        F: FnOnce() -> OverlayContent,
    {
        match self.tiles.get(&tile).map(|s| s.phase) {
            None => {
                let token = self.issue_token();
                self.tiles.insert(
                    tile,
                    TileState {
                        phase: Phase::FadingIn,
                        token,
                    },
                );
                trace!(tile, "overlay mounted");
                vec![
                    OverlayCommand::Mount {
                        tile,
                        content: content(),
                    },
                    OverlayCommand::Schedule {
                        tile,
                        token,
                        delay_ms: self.fade_in_delay_ms,
                    },
                ]
            }
            Some(Phase::FadingOut) => {
                let token = self.issue_token();
                self.tiles.insert(
                    tile,
                    TileState {
                        phase: Phase::Shown,
                        token,
                    },
                );
                trace!(tile, "overlay removal cancelled");
                vec![OverlayCommand::SetOpacity { tile, opacity: 1.0 }]
            }
            Some(Phase::FadingIn | Phase::Shown) => Vec::new(),
        }
    }

    /// Pointer left `tile`.
    pub fn pointer_leave(&mut self, tile: usize) -> Vec<OverlayCommand> {
        match self.tiles.get(&tile).map(|s| s.phase) {
            Some(Phase::FadingIn | Phase::Shown) => {
                let token = self.issue_token();
                self.tiles.insert(
                    tile,
                    TileState {
                        phase: Phase::FadingOut,
                        token,
                    },
                );
                vec![
                    OverlayCommand::SetOpacity { tile, opacity: 0.0 },
                    OverlayCommand::Schedule {
                        tile,
                        token,
                        delay_ms: self.fade_out_ms,
                    },
                ]
            }
            Some(Phase::FadingOut) | None => Vec::new(),
        }
    }

    /// A timer scheduled for `tile` elapsed.
    pub fn timer_fired(&mut self, tile: usize, token: TimerToken) -> Vec<OverlayCommand> {
        let Some(state) = self.tiles.get_mut(&tile) else {
            return Vec::new();
        };
        if state.token != token {
            trace!(tile, ?token, "stale overlay timer");
            return Vec::new();
        }
        let phase = state.phase;
        match phase {
            Phase::FadingIn => {
                state.phase = Phase::Shown;
                vec![OverlayCommand::SetOpacity { tile, opacity: 1.0 }]
            }
            Phase::FadingOut => {
                self.tiles.remove(&tile);
                trace!(tile, "overlay unmounted");
                vec![OverlayCommand::Unmount { tile }]
            }
            Phase::Shown => Vec::new(),
        }
    }

    #[must_use]
    pub fn is_mounted(&self, tile: usize) -> bool {
        self.tiles.contains_key(&tile)
    }

    #[must_use]
    pub fn mounted_count(&self) -> usize {
        self.tiles.len()
    }

    /// Forget every overlay and return the unmounts needed to clear the page.
    /// Outstanding timers become stale.
    pub fn drain(&mut self) -> Vec<OverlayCommand> {
        let mut tiles: Vec<usize> = self.tiles.drain().map(|(tile, _)| tile).collect();
        tiles.sort_unstable();
        tiles
            .into_iter()
            .map(|tile| OverlayCommand::Unmount { tile })
            .collect()
    }
}
