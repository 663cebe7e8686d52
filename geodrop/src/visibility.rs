//! Selection and ordering of individually drawn posts.
//!
//! | Tier | Selection                      | Order                         | Cap          |
//! |------|--------------------------------|-------------------------------|--------------|
//! | Near | every live post                | newest first                  | `near_cap`   |
//! | Mid  | every live post                | engagement, newest, id        | `mid_cap`    |
//! | Far  | nothing (clusters are drawn)   | -                             | -            |
//!
//! The Near cap only exists as a safety valve and defaults high enough that
//! nearby content is never dropped in practice.

use crate::post::{by_priority, by_recency, LiveWindow, Post};
use crate::viewport::DisplayMode;

/// Default safety cap for the Near tier.
pub const DEFAULT_NEAR_CAP: usize = 500;

/// Default render cap for the Mid tier.
pub const DEFAULT_MID_CAP: usize = 60;

/// Chooses which posts are drawn as individual markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityFilter {
    near_cap: usize,
    mid_cap: usize,
}

impl Default for VisibilityFilter {
    fn default() -> Self {
        Self {
            near_cap: DEFAULT_NEAR_CAP,
            mid_cap: DEFAULT_MID_CAP,
        }
    }
}

impl VisibilityFilter {
    /// Create a filter with explicit caps.
    pub fn new(near_cap: usize, mid_cap: usize) -> Self {
        Self { near_cap, mid_cap }
    }

    /// Safety cap applied in the Near tier.
    pub fn near_cap(&self) -> usize {
        self.near_cap
    }

    /// Render cap applied in the Mid tier.
    pub fn mid_cap(&self) -> usize {
        self.mid_cap
    }

    /// Select and order the posts to draw individually.
    ///
    /// Expired posts are skipped. The result is fully determined by the
    /// post set, the tier and the window; input order does not matter.
    pub fn select_visible(&self, posts: &[Post], mode: DisplayMode, window: &LiveWindow) -> Vec<Post> {
        let mut live: Vec<&Post> = window.live(posts).collect();
        let cap = match mode {
            DisplayMode::Far => return Vec::new(),
            DisplayMode::Near => {
                live.sort_by(|a, b| by_recency(a, b));
                self.near_cap
            }
            DisplayMode::Mid => {
                live.sort_by(|a, b| by_priority(a, b));
                self.mid_cap
            }
        };

        if live.len() > cap {
            tracing::trace!(
                mode = %mode,
                live = live.len(),
                cap,
                "Visibility cap reached, dropping lowest-priority posts"
            );
            live.truncate(cap);
        }

        live.into_iter().cloned().collect()
    }
}
