//! Level-of-detail tier selection.
//!
//! The latitude delta of the visible span acts as the zoom proxy; at map
//! scale the viewport is close enough to square that the longitude delta adds
//! nothing.
//!
//! ```text
//!  span:  0 ─────── 0.01 ─────── 0.1 ──────────── 180
//!         │  Near    │    Mid     │      Far       │
//!         │ show all │ top-ranked │ clusters only  │
//! ```

use serde::{Deserialize, Serialize};

/// Spans below this are street/neighbourhood level.
pub const NEAR_THRESHOLD: f64 = 0.01;

/// Spans at or above this are region/country/global level.
pub const FAR_THRESHOLD: f64 = 0.1;

/// Discrete level-of-detail tier derived from the current span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Every live post is drawn individually.
    Near,
    /// A ranked, capped subset of posts is drawn.
    Mid,
    /// Only clusters are drawn.
    Far,
}

impl DisplayMode {
    /// Whether clusters are drawn in this tier.
    pub fn shows_clusters(&self) -> bool {
        matches!(self, DisplayMode::Far)
    }
}

impl std::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayMode::Near => write!(f, "near"),
            DisplayMode::Mid => write!(f, "mid"),
            DisplayMode::Far => write!(f, "far"),
        }
    }
}

/// Span thresholds separating the three tiers.
///
/// `near` must be strictly below `far`; the config layer enforces this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayThresholds {
    /// Upper (exclusive) bound of the Near tier.
    pub near: f64,
    /// Lower (inclusive) bound of the Far tier.
    pub far: f64,
}

impl Default for DisplayThresholds {
    fn default() -> Self {
        Self {
            near: NEAR_THRESHOLD,
            far: FAR_THRESHOLD,
        }
    }
}

impl DisplayThresholds {
    /// Create thresholds with explicit values.
    pub fn new(near: f64, far: f64) -> Self {
        Self { near, far }
    }

    /// Classify a latitude delta into a tier.
    ///
    /// Total over every `f64`: NaN compares false against both thresholds and
    /// lands in `Far`, the cheapest tier to render.
    #[inline]
    pub fn classify(&self, latitude_delta: f64) -> DisplayMode {
        if latitude_delta < self.near {
            DisplayMode::Near
        } else if latitude_delta < self.far {
            DisplayMode::Mid
        } else {
            DisplayMode::Far
        }
    }
}

/// Classify a latitude delta using the default thresholds.
#[inline]
pub fn classify(latitude_delta: f64) -> DisplayMode {
    DisplayThresholds::default().classify(latitude_delta)
}
