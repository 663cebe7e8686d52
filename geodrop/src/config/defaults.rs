//! Default values for all configuration settings.
//!
//! The tunable constants themselves live next to the components that use
//! them; this module only assembles them into the section defaults.

use super::settings::*;
use crate::cluster::DEFAULT_GRID_DIVISIONS;
use crate::placement::{
    DEFAULT_COINCIDENCE_RATIO, DEFAULT_DENSITY_RATIO, DEFAULT_DENSITY_THRESHOLD,
    DEFAULT_OFFSET_RATIO, DEFAULT_OPACITY_FLOOR, DEFAULT_OPACITY_STEP,
};
use crate::post::DEFAULT_POST_LIFETIME_HOURS;
use crate::viewport::{FAR_THRESHOLD, NEAR_THRESHOLD};
use crate::visibility::{DEFAULT_MID_CAP, DEFAULT_NEAR_CAP};

/// Span used when recentring before any region was set (city level).
pub const DEFAULT_SPAN: f64 = 0.05;

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            near_threshold: NEAR_THRESHOLD,
            far_threshold: FAR_THRESHOLD,
            default_span: DEFAULT_SPAN,
        }
    }
}

impl Default for VisibilitySettings {
    fn default() -> Self {
        Self {
            near_cap: DEFAULT_NEAR_CAP,
            mid_cap: DEFAULT_MID_CAP,
        }
    }
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            grid_divisions: DEFAULT_GRID_DIVISIONS,
        }
    }
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            coincidence_ratio: DEFAULT_COINCIDENCE_RATIO,
            offset_ratio: DEFAULT_OFFSET_RATIO,
        }
    }
}

impl Default for OpacitySettings {
    fn default() -> Self {
        Self {
            density_ratio: DEFAULT_DENSITY_RATIO,
            density_threshold: DEFAULT_DENSITY_THRESHOLD,
            step: DEFAULT_OPACITY_STEP,
            floor: DEFAULT_OPACITY_FLOOR,
        }
    }
}

impl Default for PostSettings {
    fn default() -> Self {
        Self {
            lifetime_hours: DEFAULT_POST_LIFETIME_HOURS,
        }
    }
}
