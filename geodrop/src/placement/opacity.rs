//! Density-based fading of crowded markers.
//!
//! ```text
//!  opacity
//!   1.0 ┤━━━━━━━━━┓
//!       │         ┗━┓  step per extra neighbour
//!       │           ┗━┓
//! floor ┤             ┗━━━━━━━━━━━━━
//!       └─────────┬───────────────── density
//!             threshold
//! ```

use std::collections::HashMap;

use crate::post::{Post, PostId};
use crate::viewport::Span;

use super::neighbours::NeighbourIndex;

/// Default density radius as a fraction of the span.
pub const DEFAULT_DENSITY_RATIO: f64 = 0.05;

/// Neighbour count up to which posts stay fully opaque.
pub const DEFAULT_DENSITY_THRESHOLD: usize = 3;

/// Opacity lost per neighbour above the threshold.
pub const DEFAULT_OPACITY_STEP: f32 = 0.1;

/// Lowest opacity a visible post can reach.
pub const DEFAULT_OPACITY_FLOOR: f32 = 0.35;

/// Maps local point density to a render alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpacityCalculator {
    density_threshold: usize,
    step: f32,
    floor: f32,
}

impl Default for OpacityCalculator {
    fn default() -> Self {
        Self {
            density_threshold: DEFAULT_DENSITY_THRESHOLD,
            step: DEFAULT_OPACITY_STEP,
            floor: DEFAULT_OPACITY_FLOOR,
        }
    }
}

impl OpacityCalculator {
    /// Create a calculator.
    ///
    /// `floor` is clamped into `(0, 1]` and `step` to be non-negative, so the
    /// result is always strictly positive and never increases with density.
    pub fn new(density_threshold: usize, step: f32, floor: f32) -> Self {
        Self {
            density_threshold,
            step: step.max(0.0),
            floor: floor.clamp(f32::EPSILON, 1.0),
        }
    }

    /// Lowest opacity this calculator returns.
    pub fn floor(&self) -> f32 {
        self.floor
    }

    /// Opacity for a post with `density` neighbours (`None`: unknown).
    pub fn opacity(&self, density: Option<usize>) -> f32 {
        match density {
            Some(d) if d > self.density_threshold => {
                let excess = (d - self.density_threshold) as f32;
                (1.0 - self.step * excess).max(self.floor)
            }
            _ => 1.0,
        }
    }
}

/// Count, for each post, how many *other* posts lie within
/// `span.latitude_delta * density_ratio` degrees.
pub fn local_density(posts: &[Post], span: &Span, density_ratio: f64) -> HashMap<PostId, usize> {
    let radius = span.latitude_delta * density_ratio;
    if !(radius.is_finite() && radius > 0.0) {
        return posts.iter().map(|p| (p.id.clone(), 0)).collect();
    }

    let index = NeighbourIndex::build(posts, radius);
    posts
        .iter()
        .map(|post| {
            let others = index
                .within(&post.location)
                .filter(|(id, _)| *id != post.id)
                .count();
            (post.id.clone(), others)
        })
        .collect()
}
