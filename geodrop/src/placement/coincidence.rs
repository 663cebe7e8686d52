//! Spreading of visually coincident markers.
//!
//! When several visible posts sit within the coincidence radius of each other
//! they are fanned out on a small ring around their true location:
//!
//! ```text
//!            k=0
//!             *
//!    k=3 *    +    * k=1        + true location
//!             *                 * display position, θ = 2πk/n
//!            k=2
//! ```
//!
//! `k` is the post's rank among the group sorted by id, which keeps the
//! layout stable across recomputations. Both radii scale with the span so the
//! fan is the same size on screen at every zoom.

use std::f64::consts::TAU;

use crate::coord::Coordinate;
use crate::post::{Post, PostId};
use crate::viewport::Span;

use super::neighbours::NeighbourIndex;

/// Default coincidence radius as a fraction of the span.
pub const DEFAULT_COINCIDENCE_RATIO: f64 = 0.002;

/// Default ring radius as a fraction of the span.
pub const DEFAULT_OFFSET_RATIO: f64 = 0.01;

/// Lower bound on the coincidence radius (degrees, roughly 1 cm).
pub const MIN_COINCIDENCE_RADIUS: f64 = 1e-7;

/// Computes cosmetic display offsets for coincident posts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionAdjuster {
    coincidence_ratio: f64,
    offset_ratio: f64,
}

impl Default for PositionAdjuster {
    fn default() -> Self {
        Self {
            coincidence_ratio: DEFAULT_COINCIDENCE_RATIO,
            offset_ratio: DEFAULT_OFFSET_RATIO,
        }
    }
}

impl PositionAdjuster {
    /// Create an adjuster with explicit ratios.
    pub fn new(coincidence_ratio: f64, offset_ratio: f64) -> Self {
        Self {
            coincidence_ratio,
            offset_ratio,
        }
    }

    /// Distance under which two posts count as coincident.
    pub fn coincidence_radius(&self, span: &Span) -> f64 {
        (span.latitude_delta * self.coincidence_ratio).max(MIN_COINCIDENCE_RADIUS)
    }

    /// Radius of the ring coincident posts are spread on.
    ///
    /// This is also the furthest any post is ever displaced.
    pub fn ring_radius(&self, span: &Span) -> f64 {
        span.latitude_delta * self.offset_ratio
    }

    /// Index the visible set once so many positions can be queried cheaply.
    pub fn index<'a>(&self, visible: impl IntoIterator<Item = &'a Post>, span: &Span) -> CoincidenceIndex {
        CoincidenceIndex {
            neighbours: NeighbourIndex::build(visible, self.coincidence_radius(span)),
            ring_radius: self.ring_radius(span),
        }
    }

    /// Display position of a single post.
    ///
    /// Convenience over [`PositionAdjuster::index`] for one-off queries.
    pub fn adjusted_position(
        &self,
        id: &PostId,
        true_coord: Coordinate,
        visible: &[Post],
        span: &Span,
    ) -> Coordinate {
        self.index(visible, span).adjusted_position(id, true_coord)
    }
}

/// Visible posts indexed for coincidence lookups.
#[derive(Debug, Clone)]
pub struct CoincidenceIndex {
    neighbours: NeighbourIndex,
    ring_radius: f64,
}

impl CoincidenceIndex {
    /// Display position for `id` whose true location is `true_coord`.
    ///
    /// Returns `true_coord` unchanged when the post is not in the indexed set
    /// or has no coincident neighbour.
    pub fn adjusted_position(&self, id: &PostId, true_coord: Coordinate) -> Coordinate {
        let mut group: Vec<&PostId> = self
            .neighbours
            .within(&true_coord)
            .map(|(member, _)| member)
            .collect();

        if group.len() < 2 {
            return true_coord;
        }

        group.sort();
        let Ok(k) = group.binary_search(&id) else {
            return true_coord;
        };

        let theta = TAU * k as f64 / group.len() as f64;
        true_coord.offset(self.ring_radius * theta.cos(), self.ring_radius * theta.sin())
    }
}
