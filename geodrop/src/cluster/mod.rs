//! Grid clustering for the Far tier.
//!
//! # Algorithm
//!
//! 1. Cell size = `span.latitude_delta / grid_divisions`, so a wider view
//!    produces a coarser grid.
//! 2. Every live post lands in the [`GridCell`] containing its coordinate.
//! 3. Each non-empty cell becomes one [`Cluster`].
//!
//! Bucketing is a single pass; the only super-linear step is sorting members
//! by id, which fixes the summation order of the centroid so the output is
//! bit-for-bit identical for any input order. Cells are emitted in row/column
//! order.
//!
//! Clusters partition the live posts exactly. Debug builds verify this after
//! every run.

mod grid;

pub use grid::GridCell;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::coord::{Coordinate, GeoBounds};
use crate::post::{by_priority, LiveWindow, Post, PostId};
use crate::viewport::{DisplayMode, Span};

/// Default number of grid cells across the viewport height.
pub const DEFAULT_GRID_DIVISIONS: u32 = 8;

/// A group of nearby posts drawn as a single marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Grid cell the cluster was built from; stable across pans at the same zoom.
    pub cell: GridCell,
    /// Mean of member coordinates.
    pub center: Coordinate,
    /// Member ids in ascending order.
    pub member_ids: Vec<PostId>,
    /// Number of members.
    pub count: usize,
    /// Box around all members.
    pub bounds: GeoBounds,
    /// Highest-priority member, suitable as a preview.
    pub lead: PostId,
}

impl Cluster {
    /// Whether the given post belongs to this cluster.
    pub fn contains(&self, id: &PostId) -> bool {
        self.member_ids.binary_search(id).is_ok()
    }

    /// Build a cluster from a non-empty member list.
    fn from_members(cell: GridCell, mut members: Vec<&Post>) -> Option<Self> {
        members.sort_by(|a, b| a.id.cmp(&b.id));

        let first = members.first()?;
        let mut bounds = GeoBounds::from_point(first.location);
        let (mut sum_lat, mut sum_lon) = (0.0, 0.0);
        for post in &members {
            sum_lat += post.location.latitude;
            sum_lon += post.location.longitude;
            bounds.expand(post.location);
        }

        let count = members.len();
        let n = count as f64;
        let lead = members
            .iter()
            .min_by(|a, b| by_priority(a, b))
            .map(|p| p.id.clone())?;

        Some(Self {
            cell,
            center: Coordinate::clamped(sum_lat / n, sum_lon / n),
            member_ids: members.into_iter().map(|p| p.id.clone()).collect(),
            count,
            bounds,
            lead,
        })
    }
}

/// Groups posts into grid clusters when zoomed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpatialClusterer {
    grid_divisions: u32,
}

impl Default for SpatialClusterer {
    fn default() -> Self {
        Self {
            grid_divisions: DEFAULT_GRID_DIVISIONS,
        }
    }
}

impl SpatialClusterer {
    /// Create a clusterer; zero divisions is treated as one.
    pub fn new(grid_divisions: u32) -> Self {
        Self {
            grid_divisions: grid_divisions.max(1),
        }
    }

    /// Grid cells across the viewport height.
    pub fn grid_divisions(&self) -> u32 {
        self.grid_divisions
    }

    /// Cell size in degrees for the given span.
    pub fn cell_size(&self, span: &Span) -> f64 {
        span.latitude_delta / f64::from(self.grid_divisions)
    }

    /// Cluster the live posts.
    ///
    /// Only the Far tier produces clusters; Near and Mid draw individual posts
    /// and get an empty list.
    pub fn cluster(
        &self,
        posts: &[Post],
        mode: DisplayMode,
        span: &Span,
        window: &LiveWindow,
    ) -> Vec<Cluster> {
        if !mode.shows_clusters() {
            return Vec::new();
        }

        let cell_size = self.cell_size(span);
        if !(cell_size.is_finite() && cell_size > 0.0) {
            tracing::warn!(
                latitude_delta = span.latitude_delta,
                "Cannot cluster with a degenerate span"
            );
            return Vec::new();
        }

        let mut buckets: BTreeMap<GridCell, Vec<&Post>> = BTreeMap::new();
        let mut live_count = 0usize;
        for post in window.live(posts) {
            buckets
                .entry(GridCell::containing(&post.location, cell_size))
                .or_default()
                .push(post);
            live_count += 1;
        }

        let clusters: Vec<Cluster> = buckets
            .into_iter()
            .filter_map(|(cell, members)| Cluster::from_members(cell, members))
            .collect();

        debug_assert_partition(live_count, &clusters);

        tracing::trace!(
            posts = live_count,
            clusters = clusters.len(),
            cell_size,
            "Clustered posts"
        );

        clusters
    }
}

/// Panic in debug builds if clusters do not partition the live posts.
#[inline]
fn debug_assert_partition(live_count: usize, clusters: &[Cluster]) {
    if cfg!(debug_assertions) {
        let total: usize = clusters.iter().map(|c| c.count).sum();
        debug_assert_eq!(total, live_count, "clusters dropped or duplicated posts");

        let mut seen = std::collections::HashSet::with_capacity(total);
        for id in clusters.iter().flat_map(|c| c.member_ids.iter()) {
            debug_assert!(seen.insert(id), "post {} appears in two clusters", id);
        }
    }
}
