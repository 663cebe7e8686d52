//! One consistent evaluation of region + posts.
//!
//! A [`MapFrame`] holds every derived output of a single recomputation. All
//! of them share one [`LiveWindow`], so a post is either live everywhere in a
//! frame or nowhere.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::cluster::{Cluster, SpatialClusterer};
use crate::config::EngineConfig;
use crate::coord::Coordinate;
use crate::placement::{local_density, CoincidenceIndex, OpacityCalculator, PositionAdjuster};
use crate::post::{LiveWindow, Post, PostId};
use crate::viewport::{DisplayMode, DisplayThresholds, ViewportRegion};
use crate::visibility::VisibilityFilter;

/// Everything the map needs to draw one state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFrame {
    /// Write revision the frame was computed from.
    pub revision: u64,
    /// Instant expiry was judged at.
    pub evaluated_at: DateTime<Utc>,
    /// Earliest instant a post in the set expires; the frame is stale after it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<DateTime<Utc>>,
    pub region: ViewportRegion,
    pub mode: DisplayMode,
    /// Individually drawn posts, in draw priority order.
    pub visible: Vec<Post>,
    pub clusters: Vec<Cluster>,
    /// Display position of every visible post.
    pub positions: BTreeMap<PostId, Coordinate>,
    /// Render alpha of every visible post.
    pub opacities: BTreeMap<PostId, f32>,
}

impl MapFrame {
    /// Whether the frame still describes the world at `now`.
    pub fn is_current_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.evaluated_at && self.valid_until.map_or(true, |until| now < until)
    }

    /// Pretty-printed JSON for tooling.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// The component chain, built once from configuration.
#[derive(Debug, Clone)]
pub(super) struct Pipeline {
    thresholds: DisplayThresholds,
    filter: VisibilityFilter,
    clusterer: SpatialClusterer,
    adjuster: PositionAdjuster,
    opacity: OpacityCalculator,
    density_ratio: f64,
    lifetime: Option<TimeDelta>,
}

impl Pipeline {
    pub(super) fn from_config(config: &EngineConfig) -> Self {
        Self {
            thresholds: config.thresholds(),
            filter: config.visibility_filter(),
            clusterer: config.clusterer(),
            adjuster: config.position_adjuster(),
            opacity: config.opacity_calculator(),
            density_ratio: config.opacity.density_ratio,
            lifetime: config.post_lifetime(),
        }
    }

    pub(super) fn thresholds(&self) -> &DisplayThresholds {
        &self.thresholds
    }

    /// Classify, select, cluster, then place and fade the visible set.
    pub(super) fn run(
        &self,
        region: ViewportRegion,
        posts: &[Post],
        now: DateTime<Utc>,
        revision: u64,
    ) -> (MapFrame, CoincidenceIndex) {
        let window = LiveWindow::new(now, self.lifetime);
        let span = region.span;
        let mode = region.display_mode(&self.thresholds);

        let visible = self.filter.select_visible(posts, mode, &window);
        let clusters = self.clusterer.cluster(posts, mode, &span, &window);

        let coincidence = self.adjuster.index(&visible, &span);
        let positions = visible
            .iter()
            .map(|p| (p.id.clone(), coincidence.adjusted_position(&p.id, p.location)))
            .collect();

        // Near draws everything at full alpha and Far draws no posts, so
        // density only matters in Mid.
        let opacities = if mode == DisplayMode::Mid {
            local_density(&visible, &span, self.density_ratio)
                .into_iter()
                .map(|(id, density)| (id, self.opacity.opacity(Some(density))))
                .collect()
        } else {
            visible.iter().map(|p| (p.id.clone(), 1.0)).collect()
        };

        let frame = MapFrame {
            revision,
            evaluated_at: now,
            valid_until: window.next_expiry(posts),
            region,
            mode,
            visible,
            clusters,
            positions,
            opacities,
        };

        (frame, coincidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::Span;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn region(span: f64) -> ViewportRegion {
        ViewportRegion::new(Coordinate::new(40.0, -74.0).unwrap(), Span::uniform(span)).unwrap()
    }

    fn post(id: &str, lat: f64, lon: f64, likes: u32) -> Post {
        Post::new(id, Coordinate::new(lat, lon).unwrap(), likes, t0())
    }

    #[test]
    fn test_mid_frame_fades_crowded_posts() {
        let pipeline = Pipeline::from_config(&EngineConfig::default());
        // Eight posts within a few metres of each other: seven neighbours each.
        let posts: Vec<Post> = (0..8)
            .map(|i| post(&format!("p{i}"), 40.0 + i as f64 * 1e-4, -74.0, i))
            .collect();

        let (frame, _) = pipeline.run(region(0.05), &posts, t0(), 1);
        assert_eq!(frame.mode, DisplayMode::Mid);
        assert_eq!(frame.visible.len(), 8);
        for opacity in frame.opacities.values() {
            assert!((*opacity - 0.6).abs() < 1e-6, "opacity {opacity}");
        }
    }

    #[test]
    fn test_near_frame_is_fully_opaque() {
        let pipeline = Pipeline::from_config(&EngineConfig::default());
        let posts: Vec<Post> = (0..8)
            .map(|i| post(&format!("p{i}"), 40.0 + i as f64 * 1e-5, -74.0, 0))
            .collect();

        let (frame, _) = pipeline.run(region(0.005), &posts, t0(), 1);
        assert_eq!(frame.mode, DisplayMode::Near);
        assert!(frame.opacities.values().all(|o| *o == 1.0));
        assert_eq!(frame.positions.len(), 8);
    }

    #[test]
    fn test_valid_until_is_next_expiry() {
        let pipeline = Pipeline::from_config(&EngineConfig::default());
        let soon = post("soon", 40.0, -74.0, 0).with_expiry(t0() + TimeDelta::minutes(5));
        let later = post("later", 40.001, -74.0, 0);

        let (frame, _) = pipeline.run(region(0.005), &[soon, later], t0(), 1);
        assert_eq!(frame.valid_until, Some(t0() + TimeDelta::minutes(5)));
        assert!(frame.is_current_at(t0() + TimeDelta::minutes(4)));
        assert!(!frame.is_current_at(t0() + TimeDelta::minutes(5)));
        assert!(!frame.is_current_at(t0() - TimeDelta::seconds(1)));
    }

    #[test]
    fn test_far_frame_has_no_positions() {
        let pipeline = Pipeline::from_config(&EngineConfig::default());
        let posts = vec![post("a", 40.0, -74.0, 0), post("b", 41.0, -73.0, 0)];

        let (frame, _) = pipeline.run(region(0.5), &posts, t0(), 1);
        assert!(frame.visible.is_empty());
        assert!(frame.positions.is_empty());
        assert!(frame.opacities.is_empty());
        assert_eq!(frame.clusters.iter().map(|c| c.count).sum::<usize>(), 2);
    }

    #[test]
    fn test_frame_json_shape() {
        let pipeline = Pipeline::from_config(&EngineConfig::default());
        let posts = vec![post("a", 40.0, -74.0, 3)];

        let (frame, _) = pipeline.run(region(0.005), &posts, t0(), 7);
        let value: serde_json::Value = serde_json::from_str(&frame.to_json().unwrap()).unwrap();
        assert_eq!(value["mode"], "near");
        assert_eq!(value["revision"], 7);
        assert_eq!(value["visible"][0]["id"], "a");
        assert_eq!(value["opacities"]["a"], 1.0);
    }
}
