//! The map engine: owns the viewport and the post set, and answers
//! "what should be drawn" for the current state.
//!
//! # Architecture
//!
//! ```text
//!  writers                         MapEngine                          readers
//!  ───────                ┌──────────────────────────────┐          ───────
//!  set_region ──┐         │ Mutex<EngineState>           │
//!  focus_on ────┼──lock──►│   region, posts, revision    │──lock──► frame()
//!  set_posts ───┘         │   cached frame (lazy)        │          visible_posts()
//!                         └──────────────┬───────────────┘          clusters()
//!                                        │ revision
//!                                        ▼
//!                               watch::Sender<u64> ──► subscribe()
//! ```
//!
//! Every write replaces whole values under the lock and drops the cached
//! frame, so readers never see a centre from one write paired with a span
//! from another. Reads rebuild the frame on demand; a cached frame is also
//! rebuilt once the clock passes the next post expiry, so expired posts
//! disappear without any write.
//!
//! There is no global instance. Construct one per map screen and share it
//! with `Arc`.

mod clock;
mod frame;
mod state;

pub use clock::{Clock, FixedClock, SystemClock};
pub use frame::MapFrame;

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::cluster::Cluster;
use crate::config::{ConfigFileError, EngineConfig};
use crate::coord::Coordinate;
use crate::post::{Post, PostId};
use crate::viewport::{DisplayMode, Span, ViewportError, ViewportRegion};

use frame::Pipeline;
use state::{CachedFrame, EngineState};

/// Coordinator for viewport-adaptive post display.
pub struct MapEngine {
    config: EngineConfig,
    pipeline: Pipeline,
    clock: Arc<dyn Clock>,
    state: Mutex<EngineState>,
    revisions: watch::Sender<u64>,
}

impl std::fmt::Debug for MapEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MapEngine")
            .field("region", &state.region)
            .field("posts", &state.posts.len())
            .field("revision", &state.revision)
            .finish()
    }
}

impl Default for MapEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl MapEngine {
    /// Create an engine that judges expiry against wall-clock time.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create an engine with an explicit time source.
    ///
    /// An invalid configuration is replaced by the defaults with a warning;
    /// use [`MapEngine::try_with_clock`] to reject it instead.
    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        match config.validate() {
            Ok(()) => Self::build(config, clock),
            Err(e) => {
                tracing::warn!(error = %e, "Invalid engine configuration, using defaults");
                Self::build(EngineConfig::default(), clock)
            }
        }
    }

    /// Create a wall-clock engine, rejecting an invalid configuration.
    pub fn try_new(config: EngineConfig) -> Result<Self, ConfigFileError> {
        Self::try_with_clock(config, Arc::new(SystemClock))
    }

    /// Create an engine with an explicit time source, rejecting an invalid
    /// configuration.
    pub fn try_with_clock(
        config: EngineConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigFileError> {
        config.validate()?;
        Ok(Self::build(config, clock))
    }

    fn build(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let (revisions, _) = watch::channel(0);
        Self {
            pipeline: Pipeline::from_config(&config),
            config,
            clock,
            state: Mutex::new(EngineState::default()),
            revisions,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────
    // Region writes
    // ─────────────────────────────────────────────────────────────────────

    /// Replace the viewport.
    ///
    /// An invalid region is rejected and the previous region is kept.
    pub fn set_region(&self, region: ViewportRegion) -> Result<(), ViewportError> {
        if let Err(e) = region.validate() {
            tracing::warn!(region = %region, error = %e, "Rejected region");
            return Err(e);
        }

        let mut state = self.state.lock();
        self.commit_region(&mut state, region);
        Ok(())
    }

    /// Centre the map on the user's location, keeping the current zoom.
    ///
    /// Before any region has been set the configured default span is used.
    pub fn set_initial_region_to_current_location(
        &self,
        location: Coordinate,
    ) -> Result<(), ViewportError> {
        let mut state = self.state.lock();
        let span = state
            .region
            .map(|r| r.span)
            .unwrap_or_else(|| self.config.default_span());

        let region = ViewportRegion::new(location, span).inspect_err(|e| {
            tracing::warn!(location = %location, error = %e, "Rejected recentre");
        })?;
        self.commit_region(&mut state, region);
        Ok(())
    }

    /// Centre on `location` with a square span of `zoom_level` degrees.
    pub fn focus_on_location(
        &self,
        location: Coordinate,
        zoom_level: f64,
    ) -> Result<(), ViewportError> {
        let region = ViewportRegion {
            center: location,
            span: Span::uniform(zoom_level),
        };
        self.set_region(region)
    }

    /// The last accepted region, if any.
    pub fn region(&self) -> Option<ViewportRegion> {
        self.state.lock().region
    }

    /// The region reads are evaluated against.
    ///
    /// Falls back to (0, 0) with the default span before any region was set.
    pub fn effective_region(&self) -> ViewportRegion {
        let state = self.state.lock();
        self.resolve_region(&state)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Post writes
    // ─────────────────────────────────────────────────────────────────────

    /// Replace the working post set.
    ///
    /// Posts with out-of-range coordinates are dropped and duplicate ids
    /// collapse to the last occurrence. Returns the number of posts kept.
    pub fn set_posts(&self, posts: Vec<Post>) -> usize {
        let posts = state::sanitize_posts(posts);
        let kept = posts.len();

        let mut state = self.state.lock();
        state.posts = posts;
        self.commit(&mut state);
        tracing::debug!(posts = kept, revision = state.revision, "Post set replaced");
        kept
    }

    /// Apply a like/unlike to one post.
    ///
    /// Returns `false` if no post has that id.
    pub fn update_engagement(&self, id: &PostId, engagement: u32) -> bool {
        let mut state = self.state.lock();
        let Some(post) = state.posts.iter_mut().find(|p| &p.id == id) else {
            tracing::debug!(post = %id, "Engagement update for unknown post");
            return false;
        };

        if post.engagement != engagement {
            post.engagement = engagement;
            self.commit(&mut state);
        }
        true
    }

    // ─────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────

    /// Tier of the effective region.
    pub fn current_display_mode(&self) -> DisplayMode {
        self.effective_region()
            .display_mode(self.pipeline.thresholds())
    }

    /// Posts drawn individually, in priority order.
    pub fn visible_posts(&self) -> Vec<Post> {
        self.frame().visible.clone()
    }

    /// Clusters drawn in the Far tier.
    pub fn clusters(&self) -> Vec<Cluster> {
        self.frame().clusters.clone()
    }

    /// Display position of a post.
    ///
    /// Returns `original` unchanged unless the post is visible and shares its
    /// spot with another visible post.
    pub fn adjusted_position(&self, id: &PostId, original: Coordinate) -> Coordinate {
        let cached = self.current_frame(&mut self.state.lock());
        cached.coincidence.adjusted_position(id, original)
    }

    /// Render alpha of a post; 1.0 for posts without density context.
    pub fn post_opacity(&self, id: &PostId) -> f32 {
        self.frame().opacities.get(id).copied().unwrap_or(1.0)
    }

    /// The current frame, rebuilt if stale.
    pub fn frame(&self) -> Arc<MapFrame> {
        self.current_frame(&mut self.state.lock()).frame
    }

    /// Rebuild the frame even if the cached one is current and return the
    /// clusters.
    pub fn update_clusters(&self) -> Vec<Cluster> {
        let mut state = self.state.lock();
        state.cached = None;
        self.current_frame(&mut state).frame.clusters.clone()
    }

    /// Receive the write revision after every accepted change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revisions.subscribe()
    }

    /// Current write revision.
    pub fn revision(&self) -> u64 {
        self.state.lock().revision
    }

    // ─────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────

    fn resolve_region(&self, state: &EngineState) -> ViewportRegion {
        state.region.unwrap_or_else(|| ViewportRegion {
            center: Coordinate::clamped(0.0, 0.0),
            span: self.config.default_span(),
        })
    }

    fn commit_region(&self, state: &mut EngineState, region: ViewportRegion) {
        if state.region == Some(region) {
            return;
        }
        state.region = Some(region);
        self.commit(state);
        tracing::debug!(region = %region, revision = state.revision, "Region updated");
    }

    /// Drop derived state and announce the new revision.
    fn commit(&self, state: &mut EngineState) {
        state.revision += 1;
        state.cached = None;
        self.revisions.send_replace(state.revision);
    }

    /// The cached frame, rebuilt first if missing or stale.
    fn current_frame(&self, state: &mut EngineState) -> CachedFrame {
        let now = self.clock.now();

        if let Some(cached) = state
            .cached
            .as_ref()
            .filter(|cached| cached.frame.is_current_at(now))
        {
            tracing::trace!(revision = state.revision, "Map frame cache hit");
            return cached.clone();
        }

        let region = self.resolve_region(state);
        let (frame, coincidence) = self.pipeline.run(region, &state.posts, now, state.revision);
        tracing::debug!(
            mode = %frame.mode,
            posts = state.posts.len(),
            visible = frame.visible.len(),
            clusters = frame.clusters.len(),
            revision = frame.revision,
            "Recomputed map frame"
        );

        let cached = CachedFrame {
            frame: Arc::new(frame),
            coincidence: Arc::new(coincidence),
        };
        state.cached = Some(cached.clone());
        cached
    }
}
