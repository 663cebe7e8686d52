//! Mutable engine state and post-set intake.

use std::collections::HashMap;
use std::sync::Arc;

use crate::placement::CoincidenceIndex;
use crate::post::{Post, PostId};
use crate::viewport::ViewportRegion;

use super::frame::MapFrame;

/// Everything behind the engine lock.
#[derive(Debug, Default)]
pub(super) struct EngineState {
    /// Last accepted region; `None` until the first successful write.
    pub(super) region: Option<ViewportRegion>,
    /// Working post set, one entry per id.
    pub(super) posts: Vec<Post>,
    /// Bumped on every accepted write.
    pub(super) revision: u64,
    /// Derived outputs for `revision`; dropped on every write.
    pub(super) cached: Option<CachedFrame>,
}

/// A computed frame plus the lookup structure behind its positions.
#[derive(Debug, Clone)]
pub(super) struct CachedFrame {
    pub(super) frame: Arc<MapFrame>,
    pub(super) coincidence: Arc<CoincidenceIndex>,
}

/// Drop posts with invalid coordinates and collapse duplicate ids.
///
/// A later duplicate replaces the earlier one in the earlier one's slot.
pub(super) fn sanitize_posts(posts: Vec<Post>) -> Vec<Post> {
    let mut kept: Vec<Post> = Vec::with_capacity(posts.len());
    let mut slots: HashMap<PostId, usize> = HashMap::with_capacity(posts.len());

    for post in posts {
        if let Err(e) = post.location.validate() {
            tracing::warn!(post = %post.id, error = %e, "Dropping post with invalid location");
            continue;
        }

        match slots.get(&post.id) {
            Some(&slot) => {
                tracing::warn!(post = %post.id, "Duplicate post id, keeping the last occurrence");
                kept[slot] = post;
            }
            None => {
                slots.insert(post.id.clone(), kept.len());
                kept.push(post);
            }
        }
    }

    kept
}
