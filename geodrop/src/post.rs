//! Location-anchored posts as seen by the engine.
//!
//! Posts are owned by the external post store; the engine only keeps a
//! read-only snapshot per recomputation. The engagement score is the one
//! field that changes after creation (likes), and the engine never writes it
//! except when the caller pushes an update through
//! [`crate::engine::MapEngine::update_engagement`].

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::coord::Coordinate;

/// Default lifetime of a post without an explicit expiry.
pub const DEFAULT_POST_LIFETIME_HOURS: u32 = 24;

/// Unique identifier of a post.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    /// Create a post id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PostId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A short message or image dropped at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Unique identity.
    pub id: PostId,
    /// Where the post was dropped.
    pub location: Coordinate,
    /// Popularity score (like count).
    #[serde(default)]
    pub engagement: u32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Explicit expiry. When absent the post lives for the configured lifetime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Create a post with no explicit expiry.
    pub fn new(
        id: impl Into<PostId>,
        location: Coordinate,
        engagement: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            location,
            engagement,
            created_at,
            expires_at: None,
        }
    }

    /// Set an explicit expiry.
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// The instant this post stops being shown.
    ///
    /// `lifetime` is applied to `created_at` only when no explicit expiry is
    /// set; `None` means posts without an explicit expiry never expire.
    pub fn effective_expiry(&self, lifetime: Option<TimeDelta>) -> Option<DateTime<Utc>> {
        self.expires_at
            .or_else(|| lifetime.and_then(|l| self.created_at.checked_add_signed(l)))
    }

    /// Whether the post has expired at `now`.
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>, lifetime: Option<TimeDelta>) -> bool {
        self.effective_expiry(lifetime)
            .is_some_and(|expiry| expiry <= now)
    }
}

/// Convert a lifetime in hours to a delta; zero disables implied expiry.
pub fn lifetime_from_hours(hours: u32) -> Option<TimeDelta> {
    if hours == 0 {
        None
    } else {
        TimeDelta::try_hours(i64::from(hours))
    }
}

/// The instant posts are judged against, plus the implied lifetime.
///
/// Every derived output of one recomputation uses the same window so a post
/// cannot be visible in one list and expired in another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveWindow {
    /// Evaluation instant.
    pub now: DateTime<Utc>,
    /// Lifetime of posts without an explicit expiry.
    pub lifetime: Option<TimeDelta>,
}

impl LiveWindow {
    /// Create a window at `now` with the given implied lifetime.
    pub fn new(now: DateTime<Utc>, lifetime: Option<TimeDelta>) -> Self {
        Self { now, lifetime }
    }

    /// Whether the post is still shown at this window's instant.
    #[inline]
    pub fn is_live(&self, post: &Post) -> bool {
        !post.is_expired(self.now, self.lifetime)
    }

    /// Iterate over the live posts of a slice.
    pub fn live<'a>(&'a self, posts: &'a [Post]) -> impl Iterator<Item = &'a Post> + 'a {
        posts.iter().filter(move |p| self.is_live(p))
    }

    /// Earliest expiry among live posts, if any post will expire.
    ///
    /// Cached results stay valid until this instant.
    pub fn next_expiry<'a>(&self, posts: impl IntoIterator<Item = &'a Post>) -> Option<DateTime<Utc>> {
        posts
            .into_iter()
            .filter_map(|p| p.effective_expiry(self.lifetime))
            .filter(|expiry| *expiry > self.now)
            .min()
    }
}

/// Display priority: engagement descending, then newest first, then id.
///
/// The id tiebreak makes the order total so ranking never depends on the
/// order posts were supplied in.
pub fn by_priority(a: &Post, b: &Post) -> Ordering {
    b.engagement
        .cmp(&a.engagement)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Recency order: newest first, then id.
pub fn by_recency(a: &Post, b: &Post) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn post(id: &str, engagement: u32, minutes: i64) -> Post {
        Post::new(
            id,
            Coordinate::new(37.77, -122.42).unwrap(),
            engagement,
            t0() + TimeDelta::minutes(minutes),
        )
    }

    #[test]
    fn test_implied_expiry_after_lifetime() {
        let p = post("a", 0, 0);
        let lifetime = lifetime_from_hours(24);

        assert!(!p.is_expired(t0() + TimeDelta::hours(23), lifetime));
        assert!(p.is_expired(t0() + TimeDelta::hours(24), lifetime));
    }

    #[test]
    fn test_explicit_expiry_wins() {
        let p = post("a", 0, 0).with_expiry(t0() + TimeDelta::hours(1));
        let lifetime = lifetime_from_hours(24);

        assert!(p.is_expired(t0() + TimeDelta::hours(2), lifetime));
        assert_eq!(p.effective_expiry(lifetime), Some(t0() + TimeDelta::hours(1)));
    }

    #[test]
    fn test_zero_lifetime_never_expires() {
        let p = post("a", 0, 0);
        assert!(lifetime_from_hours(0).is_none());
        assert!(!p.is_expired(t0() + TimeDelta::days(365), None));
    }

    #[test]
    fn test_live_window_filters_expired() {
        let window = LiveWindow::new(t0() + TimeDelta::hours(2), lifetime_from_hours(24));
        let posts = vec![
            post("live", 0, 0),
            post("gone", 0, 0).with_expiry(t0() + TimeDelta::hours(1)),
        ];
        let live: Vec<_> = window.live(&posts).map(|p| p.id.as_str()).collect();
        assert_eq!(live, vec!["live"]);
    }

    #[test]
    fn test_next_expiry_ignores_past() {
        let window = LiveWindow::new(t0() + TimeDelta::hours(2), lifetime_from_hours(24));
        let posts = vec![
            post("a", 0, 0),
            post("b", 0, 0).with_expiry(t0() + TimeDelta::hours(3)),
            post("c", 0, 0).with_expiry(t0() + TimeDelta::hours(1)),
        ];
        assert_eq!(window.next_expiry(&posts), Some(t0() + TimeDelta::hours(3)));
        assert_eq!(LiveWindow::new(t0(), None).next_expiry(&[post("d", 0, 0)]), None);
    }

    #[test]
    fn test_by_priority_engagement_then_recency() {
        let mut posts = vec![post("a", 1, 0), post("b", 5, 0), post("c", 1, 10)];
        posts.sort_by(by_priority);
        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_by_priority_id_tiebreak() {
        let mut posts = vec![post("z", 3, 0), post("m", 3, 0)];
        posts.sort_by(by_priority);
        assert_eq!(posts[0].id.as_str(), "m");
    }

    #[test]
    fn test_by_recency() {
        let mut posts = vec![post("a", 9, 0), post("b", 0, 5)];
        posts.sort_by(by_recency);
        assert_eq!(posts[0].id.as_str(), "b");
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{
            "id": "p-1",
            "location": { "latitude": 40.0, "longitude": -74.0 },
            "created_at": "2025-06-01T12:00:00Z"
        }"#;
        let p: Post = serde_json::from_str(json).unwrap();
        assert_eq!(p.id, PostId::new("p-1"));
        assert_eq!(p.engagement, 0);
        assert!(p.expires_at.is_none());
    }
}
