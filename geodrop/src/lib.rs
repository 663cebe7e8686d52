//! geodrop - Viewport-adaptive display of location-anchored posts
//!
//! This library decides, for the current map viewport and the current set of
//! short-lived posts, what the map should draw: individual markers at street
//! and city level, clusters when zoomed out, with coincident markers fanned
//! apart and crowded markers faded.
//!
//! # High-Level API
//!
//! [`engine::MapEngine`] owns the viewport and the post set and is the entry
//! point for most callers:
//!
//! ```
//! use geodrop::config::EngineConfig;
//! use geodrop::coord::Coordinate;
//! use geodrop::engine::MapEngine;
//! use geodrop::post::Post;
//! use geodrop::viewport::DisplayMode;
//!
//! let engine = MapEngine::try_new(EngineConfig::default())?;
//! engine.focus_on_location(Coordinate::new(40.75, -73.99)?, 0.005)?;
//! engine.set_posts(vec![Post::new(
//!     "hello",
//!     Coordinate::new(40.7505, -73.9901)?,
//!     3,
//!     chrono::Utc::now(),
//! )]);
//!
//! assert_eq!(engine.current_display_mode(), DisplayMode::Near);
//! assert_eq!(engine.visible_posts().len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The individual stages ([`viewport::classify`], [`visibility::VisibilityFilter`],
//! [`cluster::SpatialClusterer`], [`placement::PositionAdjuster`],
//! [`placement::OpacityCalculator`]) are pure and usable on their own.

pub mod cluster;
pub mod config;
pub mod coord;
pub mod engine;
pub mod logging;
pub mod placement;
pub mod post;
pub mod viewport;
pub mod visibility;

/// Version of the geodrop library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
