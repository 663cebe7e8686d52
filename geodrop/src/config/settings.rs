//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineConfig {
    /// Tier thresholds and the fallback span
    pub display: DisplaySettings,
    /// Render caps
    pub visibility: VisibilitySettings,
    /// Far-tier clustering grid
    pub cluster: ClusterSettings,
    /// Coincident marker spreading
    pub placement: PlacementSettings,
    /// Density fading
    pub opacity: OpacitySettings,
    /// Post lifetime
    pub posts: PostSettings,
    /// Log output
    pub logging: LoggingSettings,
}

/// Display tier configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySettings {
    /// Spans below this are Near.
    pub near_threshold: f64,
    /// Spans at or above this are Far.
    pub far_threshold: f64,
    /// Span used when recentring before any span was ever set.
    pub default_span: f64,
}

/// Visibility caps.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilitySettings {
    /// Safety cap on individually drawn posts in the Near tier.
    pub near_cap: usize,
    /// Render cap in the Mid tier.
    pub mid_cap: usize,
}

/// Clustering configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSettings {
    /// Grid cells across the viewport height.
    pub grid_divisions: u32,
}

/// Coincidence spreading configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementSettings {
    /// Coincidence radius as a fraction of the span.
    pub coincidence_ratio: f64,
    /// Ring radius as a fraction of the span.
    pub offset_ratio: f64,
}

/// Opacity configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct OpacitySettings {
    /// Density radius as a fraction of the span.
    pub density_ratio: f64,
    /// Neighbour count up to which posts stay fully opaque.
    pub density_threshold: usize,
    /// Opacity lost per extra neighbour.
    pub step: f32,
    /// Lowest opacity, in (0, 1].
    pub floor: f32,
}

/// Post lifetime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PostSettings {
    /// Lifetime of posts without an explicit expiry, in hours (0 = never expire).
    pub lifetime_hours: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoggingSettings {
    /// Log file path; `None` logs to stderr only.
    pub file: Option<PathBuf>,
}
