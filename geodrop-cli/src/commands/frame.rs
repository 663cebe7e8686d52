//! `geodrop frame` - evaluate a post file at a viewport and print the result.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::Args;
use geodrop::config::{EngineConfig, DEFAULT_SPAN};
use geodrop::coord::Coordinate;
use geodrop::engine::{FixedClock, MapEngine, MapFrame};
use geodrop::post::Post;

use crate::error::CliError;

/// Arguments for `geodrop frame`.
#[derive(Debug, Args)]
pub struct FrameArgs {
    /// JSON file holding an array of posts
    #[arg(long)]
    pub posts: PathBuf,

    /// Viewport centre latitude
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Viewport centre longitude
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,

    /// Visible span in degrees (zoom)
    #[arg(long, default_value_t = DEFAULT_SPAN)]
    pub span: f64,

    /// Evaluate expiry at this instant (RFC 3339) instead of now
    #[arg(long)]
    pub at: Option<String>,

    /// Print single-line JSON
    #[arg(long)]
    pub compact: bool,
}

/// Run the frame command.
pub fn run(args: FrameArgs, config: EngineConfig) -> Result<(), CliError> {
    let frame = build_frame(&args, config)?;
    let json = if args.compact {
        serde_json::to_string(frame.as_ref())
    } else {
        frame.to_json()
    }
    .map_err(CliError::Output)?;

    println!("{}", json);
    Ok(())
}

/// Load posts and evaluate them at the requested viewport.
pub fn build_frame(args: &FrameArgs, config: EngineConfig) -> Result<Arc<MapFrame>, CliError> {
    let now = match args.at.as_deref() {
        Some(at) => parse_instant(at)?,
        None => Utc::now(),
    };
    let posts = read_posts(&args.posts)?;

    let engine = MapEngine::try_with_clock(config, Arc::new(FixedClock::new(now)))?;
    let center = Coordinate {
        latitude: args.lat,
        longitude: args.lon,
    };
    engine.focus_on_location(center, args.span)?;

    let supplied = posts.len();
    let kept = engine.set_posts(posts);
    if kept < supplied {
        tracing::warn!(supplied, kept, "Some posts were dropped");
    }

    Ok(engine.frame())
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| CliError::InvalidTime(value.to_string()))
}

fn read_posts(path: &Path) -> Result<Vec<Post>, CliError> {
    let content = std::fs::read_to_string(path).map_err(|error| CliError::ReadPosts {
        path: path.to_path_buf(),
        error,
    })?;
    serde_json::from_str(&content).map_err(|error| CliError::ParsePosts {
        path: path.to_path_buf(),
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geodrop::viewport::DisplayMode;
    use tempfile::TempDir;

    const POSTS: &str = r#"[
        {"id": "quiet", "location": {"latitude": 40.75, "longitude": -73.99},
         "engagement": 1, "created_at": "2024-05-01T11:00:00Z"},
        {"id": "popular", "location": {"latitude": 40.76, "longitude": -73.98},
         "engagement": 40, "created_at": "2024-05-01T10:00:00Z"},
        {"id": "gone", "location": {"latitude": 40.755, "longitude": -73.985},
         "engagement": 99, "created_at": "2024-05-01T09:00:00Z",
         "expires_at": "2024-05-01T11:30:00Z"}
    ]"#;

    fn args(dir: &TempDir, span: f64) -> FrameArgs {
        let posts = dir.path().join("posts.json");
        std::fs::write(&posts, POSTS).unwrap();
        FrameArgs {
            posts,
            lat: 40.755,
            lon: -73.985,
            span,
            at: Some("2024-05-01T12:00:00Z".to_string()),
            compact: false,
        }
    }

    #[test]
    fn test_mid_frame_from_file() {
        let dir = TempDir::new().unwrap();
        let frame = build_frame(&args(&dir, 0.05), EngineConfig::default()).unwrap();

        assert_eq!(frame.mode, DisplayMode::Mid);
        let ids: Vec<&str> = frame.visible.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["popular", "quiet"]);
    }

    #[test]
    fn test_far_frame_from_file() {
        let dir = TempDir::new().unwrap();
        let frame = build_frame(&args(&dir, 2.0), EngineConfig::default()).unwrap();

        assert!(frame.visible.is_empty());
        assert_eq!(frame.clusters.iter().map(|c| c.count).sum::<usize>(), 2);
    }

    #[test]
    fn test_bad_time_rejected() {
        let dir = TempDir::new().unwrap();
        let mut args = args(&dir, 0.05);
        args.at = Some("noon".to_string());

        let err = build_frame(&args, EngineConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::InvalidTime(_)));
    }

    #[test]
    fn test_bad_viewport_rejected() {
        let dir = TempDir::new().unwrap();
        let mut args = args(&dir, 0.05);
        args.lat = 123.0;

        let err = build_frame(&args, EngineConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::Viewport(_)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = TempDir::new().unwrap();
        let mut config = EngineConfig::default();
        config.display.default_span = 0.0;

        let err = build_frame(&args(&dir, 0.05), config).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_missing_and_malformed_files() {
        let dir = TempDir::new().unwrap();
        let mut args = args(&dir, 0.05);

        args.posts = dir.path().join("absent.json");
        assert!(matches!(
            build_frame(&args, EngineConfig::default()),
            Err(CliError::ReadPosts { .. })
        ));

        std::fs::write(&args.posts, "{not json").unwrap();
        assert!(matches!(
            build_frame(&args, EngineConfig::default()),
            Err(CliError::ParsePosts { .. })
        ));
    }
}
