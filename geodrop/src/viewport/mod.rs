//! Viewport state: map centre plus visible span.
//!
//! # Validation Policy
//!
//! Invalid regions are **rejected**, never clamped. A region write that fails
//! [`ViewportRegion::validate`] leaves the engine's previous region in place
//! and returns a [`ViewportError`]. Clamping would silently move the map
//! somewhere the caller did not ask for.

mod display_mode;

pub use display_mode::{classify, DisplayMode, DisplayThresholds, FAR_THRESHOLD, NEAR_THRESHOLD};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::{CoordError, Coordinate};

/// Largest latitude delta a viewport can show.
pub const MAX_LATITUDE_DELTA: f64 = 180.0;

/// Largest longitude delta a viewport can show.
pub const MAX_LONGITUDE_DELTA: f64 = 360.0;

/// Errors produced by region validation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ViewportError {
    /// The centre coordinate is out of range.
    #[error("Invalid viewport center: {0}")]
    InvalidCenter(#[from] CoordError),

    /// The span is non-positive, non-finite or wider than the globe.
    #[error(
        "Invalid viewport span: {latitude_delta} x {longitude_delta} \
         (must be > 0 and at most {} x {})",
        MAX_LATITUDE_DELTA,
        MAX_LONGITUDE_DELTA
    )]
    InvalidSpan {
        latitude_delta: f64,
        longitude_delta: f64,
    },
}

/// Visible extent of the map in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// North-south extent in degrees (the zoom proxy).
    pub latitude_delta: f64,
    /// East-west extent in degrees.
    pub longitude_delta: f64,
}

impl Span {
    /// Create a span without validation.
    pub fn new(latitude_delta: f64, longitude_delta: f64) -> Self {
        Self {
            latitude_delta,
            longitude_delta,
        }
    }

    /// Create a square span.
    pub fn uniform(delta: f64) -> Self {
        Self::new(delta, delta)
    }

    /// Check both deltas are finite, positive and no wider than the globe.
    pub fn validate(&self) -> Result<(), ViewportError> {
        let lat_ok = self.latitude_delta.is_finite()
            && self.latitude_delta > 0.0
            && self.latitude_delta <= MAX_LATITUDE_DELTA;
        let lon_ok = self.longitude_delta.is_finite()
            && self.longitude_delta > 0.0
            && self.longitude_delta <= MAX_LONGITUDE_DELTA;

        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(ViewportError::InvalidSpan {
                latitude_delta: self.latitude_delta,
                longitude_delta: self.longitude_delta,
            })
        }
    }
}

/// The currently displayed map area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportRegion {
    /// Map centre.
    pub center: Coordinate,
    /// Visible extent.
    pub span: Span,
}

impl ViewportRegion {
    /// Create a validated region.
    pub fn new(center: Coordinate, span: Span) -> Result<Self, ViewportError> {
        let region = Self { center, span };
        region.validate()?;
        Ok(region)
    }

    /// Check the centre and span.
    pub fn validate(&self) -> Result<(), ViewportError> {
        self.center.validate()?;
        self.span.validate()
    }

    /// Tier for this region under the given thresholds.
    pub fn display_mode(&self, thresholds: &DisplayThresholds) -> DisplayMode {
        thresholds.classify(self.span.latitude_delta)
    }
}

impl std::fmt::Display for ViewportRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} span {:.5}x{:.5}",
            self.center, self.span.latitude_delta, self.span.longitude_delta
        )
    }
}
