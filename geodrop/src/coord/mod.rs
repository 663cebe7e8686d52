//! Geographic coordinate primitives
//!
//! Provides the WGS84 latitude/longitude pair used throughout the engine,
//! range validation, and the small amount of planar geometry the engine needs
//! for neighbourhood checks.
//!
//! All geometry is done in plain degrees. At the span sizes the engine works
//! with (a few metres up to a continent) a flat approximation is good enough
//! for deciding which markers overlap on screen.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;

/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;

/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;

/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Errors produced when validating coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordError {
    /// Latitude is outside -90.0..=90.0 or not finite.
    #[error("Invalid latitude: {0} (must be between {} and {})", MIN_LAT, MAX_LAT)]
    InvalidLatitude(f64),

    /// Longitude is outside -180.0..=180.0 or not finite.
    #[error("Invalid longitude: {0} (must be between {} and {})", MIN_LON, MAX_LON)]
    InvalidLongitude(f64),
}

/// A geographic point in decimal degrees.
///
/// Construct through [`Coordinate::new`] when the input is untrusted; the
/// fields stay public so deserialized data can be checked afterwards with
/// [`Coordinate::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl Coordinate {
    /// Create a validated coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError`] if either component is out of range or not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordError> {
        let coord = Self {
            latitude,
            longitude,
        };
        coord.validate()?;
        Ok(coord)
    }

    /// Create a coordinate by clamping both components into range.
    ///
    /// Non-finite components collapse to zero.
    pub fn clamped(latitude: f64, longitude: f64) -> Self {
        let finite_or_zero = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self {
            latitude: finite_or_zero(latitude).clamp(MIN_LAT, MAX_LAT),
            longitude: finite_or_zero(longitude).clamp(MIN_LON, MAX_LON),
        }
    }

    /// Check that both components are finite and in range.
    #[inline]
    pub fn validate(&self) -> Result<(), CoordError> {
        if !self.latitude.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&self.latitude) {
            return Err(CoordError::InvalidLatitude(self.latitude));
        }
        if !self.longitude.is_finite() || !(MIN_LON..=MAX_LON).contains(&self.longitude) {
            return Err(CoordError::InvalidLongitude(self.longitude));
        }
        Ok(())
    }

    /// Whether both components are finite and in range.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Move this point by the given deltas (degrees).
    ///
    /// Latitude is clamped to the poles and longitude wraps across the
    /// antimeridian so the result is always a valid coordinate.
    pub fn offset(&self, d_lat: f64, d_lon: f64) -> Self {
        Self {
            latitude: (self.latitude + d_lat).clamp(MIN_LAT, MAX_LAT),
            longitude: wrap_longitude(self.longitude + d_lon),
        }
    }

    /// Euclidean distance to another point in degrees.
    ///
    /// Longitude difference takes the short way around the antimeridian.
    #[inline]
    pub fn planar_distance(&self, other: &Coordinate) -> f64 {
        let d_lat = self.latitude - other.latitude;
        let mut d_lon = (self.longitude - other.longitude).abs();
        if d_lon > 180.0 {
            d_lon = 360.0 - d_lon;
        }
        (d_lat * d_lat + d_lon * d_lon).sqrt()
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Wrap a longitude into -180.0..=180.0.
#[inline]
pub fn wrap_longitude(lon: f64) -> f64 {
    if (MIN_LON..=MAX_LON).contains(&lon) {
        return lon;
    }
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid maps +180 to -180; keep the sign the caller was heading towards
    if wrapped == -180.0 && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}

/// Geographic bounding box.
///
/// Represents the minimum bounding rectangle containing a set of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    /// Minimum (southernmost) latitude
    pub min_lat: f64,
    /// Maximum (northernmost) latitude
    pub max_lat: f64,
    /// Minimum (westernmost) longitude
    pub min_lon: f64,
    /// Maximum (easternmost) longitude
    pub max_lon: f64,
}

impl GeoBounds {
    /// Create a bounding box from a single point.
    pub fn from_point(coord: Coordinate) -> Self {
        Self {
            min_lat: coord.latitude,
            max_lat: coord.latitude,
            min_lon: coord.longitude,
            max_lon: coord.longitude,
        }
    }

    /// Expand this bounding box to include a point.
    pub fn expand(&mut self, coord: Coordinate) {
        self.min_lat = self.min_lat.min(coord.latitude);
        self.max_lat = self.max_lat.max(coord.latitude);
        self.min_lon = self.min_lon.min(coord.longitude);
        self.max_lon = self.max_lon.max(coord.longitude);
    }

    /// Whether the point lies inside (or on the edge of) the box.
    pub fn contains(&self, coord: &Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&coord.latitude)
            && (self.min_lon..=self.max_lon).contains(&coord.longitude)
    }

    /// Get the width of the bounds in degrees.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Get the height of the bounds in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_valid_range() {
        assert!(Coordinate::new(37.7749, -122.4194).is_ok());
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert_eq!(
            Coordinate::new(90.1, 0.0),
            Err(CoordError::InvalidLatitude(90.1))
        );
        assert_eq!(
            Coordinate::new(0.0, -180.5),
            Err(CoordError::InvalidLongitude(-180.5))
        );
    }

    #[test]
    fn test_new_rejects_non_finite() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_error_display_mentions_range() {
        let err = Coordinate::new(100.0, 0.0).unwrap_err();
        assert!(err.to_string().contains("Invalid latitude: 100"));
    }

    #[test]
    fn test_clamped() {
        let c = Coordinate::clamped(120.0, -200.0);
        assert_eq!(c.latitude, 90.0);
        assert_eq!(c.longitude, -180.0);

        let c = Coordinate::clamped(f64::NAN, 10.0);
        assert_eq!(c.latitude, 0.0);
        assert_eq!(c.longitude, 10.0);
    }

    #[test]
    fn test_offset_wraps_antimeridian() {
        let c = Coordinate::new(10.0, 179.9).unwrap();
        let moved = c.offset(0.0, 0.2);
        assert!((moved.longitude - (-179.9)).abs() < 1e-9);
        assert!(moved.is_valid());
    }

    #[test]
    fn test_offset_clamps_pole() {
        let c = Coordinate::new(89.99, 0.0).unwrap();
        assert_eq!(c.offset(0.5, 0.0).latitude, 90.0);
    }

    #[test]
    fn test_planar_distance() {
        let a = Coordinate::new(0.0, 0.0).unwrap();
        let b = Coordinate::new(3.0, 4.0).unwrap();
        assert!((a.planar_distance(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_planar_distance_across_antimeridian() {
        let a = Coordinate::new(0.0, 179.5).unwrap();
        let b = Coordinate::new(0.0, -179.5).unwrap();
        assert!((a.planar_distance(&b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrap_longitude() {
        assert_eq!(wrap_longitude(45.0), 45.0);
        assert!((wrap_longitude(190.0) - (-170.0)).abs() < 1e-9);
        assert!((wrap_longitude(-190.0) - 170.0).abs() < 1e-9);
        assert_eq!(wrap_longitude(540.0), 180.0);
    }

    #[test]
    fn test_bounds_expand_and_contains() {
        let mut bounds = GeoBounds::from_point(Coordinate::new(53.5, 9.7).unwrap());
        bounds.expand(Coordinate::new(54.0, 10.5).unwrap());

        assert!((bounds.height() - 0.5).abs() < 1e-9);
        assert!((bounds.width() - 0.8).abs() < 1e-9);
        assert!(bounds.contains(&Coordinate::new(53.8, 10.0).unwrap()));
        assert!(!bounds.contains(&Coordinate::new(55.0, 10.0).unwrap()));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_offset_always_valid(
                lat in -90.0..=90.0_f64,
                lon in -180.0..=180.0_f64,
                d_lat in -5.0..5.0_f64,
                d_lon in -400.0..400.0_f64
            ) {
                let c = Coordinate::new(lat, lon)?;
                let moved = c.offset(d_lat, d_lon);
                prop_assert!(moved.is_valid(), "{} moved to invalid {}", c, moved);
            }

            #[test]
            fn test_distance_symmetric(
                a_lat in -90.0..=90.0_f64,
                a_lon in -180.0..=180.0_f64,
                b_lat in -90.0..=90.0_f64,
                b_lon in -180.0..=180.0_f64
            ) {
                let a = Coordinate::new(a_lat, a_lon)?;
                let b = Coordinate::new(b_lat, b_lon)?;
                prop_assert!((a.planar_distance(&b) - b.planar_distance(&a)).abs() < 1e-9);
            }
        }
    }
}
