//! Engine configuration.
//!
//! [`EngineConfig`] groups the tunables of every component by concern, one
//! struct per INI section. It is loaded from `~/.geodrop/config.ini` (missing
//! file means defaults) and turned into component instances with the builder
//! methods below.
//!
//! # Example
//!
//! ```
//! use geodrop::config::EngineConfig;
//! use geodrop::viewport::DisplayMode;
//!
//! let config = EngineConfig::from_ini_str("[visibility]\nmid_cap = 20\n").unwrap();
//! assert_eq!(config.visibility_filter().mid_cap(), 20);
//! assert_eq!(config.thresholds().classify(0.05), DisplayMode::Mid);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::DEFAULT_SPAN;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ClusterSettings, DisplaySettings, EngineConfig, LoggingSettings, OpacitySettings,
    PlacementSettings, PostSettings, VisibilitySettings,
};

use chrono::TimeDelta;

use crate::cluster::SpatialClusterer;
use crate::placement::{OpacityCalculator, PositionAdjuster};
use crate::post::lifetime_from_hours;
use crate::viewport::{DisplayThresholds, Span, MAX_LATITUDE_DELTA};
use crate::visibility::VisibilityFilter;

impl EngineConfig {
    /// Check cross-field constraints.
    ///
    /// Called after parsing; also useful for configs assembled in code.
    pub fn validate(&self) -> Result<(), ConfigFileError> {
        let display = &self.display;
        if !(display.near_threshold.is_finite() && display.near_threshold > 0.0) {
            return Err(invalid("display", "near_threshold", display.near_threshold, "must be above 0"));
        }
        if !(display.far_threshold.is_finite() && display.far_threshold > display.near_threshold) {
            return Err(invalid(
                "display",
                "far_threshold",
                display.far_threshold,
                "must be greater than near_threshold",
            ));
        }
        if !(display.default_span > 0.0 && display.default_span <= MAX_LATITUDE_DELTA) {
            return Err(invalid(
                "display",
                "default_span",
                display.default_span,
                "must be in (0, 180]",
            ));
        }

        if self.visibility.near_cap == 0 {
            return Err(invalid("visibility", "near_cap", 0, "must be at least 1"));
        }
        if self.visibility.mid_cap == 0 {
            return Err(invalid("visibility", "mid_cap", 0, "must be at least 1"));
        }

        if self.cluster.grid_divisions == 0 {
            return Err(invalid("cluster", "grid_divisions", 0, "must be at least 1"));
        }

        for (key, value) in [
            ("coincidence_ratio", self.placement.coincidence_ratio),
            ("offset_ratio", self.placement.offset_ratio),
        ] {
            if !is_positive(value) {
                return Err(invalid("placement", key, value, "must be a positive number"));
            }
        }

        let opacity = &self.opacity;
        if !is_positive(opacity.density_ratio) {
            return Err(invalid(
                "opacity",
                "density_ratio",
                opacity.density_ratio,
                "must be a positive number",
            ));
        }
        if !(opacity.step.is_finite() && opacity.step >= 0.0) {
            return Err(invalid("opacity", "step", opacity.step, "must not be negative"));
        }
        if !(opacity.floor > 0.0 && opacity.floor <= 1.0) {
            return Err(invalid("opacity", "floor", opacity.floor, "must be in (0, 1]"));
        }

        Ok(())
    }

    /// Tier thresholds.
    pub fn thresholds(&self) -> DisplayThresholds {
        DisplayThresholds::new(self.display.near_threshold, self.display.far_threshold)
    }

    /// Span used before any region has been set.
    pub fn default_span(&self) -> Span {
        Span::uniform(self.display.default_span)
    }

    pub fn visibility_filter(&self) -> VisibilityFilter {
        VisibilityFilter::new(self.visibility.near_cap, self.visibility.mid_cap)
    }

    pub fn clusterer(&self) -> SpatialClusterer {
        SpatialClusterer::new(self.cluster.grid_divisions)
    }

    pub fn position_adjuster(&self) -> PositionAdjuster {
        PositionAdjuster::new(self.placement.coincidence_ratio, self.placement.offset_ratio)
    }

    pub fn opacity_calculator(&self) -> OpacityCalculator {
        OpacityCalculator::new(
            self.opacity.density_threshold,
            self.opacity.step,
            self.opacity.floor,
        )
    }

    /// Lifetime of posts without an explicit expiry; `None` means forever.
    pub fn post_lifetime(&self) -> Option<TimeDelta> {
        lifetime_from_hours(self.posts.lifetime_hours)
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn invalid(
    section: &str,
    key: &str,
    value: impl std::fmt::Display,
    reason: &str,
) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::DisplayMode;

    #[test]
    fn test_default_config_is_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let mut config = EngineConfig::default();
        config.display.far_threshold = config.display.near_threshold;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("display.far_threshold"));
    }

    #[test]
    fn test_zero_caps_rejected() {
        let mut config = EngineConfig::default();
        config.visibility.mid_cap = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.cluster.grid_divisions = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_ratio_rejected() {
        let mut config = EngineConfig::default();
        config.placement.offset_ratio = f64::NAN;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("placement.offset_ratio"));
    }

    #[test]
    fn test_builders_follow_settings() {
        let mut config = EngineConfig::default();
        config.display.near_threshold = 0.02;
        config.visibility.near_cap = 7;
        config.cluster.grid_divisions = 4;
        config.opacity.floor = 0.5;
        config.posts.lifetime_hours = 0;

        assert_eq!(config.thresholds().classify(0.015), DisplayMode::Near);
        assert_eq!(config.visibility_filter().near_cap(), 7);
        assert_eq!(config.clusterer().grid_divisions(), 4);
        assert_eq!(config.opacity_calculator().floor(), 0.5);
        assert!(config.post_lifetime().is_none());
        assert_eq!(config.default_span(), Span::uniform(DEFAULT_SPAN));
    }

    #[test]
    fn test_default_lifetime_is_a_day() {
        assert_eq!(
            EngineConfig::default().post_lifetime(),
            Some(TimeDelta::hours(24))
        );
    }
}
