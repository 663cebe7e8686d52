//! INI parsing logic for converting `Ini` → `EngineConfig`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::EngineConfig;

/// Parse an `Ini` object into an `EngineConfig`.
///
/// Starts from `EngineConfig::default()` and overlays any values found in the
/// INI, then validates the result as a whole.
pub(super) fn parse_ini(ini: &Ini) -> Result<EngineConfig, ConfigFileError> {
    let mut config = EngineConfig::default();

    // [display] section
    if let Some(section) = ini.section(Some("display")) {
        let s = Section::new("display", section);
        s.parse_into("near_threshold", &mut config.display.near_threshold, "must be a number")?;
        s.parse_into("far_threshold", &mut config.display.far_threshold, "must be a number")?;
        s.parse_into("default_span", &mut config.display.default_span, "must be a number")?;
    }

    // [visibility] section
    if let Some(section) = ini.section(Some("visibility")) {
        let s = Section::new("visibility", section);
        s.parse_into("near_cap", &mut config.visibility.near_cap, "must be a positive integer")?;
        s.parse_into("mid_cap", &mut config.visibility.mid_cap, "must be a positive integer")?;
    }

    // [cluster] section
    if let Some(section) = ini.section(Some("cluster")) {
        let s = Section::new("cluster", section);
        s.parse_into(
            "grid_divisions",
            &mut config.cluster.grid_divisions,
            "must be a positive integer",
        )?;
    }

    // [placement] section
    if let Some(section) = ini.section(Some("placement")) {
        let s = Section::new("placement", section);
        s.parse_into(
            "coincidence_ratio",
            &mut config.placement.coincidence_ratio,
            "must be a number",
        )?;
        s.parse_into("offset_ratio", &mut config.placement.offset_ratio, "must be a number")?;
    }

    // [opacity] section
    if let Some(section) = ini.section(Some("opacity")) {
        let s = Section::new("opacity", section);
        s.parse_into("density_ratio", &mut config.opacity.density_ratio, "must be a number")?;
        s.parse_into(
            "density_threshold",
            &mut config.opacity.density_threshold,
            "must be a non-negative integer",
        )?;
        s.parse_into("step", &mut config.opacity.step, "must be a number")?;
        s.parse_into("floor", &mut config.opacity.floor, "must be a number")?;
    }

    // [posts] section
    if let Some(section) = ini.section(Some("posts")) {
        let s = Section::new("posts", section);
        s.parse_into(
            "lifetime_hours",
            &mut config.posts.lifetime_hours,
            "must be a non-negative integer",
        )?;
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            config.logging.file = if v.is_empty() {
                None
            } else {
                Some(expand_tilde(v))
            };
        }
    }

    config.validate()?;
    Ok(config)
}

/// A named INI section with typed accessors.
struct Section<'a> {
    name: &'static str,
    props: &'a Properties,
}

impl<'a> Section<'a> {
    fn new(name: &'static str, props: &'a Properties) -> Self {
        Self { name, props }
    }

    /// Overwrite `target` with the parsed value of `key`, if present.
    fn parse_into<T: FromStr>(
        &self,
        key: &str,
        target: &mut T,
        reason: &str,
    ) -> Result<(), ConfigFileError> {
        let Some(raw) = self.props.get(key) else {
            return Ok(());
        };
        let raw = raw.trim();
        *target = raw.parse().map_err(|_| ConfigFileError::InvalidValue {
            section: self.name.to_string(),
            key: key.to_string(),
            value: raw.to_string(),
            reason: reason.to_string(),
        })?;
        Ok(())
    }
}

/// Expand a leading `~` to the user's home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
