//! INI serialization logic for converting `EngineConfig` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use super::settings::EngineConfig;

/// Convert an `EngineConfig` to a commented INI string for saving.
pub(super) fn to_config_string(config: &EngineConfig) -> String {
    let log_file = config
        .logging
        .file
        .as_ref()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();

    format!(
        r#"[display]
; Visible latitude span (degrees) below which every post is drawn
near_threshold = {}
; Span at or above which only clusters are drawn
far_threshold = {}
; Span used when centring on the user before any zoom was chosen
default_span = {}

[visibility]
; Safety cap on posts drawn at street level
near_cap = {}
; Top-ranked posts drawn at city level
mid_cap = {}

[cluster]
; Grid cells across the viewport height when zoomed out
grid_divisions = {}

[placement]
; Posts closer than span * coincidence_ratio are spread apart
coincidence_ratio = {}
; Radius of the spread ring as a fraction of the span
offset_ratio = {}

[opacity]
; Neighbourhood radius as a fraction of the span
density_ratio = {}
; Neighbours tolerated before fading starts
density_threshold = {}
; Opacity lost per extra neighbour
step = {}
; Lowest opacity (must be above 0)
floor = {}

[posts]
; Hours a post without an explicit expiry stays on the map (0 = forever)
lifetime_hours = {}

[logging]
; Log file (empty = stderr only)
file = {}
"#,
        config.display.near_threshold,
        config.display.far_threshold,
        config.display.default_span,
        config.visibility.near_cap,
        config.visibility.mid_cap,
        config.cluster.grid_divisions,
        config.placement.coincidence_ratio,
        config.placement.offset_ratio,
        config.opacity.density_ratio,
        config.opacity.density_threshold,
        config.opacity.step,
        config.opacity.floor,
        config.posts.lifetime_hours,
        log_file,
    )
}
