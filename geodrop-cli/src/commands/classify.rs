//! `geodrop classify` - show which tier a span falls in.

use geodrop::config::EngineConfig;
use geodrop::viewport::{DisplayMode, DisplayThresholds};

use crate::error::CliError;

/// Print the tier for `span` under the configured thresholds.
pub fn run(span: f64, config: &EngineConfig) -> Result<(), CliError> {
    println!("{}", describe(span, &config.thresholds()));
    Ok(())
}

/// One-line summary, e.g. `0.05 -> mid (top-ranked posts)`.
pub fn describe(span: f64, thresholds: &DisplayThresholds) -> String {
    let mode = thresholds.classify(span);
    let detail = match mode {
        DisplayMode::Near => "every post",
        DisplayMode::Mid => "top-ranked posts",
        DisplayMode::Far => "clusters only",
    };
    format!("{} -> {} ({})", span, mode, detail)
}
