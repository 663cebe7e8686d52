//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use geodrop::config::ConfigFileError;
use geodrop::viewport::ViewportError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(ConfigFileError),
    /// Failed to read the posts file
    ReadPosts { path: PathBuf, error: std::io::Error },
    /// Posts file is not a JSON array of posts
    ParsePosts {
        path: PathBuf,
        error: serde_json::Error,
    },
    /// `--at` is not an RFC 3339 timestamp
    InvalidTime(String),
    /// Viewport arguments rejected by the engine
    Viewport(ViewportError),
    /// Failed to serialize output
    Output(serde_json::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::ParsePosts { .. } => {
                eprintln!();
                eprintln!("Expected a JSON array such as:");
                eprintln!(
                    r#"  [{{"id": "a", "location": {{"latitude": 40.7, "longitude": -74.0}}, "engagement": 3, "created_at": "2024-05-01T12:00:00Z"}}]"#
                );
            }
            CliError::Viewport(_) => {
                eprintln!();
                eprintln!("Latitude must be within ±90, longitude within ±180,");
                eprintln!("and the span must be above 0 and at most 180 degrees.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::ReadPosts { path, error } => {
                write!(f, "Failed to read posts from '{}': {}", path.display(), error)
            }
            CliError::ParsePosts { path, error } => {
                write!(f, "Failed to parse posts in '{}': {}", path.display(), error)
            }
            CliError::InvalidTime(value) => {
                write!(f, "Invalid time '{}' (expected RFC 3339, e.g. 2024-05-01T12:00:00Z)", value)
            }
            CliError::Viewport(e) => write!(f, "{}", e),
            CliError::Output(e) => write!(f, "Failed to write output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::ReadPosts { error, .. } => Some(error),
            CliError::ParsePosts { error, .. } => Some(error),
            CliError::Viewport(e) => Some(e),
            CliError::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<ViewportError> for CliError {
    fn from(e: ViewportError) -> Self {
        CliError::Viewport(e)
    }
}
