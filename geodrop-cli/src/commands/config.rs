//! `geodrop config` - inspect and create the configuration file.

use std::path::Path;

use clap::Subcommand;
use geodrop::config::EngineConfig;

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Print the effective configuration as INI
    Show,

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand against the file at `path`.
///
/// Only `show` parses the file; `path` and `init` work on a file that does
/// not load.
pub fn run(command: ConfigCommands, path: &Path) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommands::Show => {
            let config = EngineConfig::load_from(path)?;
            print!("{}", config.to_ini_string());
            Ok(())
        }
        ConfigCommands::Init { force } => {
            if write_defaults(path, force)? {
                println!("Wrote default configuration to {}", path.display());
            } else {
                println!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            Ok(())
        }
    }
}

/// Write defaults unless a file exists and `force` is off.
///
/// Returns whether the file was written.
fn write_defaults(path: &Path, force: bool) -> Result<bool, CliError> {
    if path.exists() && !force {
        return Ok(false);
    }
    EngineConfig::default().save_to(path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");

        assert!(write_defaults(&path, false).unwrap());
        assert_eq!(EngineConfig::load_from(&path).unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_init_respects_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[visibility]\nmid_cap = 5\n").unwrap();

        assert!(!write_defaults(&path, false).unwrap());
        assert_eq!(EngineConfig::load_from(&path).unwrap().visibility.mid_cap, 5);

        assert!(write_defaults(&path, true).unwrap());
        assert_eq!(EngineConfig::load_from(&path).unwrap().visibility.mid_cap, 60);
    }

    #[test]
    fn test_path_and_init_ignore_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[cluster]\ngrid_divisions = lots\n").unwrap();

        run(ConfigCommands::Path, &path).unwrap();
        assert!(matches!(
            run(ConfigCommands::Show, &path),
            Err(CliError::Config(_))
        ));

        run(ConfigCommands::Init { force: true }, &path).unwrap();
        run(ConfigCommands::Show, &path).unwrap();
        assert_eq!(EngineConfig::load_from(&path).unwrap(), EngineConfig::default());
    }
}
