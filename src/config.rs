//! Configuration resolution: CLI arguments plus an optional TOML file.

use crate::server::RequestsLoggingLevel;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Values parsed from the TOML config file. All optional; values present
/// in the file override CLI arguments.
#[derive(Deserialize, Debug, Default)]
pub struct FileConfig {
    pub db_path: Option<PathBuf>,
    pub port: Option<u16>,
    pub logging_level: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<FileConfig> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        toml::from_str(&text).with_context(|| format!("Failed to parse config file {:?}", path))
    }
}

/// CLI arguments subject to file override.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
}

fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    use clap::ValueEnum;
    RequestsLoggingLevel::from_str(s, true).ok()
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> AppConfig {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .or_else(|| cli.db_path.clone())
            .unwrap_or_else(|| PathBuf::from("reviews.db"));

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        AppConfig {
            db_path,
            port,
            logging_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_values_used_without_file_config() {
        let cli = CliConfig {
            db_path: Some(PathBuf::from("/tmp/x.db")),
            port: 4000,
            logging_level: RequestsLoggingLevel::Headers,
        };

        let resolved = AppConfig::resolve(&cli, None);
        assert_eq!(resolved.db_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(resolved.port, 4000);
        assert_eq!(resolved.logging_level, RequestsLoggingLevel::Headers);
    }

    #[test]
    fn file_values_override_cli() {
        let cli = CliConfig {
            db_path: Some(PathBuf::from("/tmp/cli.db")),
            port: 4000,
            logging_level: RequestsLoggingLevel::Path,
        };
        let file: FileConfig = toml::from_str(
            "db_path = \"/tmp/file.db\"\nport = 5000\nlogging_level = \"none\"\n",
        )
        .unwrap();

        let resolved = AppConfig::resolve(&cli, Some(file));
        assert_eq!(resolved.db_path, PathBuf::from("/tmp/file.db"));
        assert_eq!(resolved.port, 5000);
        assert_eq!(resolved.logging_level, RequestsLoggingLevel::None);
    }

    #[test]
    fn db_path_defaults_when_unset() {
        let resolved = AppConfig::resolve(&CliConfig::default(), None);
        assert_eq!(resolved.db_path, PathBuf::from("reviews.db"));
    }

    #[test]
    fn unknown_logging_level_in_file_falls_back_to_cli() {
        let file: FileConfig = toml::from_str("logging_level = \"verbose\"\n").unwrap();
        let cli = CliConfig {
            logging_level: RequestsLoggingLevel::Body,
            ..CliConfig::default()
        };

        let resolved = AppConfig::resolve(&cli, Some(file));
        assert_eq!(resolved.logging_level, RequestsLoggingLevel::Body);
    }
}
