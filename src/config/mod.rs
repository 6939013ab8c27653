mod file_config;

pub use file_config::FileConfig;

use crate::server::{RequestsLoggingLevel, ServerConfig};
use anyhow::Result;
use clap::ValueEnum;
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub top_n: usize,
    pub peer_count: usize,
    pub content_weight: f32,
    pub collab_weight: f32,
    pub cache_snapshots: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub top_n: usize,
    pub peer_count: usize,
    pub content_weight: f32,
    pub collab_weight: f32,
    pub cache_snapshots: bool,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.db_path.clone());

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let top_n = file.top_n.unwrap_or(cli.top_n);
        let peer_count = file.peer_count.unwrap_or(cli.peer_count);
        let content_weight = file.content_weight.unwrap_or(cli.content_weight);
        let collab_weight = file.collab_weight.unwrap_or(cli.collab_weight);
        let cache_snapshots = file.cache_snapshots.unwrap_or(cli.cache_snapshots);

        Ok(Self {
            db_path,
            port,
            logging_level,
            top_n,
            peer_count,
            content_weight,
            collab_weight,
            cache_snapshots,
        })
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level.clone(),
            port: self.port,
            top_n: self.top_n,
            peer_count: self.peer_count,
            content_weight: self.content_weight,
            collab_weight: self.collab_weight,
        }
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli() -> CliConfig {
        CliConfig {
            db_path: PathBuf::from("library.db"),
            port: 3001,
            logging_level: RequestsLoggingLevel::Path,
            top_n: 10,
            peer_count: 2,
            content_weight: 0.8,
            collab_weight: 0.2,
            cache_snapshots: false,
        }
    }

    #[test]
    fn test_parse_logging_level() {
        assert!(matches!(
            parse_logging_level("none"),
            Some(RequestsLoggingLevel::None)
        ));
        assert!(matches!(
            parse_logging_level("path"),
            Some(RequestsLoggingLevel::Path)
        ));
        assert!(matches!(
            parse_logging_level("headers"),
            Some(RequestsLoggingLevel::Headers)
        ));
        assert!(matches!(
            parse_logging_level("full"),
            Some(RequestsLoggingLevel::Full)
        ));
        // Case insensitive
        assert!(matches!(
            parse_logging_level("FULL"),
            Some(RequestsLoggingLevel::Full)
        ));
        // Invalid
        assert!(parse_logging_level("invalid").is_none());
    }

    #[test]
    fn test_resolve_cli_only() {
        let config = AppConfig::resolve(&cli(), None).unwrap();
        assert_eq!(config.db_path, PathBuf::from("library.db"));
        assert_eq!(config.port, 3001);
        assert_eq!(config.top_n, 10);
        assert_eq!(config.peer_count, 2);
        assert!(!config.cache_snapshots);
    }

    #[test]
    fn test_toml_overrides_cli() {
        let file: FileConfig = toml::from_str(
            r#"
            port = 4000
            logging_level = "headers"
            top_n = 5
            cache_snapshots = true
            "#,
        )
        .unwrap();
        let config = AppConfig::resolve(&cli(), Some(file)).unwrap();
        assert_eq!(config.port, 4000);
        assert!(matches!(
            config.logging_level,
            RequestsLoggingLevel::Headers
        ));
        assert_eq!(config.top_n, 5);
        assert!(config.cache_snapshots);
        // Untouched fields keep their CLI values.
        assert_eq!(config.peer_count, 2);
        assert_eq!(config.db_path, PathBuf::from("library.db"));
    }

    #[test]
    fn test_server_config_projection() {
        let config = AppConfig::resolve(&cli(), None).unwrap();
        let server = config.server_config();
        assert_eq!(server.port, 3001);
        assert_eq!(server.top_n, 10);
        assert!((server.content_weight - 0.8).abs() < f32::EPSILON);
    }
}
