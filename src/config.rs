//! Database configuration
//!
//! A `DbConfig` names what to open and how: the database path, the access
//! mode, engine options, log level and the async client's worker count.
//! It is built in code or loaded from a JSON file; missing keys take the
//! defaults below.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::observability::Severity;
use crate::options::EngineOptions;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Database directory (the primary's, for a secondary)
    pub path: PathBuf,
    /// Replica's own directory; required when `read_only`
    pub secondary_path: Option<PathBuf>,
    /// Open as a secondary instance
    pub read_only: bool,
    pub options: EngineOptions,
    /// Minimum severity written by the logger
    pub log_level: Severity,
    /// Concurrent blocking calls allowed by the async client
    pub workers: usize,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            secondary_path: None,
            read_only: false,
            options: EngineOptions::default(),
            log_level: Severity::Info,
            workers: 1,
        }
    }
}

impl DbConfig {
    /// Read/write owner of `path`
    pub fn primary(path: impl Into<PathBuf>, options: EngineOptions) -> Self {
        Self {
            path: path.into(),
            options,
            ..Self::default()
        }
    }

    /// Read-only replica of `path` keeping its files in `secondary_path`
    pub fn secondary(
        path: impl Into<PathBuf>,
        secondary_path: impl Into<PathBuf>,
        options: EngineOptions,
    ) -> Self {
        Self {
            path: path.into(),
            secondary_path: Some(secondary_path.into()),
            read_only: true,
            options,
            ..Self::default()
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_log_level(mut self, log_level: Severity) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn from_json_file(path: &Path) -> DbResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| DbError::ConfigIo(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> DbResult<Self> {
        serde_json::from_str(content).map_err(|e| DbError::ConfigParse(e.to_string()))
    }

    /// Secondary path, ignoring an empty one
    pub fn effective_secondary_path(&self) -> Option<&Path> {
        self.secondary_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    pub fn validate(&self) -> DbResult<()> {
        if self.path.as_os_str().is_empty() {
            return Err(DbError::InvalidConfig("path must be non-empty".to_string()));
        }
        if self.workers == 0 {
            return Err(DbError::InvalidWorkers(self.workers));
        }
        match self.effective_secondary_path() {
            None if self.read_only => Err(DbError::MissingSecondaryPath),
            Some(secondary) if secondary == self.path.as_path() => Err(DbError::InvalidConfig(
                "secondary_path must differ from path".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = DbConfig::default();
        assert!(!config.read_only);
        assert_eq!(config.workers, 1);
        assert_eq!(config.log_level, Severity::Info);
        assert!(config.secondary_path.is_none());
    }

    #[test]
    fn test_primary_validates() {
        let config = DbConfig::primary("/tmp/db", EngineOptions::create_if_missing());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_read_only_requires_secondary_path() {
        let config = DbConfig {
            read_only: true,
            ..DbConfig::primary("/tmp/db", EngineOptions::default())
        };
        assert_eq!(config.validate(), Err(DbError::MissingSecondaryPath));

        let config = DbConfig {
            secondary_path: Some(PathBuf::new()),
            ..config
        };
        assert_eq!(config.validate(), Err(DbError::MissingSecondaryPath));
    }

    #[test]
    fn test_secondary_path_must_differ() {
        let config = DbConfig::secondary("/tmp/db", "/tmp/db", EngineOptions::default());
        assert!(matches!(config.validate(), Err(DbError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = DbConfig::primary("/tmp/db", EngineOptions::default()).with_workers(0);
        assert_eq!(config.validate(), Err(DbError::InvalidWorkers(0)));
    }

    #[test]
    fn test_load_from_json_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("db.json");
        fs::write(
            &file,
            r#"{
                "path": "/var/lib/strata",
                "read_only": true,
                "secondary_path": "/var/lib/strata-replica",
                "log_level": "warn",
                "workers": 4,
                "options": {"create_if_missing": true, "merge_operator": "max"}
            }"#,
        )
        .unwrap();

        let config = DbConfig::from_json_file(&file).unwrap();
        assert_eq!(config.path, PathBuf::from("/var/lib/strata"));
        assert!(config.read_only);
        assert_eq!(config.log_level, Severity::Warn);
        assert_eq!(config.workers, 4);
        assert!(config.options.create_if_missing);
        assert_eq!(config.options.merge_operator.as_deref(), Some("max"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        assert!(matches!(
            DbConfig::from_json_str("{\"workers\": \"many\"}"),
            Err(DbError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            DbConfig::from_json_file(&temp_dir.path().join("absent.json")),
            Err(DbError::ConfigIo(_))
        ));
    }
}
