//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve database, log and export locations plus the log level.
//! - Keep defaults host-independent (temp dir based, build-mode log level).
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - `log_dir` defaults to an absolute path, as `init_logging` requires.

use crate::logging::default_log_level;
use std::path::PathBuf;

/// Database file path override.
pub const DB_PATH_ENV: &str = "GEOSAMPLES_DB_PATH";
/// Log directory override (absolute).
pub const LOG_DIR_ENV: &str = "GEOSAMPLES_LOG_DIR";
/// Log level override (`trace|debug|info|warn|error`).
pub const LOG_LEVEL_ENV: &str = "GEOSAMPLES_LOG_LEVEL";
/// CSV export directory override.
pub const EXPORT_DIR_ENV: &str = "GEOSAMPLES_EXPORT_DIR";

const APP_DIR_NAME: &str = "geosamples";
const DB_FILE_NAME: &str = "geosamples.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Resolved host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub export_dir: PathBuf,
}

impl AppConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let app_dir = std::env::temp_dir().join(APP_DIR_NAME);

        Self {
            db_path: read(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| app_dir.join(DB_FILE_NAME)),
            log_dir: read(LOG_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| app_dir.join(LOG_DIR_NAME)),
            log_level: read(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            export_dir: read(EXPORT_DIR_ENV)
                .map(PathBuf::from)
                .or_else(|| std::env::current_dir().ok())
                .unwrap_or(app_dir),
        }
    }
}
