//! Runtime configuration for a local session.
//!
//! # Responsibility
//! - Resolve where the database file and rolling logs live.
//! - Carry the log level chosen by the host app.
//!
//! # Invariants
//! - The database and log directory are always derived from `data_dir`.

use crate::logging::default_log_level;
use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "DAYSTAR_DATA_DIR";

const DEFAULT_DATA_DIR_NAME: &str = "daystar";
const DB_FILE_NAME: &str = "daystar.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Root directory for all persisted files.
    pub data_dir: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
}

impl AppConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            log_level: default_log_level().to_string(),
        }
    }

    /// Uses `DAYSTAR_DATA_DIR` when set and non-blank, otherwise a
    /// `daystar` directory under the system temp dir.
    pub fn from_env() -> Self {
        let data_dir = std::env::var(DATA_DIR_ENV)
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|trimmed| !trimmed.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DATA_DIR_NAME));
        Self::new(data_dir)
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}
