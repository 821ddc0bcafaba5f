//! Board runtime configuration.
//!
//! # Responsibility
//! - Collect storage and logging settings with their defaults.
//! - Apply `TASKBOARD_*` environment overrides.
//!
//! # Invariants
//! - Blank override values are ignored, never applied.

use crate::logging::default_log_level;
use crate::repo::task_repo::DEFAULT_SLOT_KEY;
use std::path::PathBuf;

/// Default SQLite file holding the board slot.
pub const DEFAULT_DB_FILE_NAME: &str = "taskboard.sqlite3";

pub const ENV_DB_PATH: &str = "TASKBOARD_DB";
pub const ENV_SLOT_KEY: &str = "TASKBOARD_SLOT_KEY";
pub const ENV_LOG_LEVEL: &str = "TASKBOARD_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TASKBOARD_LOG_DIR";

/// Settings for opening a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// SQLite file the slot store lives in.
    pub db_path: PathBuf,
    /// Slot key the collection is stored under.
    pub slot_key: String,
    /// Log level passed to [`crate::init_logging`].
    pub log_level: String,
    /// Absolute log directory; `None` leaves file logging off.
    pub log_dir: Option<PathBuf>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            slot_key: DEFAULT_SLOT_KEY.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl BoardConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from `lookup`, keyed by the `TASKBOARD_*` names.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(path) = read(ENV_DB_PATH) {
            self.db_path = PathBuf::from(path);
        }
        if let Some(key) = read(ENV_SLOT_KEY) {
            self.slot_key = key;
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(dir));
        }
        self
    }
}
