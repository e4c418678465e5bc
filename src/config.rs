//! Store configuration
//!
//! The database location is an explicit value handed to the store, never a
//! process-wide constant. Resolution order: explicit value, `IBGE_DB`
//! (after loading `.env`), then [`DEFAULT_DB_PATH`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{GeoError, Result};
use crate::store::SqliteStore;

pub const DB_ENV_VAR: &str = "IBGE_DB";
pub const DEFAULT_DB_PATH: &str = "data/ibge.sqlite";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoConfig {
    /// Path to the SQLite database holding the five record sets
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from(DEFAULT_DB_PATH)
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl GeoConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self { db_path: db_path.into() }
    }

    /// Read `IBGE_DB` from the environment or a `.env` file.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let config = match std::env::var(DB_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::new(path.trim()),
            _ => Self::default(),
        };
        debug!(db_path = %config.db_path.display(), "resolved store configuration");
        config
    }

    /// Load from a `.yaml`/`.yml` or `.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)?,
            Some("json") => serde_json::from_str(&text)?,
            other => {
                return Err(GeoError::Config(format!(
                    "unsupported config format {:?} for {}",
                    other.unwrap_or(""),
                    path.display()
                )))
            }
        };
        // relative database paths are taken from the config file's directory
        if config.db_path.is_relative() {
            if let Some(dir) = path.parent() {
                config.db_path = dir.join(&config.db_path);
            }
        }
        Ok(config)
    }

    pub fn open_store(&self) -> Result<SqliteStore> {
        SqliteStore::open(&self.db_path)
    }
}
