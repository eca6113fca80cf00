//! Data directory resolution and the optional `config.json`.
//!
//! Everything lives under one directory: `<data dir>/kanban` by platform
//! convention, `$HOME/.kanban` when the platform has no data directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::{KanbanError, Result};

const APP_DIR: &str = "kanban";
const CONFIG_FILE: &str = "config.json";
const DB_FILE: &str = "kanban.db";
const LOG_FILE: &str = "debug.log";

/// Settings read from `config.json`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub db_path: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Config {
    /// Load `config.json` from `dir`. A missing file yields the defaults.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Config::default());
        }
        let raw = fs::read_to_string(&path)?;
        serde_json::from_str(&raw).map_err(|source| KanbanError::Config { path, source })
    }
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub log_file: PathBuf,
    pub log_level: String,
}

impl Settings {
    /// Combine CLI flags, the config file and defaults, in that order of precedence.
    pub fn resolve(cli: &Cli, config: Config, data_dir: &Path) -> Self {
        Settings {
            db_path: cli
                .db
                .clone()
                .or(config.db_path)
                .unwrap_or_else(|| data_dir.join(DB_FILE)),
            log_file: cli
                .log_file
                .clone()
                .or(config.log_file)
                .unwrap_or_else(|| data_dir.join(LOG_FILE)),
            log_level: config.log_level.unwrap_or_else(|| "info".to_string()),
        }
    }
}

/// Locate the data directory, creating it if needed.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match dirs::data_dir() {
        Some(base) => base.join(APP_DIR),
        None => dirs::home_dir().ok_or(KanbanError::NoDataDir)?.join(".kanban"),
    };
    fs::create_dir_all(&dir)?;
    Ok(dir)
}
