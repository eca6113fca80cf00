//! # kanban
//!
//! A personal kanban board for the terminal.
//!
//! Tasks live in three lanes (To Do, In Progress, Done) on a per-project
//! board. Projects are listed with their live task counts and can be
//! archived; nothing is ever hard-deleted except individual tasks.
//!
//! ## Quick Start
//!
//! ```bash
//! # Open the project list
//! kanban
//!
//! # Use a different database file
//! kanban --db ./work.db
//! ```
//!
//! Data is stored in a single SQLite file in the platform data directory
//! (`~/.local/share/kanban/kanban.db` on Linux). A `config.json` next to it
//! may override `db_path`, `log_file` and `log_level`; command-line flags
//! override the config file. Debug output goes to `debug.log` in the same
//! directory and honours `RUST_LOG`.

use std::process;

use clap::Parser;
use tracing::{error, info};

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod fields;
pub mod logging;
pub mod project;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod board;
    pub mod colors;
    pub mod effect;
    pub mod enums;
    pub mod input;
    pub mod keys;
    pub mod lane;
    pub mod project_list;
    pub mod run;
    pub mod task_form;
    pub mod task_view;
    pub mod utils;
}

use cli::Cli;
use config::{Config, Settings};
use db::Store;
use error::Result;

/// Resolve settings from flags, `config.json` and defaults.
fn settings(cli: &Cli) -> Result<Settings> {
    let data_dir = config::data_dir()?;
    let config = Config::load(&data_dir)?;
    Ok(Settings::resolve(cli, config, &data_dir))
}

fn main() {
    let cli = Cli::parse();

    let settings = match settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = logging::init(&settings.log_file, &settings.log_level) {
        eprintln!("error: failed to open log file {}: {}", settings.log_file.display(), e);
        process::exit(1);
    }
    info!(db = %settings.db_path.display(), "starting");

    let store = match Store::open(&settings.db_path) {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "failed to open store");
            eprintln!("error: failed to open {}: {}", settings.db_path.display(), e);
            process::exit(1);
        }
    };

    if let Err(e) = tui::run::run_tui(store) {
        error!(error = %e, "terminal ui failed");
        eprintln!("error: {}", e);
        process::exit(1);
    }
    info!("bye");
}
