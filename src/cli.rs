use std::path::PathBuf;

use clap::Parser;

/// Terminal kanban board.
/// Storage defaults to kanban.db in the platform data directory.
#[derive(Parser, Debug)]
#[command(name = "kanban", version, about = "Personal kanban board for the terminal")]
pub struct Cli {
    /// Path to the SQLite database file.
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Path to the debug log file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
