//! Terminal setup and teardown around the router.

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};
use tracing::info;

use crate::db::Store;
use crate::error::Result;
use crate::tui::app::App;

/// Initialise the terminal, run the board until the user quits and restore
/// the terminal. The terminal is restored before any error is returned.
pub fn run_tui(store: Store) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    info!(width = size.width, height = size.height, "starting tui");
    let mut app = App::new(store, size.width, size.height);
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
