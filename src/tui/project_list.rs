//! Project list: open or archived projects with their live task counts.
//!
//! Every store interaction (load, create, archive) goes through the router as
//! an effect. Archiving only removes the row once the router reports that the
//! store accepted it.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::fields::ProjectStatus;
use crate::project::ProjectRow;
use crate::tui::{
    colors::{GREY, HIGHLIGHT, INPUT_BORDER},
    effect::{Effect, Event, Navigation, Route},
    input::InputField,
    keys::{full_help_lines, help_line, PROJECT_LIST_KEYS},
};

#[derive(Debug)]
pub struct ProjectList {
    view: ProjectStatus,
    rows: Vec<ProjectRow>,
    state: TableState,
    /// Inline name prompt while a project is being created.
    input: Option<InputField>,
    show_full_help: bool,
}

impl ProjectList {
    pub fn new() -> Self {
        ProjectList {
            view: ProjectStatus::Open,
            rows: Vec::new(),
            state: TableState::default(),
            input: None,
            show_full_help: false,
        }
    }

    /// Which projects are listed.
    pub fn view(&self) -> ProjectStatus {
        self.view
    }

    pub fn rows(&self) -> &[ProjectRow] {
        &self.rows
    }

    pub fn selected(&self) -> Option<&ProjectRow> {
        self.state.selected().and_then(|i| self.rows.get(i))
    }

    pub fn is_typing(&self) -> bool {
        self.input.is_some()
    }

    fn clamp_selection(&mut self) {
        if self.rows.is_empty() {
            self.state.select(None);
        } else {
            let index = self.state.selected().unwrap_or(0).min(self.rows.len() - 1);
            self.state.select(Some(index));
        }
    }

    fn select_next(&mut self) {
        if let Some(i) = self.state.selected() {
            if i + 1 < self.rows.len() {
                self.state.select(Some(i + 1));
            }
        }
    }

    fn select_previous(&mut self) {
        if let Some(i) = self.state.selected() {
            self.state.select(Some(i.saturating_sub(1)));
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::ProjectsLoaded(rows) => {
                self.rows = rows;
                self.clamp_selection();
            }
            Event::ProjectArchived { index } => {
                if index < self.rows.len() {
                    self.rows.remove(index);
                }
                self.clamp_selection();
            }
            Event::TaskCreated(_) | Event::TaskEdited { .. } | Event::LaneChanged(_) => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Navigation {
        let Some(input) = self.input.as_mut() else {
            return Navigation::Stay;
        };
        match key.code {
            KeyCode::Esc => self.input = None,
            KeyCode::Enter => {
                let name = input.value.trim().to_string();
                if !name.is_empty() {
                    self.input = None;
                    self.view = ProjectStatus::Open;
                    return Navigation::Run(Effect::CreateProject { name });
                }
            }
            _ => {
                input.handle_key(key);
            }
        }
        Navigation::Stay
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Navigation {
        let keys = &PROJECT_LIST_KEYS;
        if self.input.is_some() {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                return Navigation::Quit;
            }
            return self.handle_input_key(key);
        }

        if keys.quit.matches(&key) {
            return Navigation::Quit;
        } else if keys.up.matches(&key) {
            self.select_previous();
        } else if keys.down.matches(&key) {
            self.select_next();
        } else if keys.select.matches(&key) {
            if let Some(row) = self.selected() {
                let project_id = row.project.id;
                return Navigation::go_with(Route::Board, Effect::OpenBoard { project_id });
            }
        } else if keys.new.matches(&key) {
            let mut input = InputField::new("Project name");
            input.focus();
            self.input = Some(input);
        } else if keys.archive.matches(&key) {
            if self.view == ProjectStatus::Open {
                if let (Some(index), Some(row)) = (self.state.selected(), self.selected()) {
                    return Navigation::Run(Effect::ArchiveProject { id: row.project.id, index });
                }
            }
        } else if keys.view_archived.matches(&key) {
            self.view = self.view.toggled();
            self.state.select(None);
            return Navigation::Run(Effect::RefreshProjects);
        } else if keys.help.matches(&key) {
            self.show_full_help = !self.show_full_help;
        }
        Navigation::Stay
    }

    /// Blink tick for the name prompt.
    pub fn tick(&mut self) {
        if let Some(input) = self.input.as_mut() {
            input.blink();
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let help_lines = if self.show_full_help {
            full_help_lines(&PROJECT_LIST_KEYS.full_help())
        } else {
            vec![help_line(&PROJECT_LIST_KEYS.short_help())]
        };
        let input_height = if self.input.is_some() { 3 } else { 0 };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(input_height),
                Constraint::Length(help_lines.len() as u16),
            ])
            .split(area);

        let header = Paragraph::new(Line::from(Span::styled(
            "KANBAN",
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White));
        f.render_widget(header, chunks[0]);

        let title = match self.view {
            ProjectStatus::Open => " Projects ",
            ProjectStatus::Archived => " Archived projects ",
        };
        let header_row = Row::new(["Project", "To Do", "In Progress", "Done"].map(Cell::from))
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows: Vec<Row> = self
            .rows
            .iter()
            .map(|row| {
                Row::new(vec![
                    Cell::from(row.project.name.clone()),
                    Cell::from(row.todo.to_string()),
                    Cell::from(row.in_progress.to_string()),
                    Cell::from(row.done.to_string()),
                ])
            })
            .collect();
        let table = Table::new(
            rows,
            [Constraint::Min(20), Constraint::Length(8), Constraint::Length(12), Constraint::Length(8)],
        )
        .header(header_row)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(title),
        )
        .row_highlight_style(Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD))
        .highlight_symbol("► ");
        f.render_stateful_widget(table, chunks[1], &mut self.state);

        if self.rows.is_empty() {
            let empty = Rect { y: chunks[1].y + 2, height: 1, ..chunks[1] };
            f.render_widget(
                Paragraph::new("No projects.").style(Style::default().fg(GREY)).alignment(Alignment::Center),
                empty.intersection(chunks[1]),
            );
        }

        if let Some(input) = &self.input {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(INPUT_BORDER))
                .title(" New project ");
            let inner = block.inner(chunks[2]);
            let text = if input.value.is_empty() {
                Paragraph::new(input.placeholder).style(Style::default().fg(GREY))
            } else {
                Paragraph::new(input.value.as_str())
            };
            f.render_widget(text.block(block), chunks[2]);
            if input.cursor_visible() {
                let (col, _) = input.cursor_position();
                f.set_cursor_position((inner.x + col.min(inner.width.saturating_sub(1)), inner.y));
            }
        }

        f.render_widget(Paragraph::new(help_lines).alignment(Alignment::Center), chunks[3]);
    }
}

impl Default for ProjectList {
    fn default() -> Self {
        Self::new()
    }
}
