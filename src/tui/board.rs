//! Kanban board for one project: three lanes, lane focus and the task counters.
//!
//! `total_tasks` and `completed_tasks` are maintained incrementally on every
//! create, delete and advance instead of being recounted; the tests below walk
//! mixed operation sequences and check them against the lane contents after
//! every step.

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
    Frame,
};
use tracing::debug;

use crate::db::Store;
use crate::error::{KanbanError, Result};
use crate::fields::Status;
use crate::task::Task;
use crate::tui::{
    colors::SECONDARY,
    effect::{Effect, Event, Navigation, Route},
    keys::{full_help_lines, help_line, BOARD_KEYS},
    lane::Lane,
    task_form::TaskForm,
    task_view::TaskView,
};

const HEADER_HEIGHT: u16 = 1;
const PROGRESS_HEIGHT: u16 = 1;
const PROGRESS_MARGIN: u16 = 1;

#[derive(Debug)]
pub struct Board {
    project_id: i64,
    project_name: String,
    focused: Status,
    lanes: [Lane; 3],
    total_tasks: usize,
    completed_tasks: usize,
    show_full_help: bool,
    width: u16,
    height: u16,
}

impl Board {
    /// Load the three lanes of `project_id` and focus the To Do lane.
    pub fn load(store: &Store, project_id: i64, width: u16, height: u16) -> Result<Self> {
        let project_name = match store.get_project(project_id) {
            Ok(project) => project.name,
            Err(KanbanError::ProjectNotFound(_)) => String::new(),
            Err(e) => return Err(e),
        };

        let lane_width = width / 3;
        let lane_height = list_height(height, false);
        let lanes = [
            Lane::load(store, lane_width, lane_height, project_id, Status::Todo)?,
            Lane::load(store, lane_width, lane_height, project_id, Status::InProgress)?,
            Lane::load(store, lane_width, lane_height, project_id, Status::Done)?,
        ];

        let mut board = Board {
            project_id,
            project_name,
            focused: Status::Todo,
            total_tasks: lanes.iter().map(Lane::len).sum(),
            completed_tasks: lanes[Status::Done.index()].len(),
            lanes,
            show_full_help: false,
            width,
            height,
        };
        board.lanes[Status::Todo.index()].focus();
        debug!(project_id, total = board.total_tasks, "board loaded");
        Ok(board)
    }

    pub fn project_id(&self) -> i64 {
        self.project_id
    }

    pub fn focused(&self) -> Status {
        self.focused
    }

    pub fn lane(&self, status: Status) -> &Lane {
        &self.lanes[status.index()]
    }

    pub fn lane_mut(&mut self, status: Status) -> &mut Lane {
        &mut self.lanes[status.index()]
    }

    pub fn total_tasks(&self) -> usize {
        self.total_tasks
    }

    pub fn completed_tasks(&self) -> usize {
        self.completed_tasks
    }

    fn focused_lane(&self) -> &Lane {
        self.lane(self.focused)
    }

    fn focused_lane_mut(&mut self) -> &mut Lane {
        self.lane_mut(self.focused)
    }

    /// Move focus one lane to the right, wrapping around.
    pub fn focus_next(&mut self) {
        self.focused_lane_mut().blur();
        self.focused = self.focused.next();
        self.focused_lane_mut().focus();
    }

    /// Move focus one lane to the left, wrapping around.
    pub fn focus_previous(&mut self) {
        self.focused_lane_mut().blur();
        self.focused = self.focused.prev();
        self.focused_lane_mut().focus();
    }

    /// Move the selected task of the focused lane to the next status.
    ///
    /// The task leaves its lane before the store is asked to advance it and
    /// only joins its new lane once the store has answered. A store failure in
    /// between is returned to the caller with the task in no lane at all.
    /// Returns the event that refreshes the source lane, or `None` when
    /// nothing was selected.
    pub fn advance_selected_task(&mut self, store: &Store) -> Result<Option<Event>> {
        let source = self.focused_lane();
        let Some(selected) = source.selected().cloned() else {
            return Ok(None);
        };
        let index = source.index();
        let fallback = index.saturating_sub(1);
        let old_status = selected.status;

        let source = self.lane_mut(old_status);
        source.remove_at(index);
        source.select_index(fallback);

        if old_status == Status::Done {
            self.completed_tasks -= 1;
        }

        let updated = store.next_status(&selected)?;

        if updated.status == Status::Done {
            self.completed_tasks += 1;
        }
        debug!(id = updated.id, from = ?old_status, to = ?updated.status, "advanced task");
        self.lane_mut(updated.status).insert(updated);

        Ok(Some(Event::LaneChanged(old_status)))
    }

    /// Delete the selected task of the focused lane, store first.
    pub fn delete_selected_task(&mut self, store: &Store) -> Result<()> {
        let lane = self.focused_lane();
        let Some(task) = lane.selected().cloned() else {
            return Ok(());
        };
        let index = lane.index();

        store.delete_task(task.id)?;

        self.total_tasks -= 1;
        if task.status == Status::Done {
            self.completed_tasks -= 1;
        }
        self.focused_lane_mut().remove_at(index);
        debug!(id = task.id, "deleted task from board");
        Ok(())
    }

    /// Fold a freshly created task into the lane matching its status.
    pub fn create_task(&mut self, task: Task) {
        self.total_tasks += 1;
        if task.status == Status::Done {
            self.completed_tasks += 1;
        }
        self.lane_mut(task.status).insert(task);
    }

    /// Replace the task shown at `index` of the lane matching its status.
    pub fn edit_task(&mut self, task: Task, index: usize) {
        self.lane_mut(task.status).set_at(index, task);
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::TaskCreated(task) => self.create_task(task),
            Event::TaskEdited { task, index } => self.edit_task(task, index),
            Event::LaneChanged(status) => self.lane_mut(status).refresh(),
            Event::ProjectsLoaded(_) | Event::ProjectArchived { .. } => {}
        }
    }

    /// Recompute every lane's viewport. Focus is reapplied to the focused lane.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let lane_height = list_height(height, self.show_full_help);
        for lane in self.lanes.iter_mut() {
            lane.resize(width / 3, lane_height);
        }
        let focused = self.focused;
        self.lane_mut(focused).focus();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Navigation {
        let keys = &BOARD_KEYS;
        if keys.quit.matches(&key) {
            return Navigation::Quit;
        } else if keys.left.matches(&key) {
            let lane = self.focused_lane_mut();
            if lane.total_pages() > 1 && !lane.on_first_page() {
                lane.prev_page();
            } else {
                self.focus_previous();
            }
        } else if keys.right.matches(&key) {
            let lane = self.focused_lane_mut();
            if lane.total_pages() > 1 && !lane.on_last_page() {
                lane.next_page();
            } else {
                self.focus_next();
            }
        } else if keys.up.matches(&key) {
            self.focused_lane_mut().cursor_up();
        } else if keys.down.matches(&key) {
            self.focused_lane_mut().cursor_down();
        } else if keys.advance.matches(&key) {
            return Navigation::Run(Effect::AdvanceSelectedTask);
        } else if keys.help.matches(&key) {
            self.show_full_help = !self.show_full_help;
            self.resize(self.width, self.height);
        } else if keys.new.matches(&key) {
            let form = TaskForm::new(self.focused, self.project_id);
            return Navigation::go(Route::Form(Box::new(form)));
        } else if keys.edit.matches(&key) {
            let lane = self.focused_lane();
            if let Some(task) = lane.selected() {
                let form = TaskForm::edit(task, lane.index());
                return Navigation::go(Route::Form(Box::new(form)));
            }
        } else if keys.delete.matches(&key) {
            return Navigation::Run(Effect::DeleteSelectedTask);
        } else if keys.view.matches(&key) {
            if let Some(task) = self.focused_lane().selected() {
                let view = TaskView::new(task.clone());
                return Navigation::go(Route::TaskDetail(view));
            }
        } else if keys.projects.matches(&key) {
            return Navigation::go_with(Route::ProjectList, Effect::RefreshProjects);
        }
        Navigation::Stay
    }

    /// Fraction of tasks in the Done lane, `0.0` for an empty board.
    pub fn progress(&self) -> f64 {
        if self.total_tasks == 0 {
            0.0
        } else {
            self.completed_tasks as f64 / self.total_tasks as f64
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let help_lines = if self.show_full_help {
            full_help_lines(&BOARD_KEYS.full_help())
        } else {
            vec![help_line(&BOARD_KEYS.short_help())]
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(help_lines.len() as u16),
                Constraint::Length(PROGRESS_HEIGHT + PROGRESS_MARGIN * 2),
            ])
            .split(area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled("KANBAN", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(self.project_name.clone(), Style::default().add_modifier(Modifier::ITALIC)),
        ]))
        .alignment(Alignment::Center);
        f.render_widget(header, chunks[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3); 3])
            .split(chunks[1]);
        for (lane, &column) in self.lanes.iter().zip(columns.iter()) {
            lane.render(f, column);
        }

        f.render_widget(Paragraph::new(help_lines).alignment(Alignment::Center), chunks[2]);

        let bar_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(25), Constraint::Percentage(50), Constraint::Percentage(25)])
            .margin(PROGRESS_MARGIN)
            .split(chunks[3])[1];
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(SECONDARY))
            .ratio(self.progress())
            .label(format!("{}/{}", self.completed_tasks, self.total_tasks));
        f.render_widget(gauge, bar_area);
    }
}

/// Height left for the lanes once header, help and progress bar are placed.
fn list_height(height: u16, full_help: bool) -> u16 {
    let help_height = if full_help {
        full_help_lines(&BOARD_KEYS.full_help()).len() as u16
    } else {
        1
    };
    height.saturating_sub(HEADER_HEIGHT + help_height + PROGRESS_HEIGHT + PROGRESS_MARGIN * 2)
}
