//! Screen router for the terminal user interface.
//!
//! `App` owns the store, one slot per screen and the active-screen pointer.
//! Screens answer key presses with a [`Navigation`]; the router switches the
//! active screen and queues any [`Effect`] that came along. Queued effects run
//! against the store before the next frame is drawn and their [`Event`] is
//! folded into the screen that owns the affected data.

use std::collections::VecDeque;
use std::time::Duration;

use crossterm::event::{self, Event as TermEvent, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Rect},
    style::Style,
    widgets::Paragraph,
    Frame, Terminal,
};
use tracing::{debug, info};

use crate::db::Store;
use crate::error::Result;
use crate::tui::{
    board::Board,
    colors::GREY,
    effect::{Effect, Event, Navigation, Route},
    enums::ScreenKind,
    project_list::ProjectList,
    task_form::TaskForm,
    task_view::TaskView,
};

/// Poll timeout. An expired poll is a cursor-blink tick.
const TICK_RATE: Duration = Duration::from_millis(500);

/// One slot per screen kind. Board, form and task view only exist once they
/// have been opened.
#[derive(Debug, Default)]
struct Screens {
    projects: ProjectList,
    board: Option<Board>,
    form: Option<TaskForm>,
    task_view: Option<TaskView>,
}

#[derive(Debug)]
pub struct App {
    store: Store,
    screens: Screens,
    active: ScreenKind,
    pending: VecDeque<Effect>,
    should_quit: bool,
    width: u16,
    height: u16,
}

impl App {
    /// Start on the project list; its rows load before the first frame.
    pub fn new(store: Store, width: u16, height: u16) -> Self {
        App {
            store,
            screens: Screens::default(),
            active: ScreenKind::ProjectList,
            pending: VecDeque::from([Effect::RefreshProjects]),
            should_quit: false,
            width,
            height,
        }
    }

    pub fn active(&self) -> ScreenKind {
        self.active
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn board(&self) -> Option<&Board> {
        self.screens.board.as_ref()
    }

    pub fn projects(&self) -> &ProjectList {
        &self.screens.projects
    }

    pub fn form(&self) -> Option<&TaskForm> {
        self.screens.form.as_ref()
    }

    /// Route one terminal event. Only key presses and resizes matter.
    pub fn handle_event(&mut self, event: TermEvent) {
        match event {
            TermEvent::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            TermEvent::Resize(width, height) => self.resize(width, height),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let navigation = match self.active {
            ScreenKind::ProjectList => self.screens.projects.handle_key(key),
            ScreenKind::Board => match self.screens.board.as_mut() {
                Some(board) => board.handle_key(key),
                None => Navigation::Stay,
            },
            ScreenKind::Form => match self.screens.form.as_mut() {
                Some(form) => form.handle_key(key),
                None => Navigation::go(Route::Board),
            },
            ScreenKind::TaskDetail => match self.screens.task_view.as_mut() {
                Some(view) => view.handle_key(key),
                None => Navigation::go(Route::Board),
            },
        };
        self.navigate(navigation);
    }

    fn navigate(&mut self, navigation: Navigation) {
        match navigation {
            Navigation::Stay => {}
            Navigation::Quit => {
                info!("quit requested");
                self.should_quit = true;
            }
            Navigation::Run(effect) => self.pending.push_back(effect),
            Navigation::Go { to, effect } => {
                let kind = to.kind();
                match to {
                    Route::Form(form) => self.screens.form = Some(*form),
                    Route::TaskDetail(view) => self.screens.task_view = Some(view),
                    Route::ProjectList | Route::Board => {}
                }
                // Form and task view are rebuilt on every visit.
                if kind != ScreenKind::Form {
                    self.screens.form = None;
                }
                if kind != ScreenKind::TaskDetail {
                    self.screens.task_view = None;
                }
                info!(from = ?self.active, to = ?kind, "switching screen");
                self.active = kind;
                if let Some(effect) = effect {
                    self.pending.push_back(effect);
                }
            }
        }
    }

    /// Run every queued effect in order, folding each outcome back in.
    pub fn flush(&mut self) -> Result<()> {
        while let Some(effect) = self.pending.pop_front() {
            if let Some(event) = self.apply(effect)? {
                self.fold(event);
            }
        }
        Ok(())
    }

    fn apply(&mut self, effect: Effect) -> Result<Option<Event>> {
        debug!(?effect, "running effect");
        let event = match effect {
            Effect::CreateTask(mut task) => {
                task.id = self.store.insert_task(&task.name, &task.info, task.project_id, task.status)?;
                Some(Event::TaskCreated(task))
            }
            Effect::UpdateTask { task, index } => {
                let task = self.store.update_task(&task)?;
                Some(Event::TaskEdited { task, index })
            }
            Effect::AdvanceSelectedTask => match self.screens.board.as_mut() {
                Some(board) => board.advance_selected_task(&self.store)?,
                None => None,
            },
            Effect::DeleteSelectedTask => {
                if let Some(board) = self.screens.board.as_mut() {
                    board.delete_selected_task(&self.store)?;
                }
                None
            }
            Effect::OpenBoard { project_id } => {
                let board = Board::load(&self.store, project_id, self.width, self.height)?;
                self.screens.board = Some(board);
                None
            }
            Effect::RefreshProjects => Some(self.load_projects()?),
            Effect::CreateProject { name } => {
                let id = self.store.insert_project(&name)?;
                info!(id, %name, "created project");
                Some(self.load_projects()?)
            }
            Effect::ArchiveProject { id, index } => {
                self.store.archive_project(id)?;
                info!(id, "archived project");
                Some(Event::ProjectArchived { index })
            }
        };
        Ok(event)
    }

    fn load_projects(&self) -> Result<Event> {
        let rows = self.store.project_rows(self.screens.projects.view())?;
        Ok(Event::ProjectsLoaded(rows))
    }

    fn fold(&mut self, event: Event) {
        match event {
            Event::TaskCreated(_) | Event::TaskEdited { .. } | Event::LaneChanged(_) => {
                if let Some(board) = self.screens.board.as_mut() {
                    board.handle_event(event);
                }
            }
            Event::ProjectsLoaded(_) | Event::ProjectArchived { .. } => {
                self.screens.projects.handle_event(event);
            }
        }
    }

    /// Blink tick for whichever screen has a text input.
    pub fn tick(&mut self) {
        match self.active {
            ScreenKind::Form => {
                if let Some(form) = self.screens.form.as_mut() {
                    form.tick();
                }
            }
            ScreenKind::ProjectList => self.screens.projects.tick(),
            ScreenKind::Board | ScreenKind::TaskDetail => {}
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        if let Some(board) = self.screens.board.as_mut() {
            board.resize(width, height);
        }
    }

    pub fn render(&mut self, f: &mut Frame) {
        let area = f.area();
        match self.active {
            ScreenKind::ProjectList => self.screens.projects.render(f, area),
            ScreenKind::Board => self.render_board(f, area),
            ScreenKind::Form => match self.screens.form.as_mut() {
                Some(form) => form.render(f, area),
                None => self.render_board(f, area),
            },
            ScreenKind::TaskDetail => {
                self.render_board(f, area);
                if let Some(view) = self.screens.task_view.as_mut() {
                    view.render(f, area);
                }
            }
        }
    }

    fn render_board(&mut self, f: &mut Frame, area: Rect) {
        match self.screens.board.as_mut() {
            Some(board) => board.render(f, area),
            None => f.render_widget(
                Paragraph::new("Loading...").style(Style::default().fg(GREY)).alignment(Alignment::Center),
                area,
            ),
        }
    }

    /// Main event loop. Store errors end the loop and are returned.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            self.flush()?;
            if self.should_quit {
                break;
            }

            terminal.draw(|f| self.render(f))?;

            if event::poll(TICK_RATE)? {
                self.handle_event(event::read()?);
            } else {
                self.tick();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::temp_store;
    use crate::fields::{ProjectStatus, Status};
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::backend::TestBackend;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn press(app: &mut App, event: KeyEvent) {
        app.handle_key(event);
        app.flush().unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, key(KeyCode::Char(c)));
        }
    }

    fn draw(app: &mut App) {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
    }

    /// App with one open project, already showing its board.
    fn app_on_board() -> (TempDir, App) {
        let (dir, store) = temp_store();
        store.insert_project("Home").unwrap();
        let mut app = App::new(store, 120, 40);
        app.flush().unwrap();
        press(&mut app, key(KeyCode::Enter));
        assert_eq!(app.active(), ScreenKind::Board);
        (dir, app)
    }

    #[test]
    fn test_starts_on_loaded_project_list() {
        let (_dir, store) = temp_store();
        store.insert_project("One").unwrap();
        store.insert_project("Two").unwrap();
        let mut app = App::new(store, 120, 40);
        assert_eq!(app.active(), ScreenKind::ProjectList);
        app.flush().unwrap();
        assert_eq!(app.projects().rows().len(), 2);
        draw(&mut app);
    }

    #[test]
    fn test_create_task_through_form_lands_on_board_with_id() {
        let (_dir, mut app) = app_on_board();

        press(&mut app, key(KeyCode::Char('n')));
        assert_eq!(app.active(), ScreenKind::Form);
        draw(&mut app);
        type_text(&mut app, "buy milk");
        press(&mut app, ctrl('y'));
        type_text(&mut app, "two litres");

        // Navigation and the queued insert happen on the same key press; the
        // insert has run by the time the board is drawn.
        app.handle_key(ctrl('y'));
        assert_eq!(app.active(), ScreenKind::Board);
        assert!(app.form().is_none());
        app.flush().unwrap();

        let board = app.board().unwrap();
        let todo = board.lane(Status::Todo);
        assert_eq!(todo.len(), 1);
        let task = &todo.items()[0];
        assert_ne!(task.id, 0);
        assert_eq!(task.info, "two litres");
        assert_eq!(board.total_tasks(), 1);
        assert_eq!(app.store.get_task(task.id).unwrap().name, "buy milk");
        draw(&mut app);
    }

    #[test]
    fn test_edit_with_blank_title_keeps_stored_name() {
        let (_dir, mut app) = app_on_board();
        press(&mut app, key(KeyCode::Char('n')));
        type_text(&mut app, "keep me");
        press(&mut app, ctrl('y'));
        press(&mut app, ctrl('y'));

        press(&mut app, key(KeyCode::Char('e')));
        for _ in 0.."keep me".len() {
            press(&mut app, key(KeyCode::Backspace));
        }
        press(&mut app, ctrl('y'));
        type_text(&mut app, "notes");
        press(&mut app, ctrl('y'));

        let task = &app.board().unwrap().lane(Status::Todo).items()[0];
        assert_eq!(task.name, "keep me");
        assert_eq!(task.info, "notes");
    }

    #[test]
    fn test_form_back_discards_input() {
        let (_dir, mut app) = app_on_board();
        press(&mut app, key(KeyCode::Char('n')));
        type_text(&mut app, "nope");
        press(&mut app, key(KeyCode::Esc));
        assert_eq!(app.active(), ScreenKind::Board);
        assert_eq!(app.board().unwrap().total_tasks(), 0);
    }

    #[test]
    fn test_advance_and_delete_through_keys() {
        let (_dir, mut app) = app_on_board();
        for name in ["a", "b"] {
            press(&mut app, key(KeyCode::Char('n')));
            type_text(&mut app, name);
            press(&mut app, ctrl('y'));
            press(&mut app, ctrl('y'));
        }

        press(&mut app, key(KeyCode::Enter));
        let board = app.board().unwrap();
        assert_eq!(board.lane(Status::Todo).len(), 1);
        assert_eq!(board.lane(Status::InProgress).items()[0].name, "a");

        press(&mut app, key(KeyCode::Char('d')));
        let board = app.board().unwrap();
        assert!(board.lane(Status::Todo).is_empty());
        assert_eq!(board.total_tasks(), 1);
        draw(&mut app);
    }

    #[test]
    fn test_view_task_and_return() {
        let (_dir, mut app) = app_on_board();
        press(&mut app, key(KeyCode::Char('n')));
        type_text(&mut app, "look");
        press(&mut app, ctrl('y'));
        press(&mut app, ctrl('y'));

        press(&mut app, key(KeyCode::Char('v')));
        assert_eq!(app.active(), ScreenKind::TaskDetail);
        draw(&mut app);
        press(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.active(), ScreenKind::Board);
    }

    #[test]
    fn test_project_lifecycle() {
        let (_dir, store) = temp_store();
        let mut app = App::new(store, 120, 40);
        app.flush().unwrap();
        assert!(app.projects().rows().is_empty());

        press(&mut app, key(KeyCode::Char('n')));
        type_text(&mut app, "Garden");
        press(&mut app, key(KeyCode::Enter));
        assert_eq!(app.projects().rows().len(), 1);
        assert_eq!(app.projects().rows()[0].project.name, "Garden");

        press(&mut app, key(KeyCode::Char('a')));
        assert!(app.projects().rows().is_empty());

        press(&mut app, key(KeyCode::Char('v')));
        assert_eq!(app.projects().view(), ProjectStatus::Archived);
        assert_eq!(app.projects().rows().len(), 1);
    }

    #[test]
    fn test_board_back_to_projects_refreshes_counts() {
        let (_dir, mut app) = app_on_board();
        press(&mut app, key(KeyCode::Char('n')));
        type_text(&mut app, "x");
        press(&mut app, ctrl('y'));
        press(&mut app, ctrl('y'));

        press(&mut app, key(KeyCode::Char('p')));
        assert_eq!(app.active(), ScreenKind::ProjectList);
        assert_eq!(app.projects().rows()[0].todo, 1);
    }

    #[test]
    fn test_quit_from_board() {
        let (_dir, mut app) = app_on_board();
        press(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[test]
    fn test_resize_reaches_board_and_release_is_ignored() {
        let (_dir, mut app) = app_on_board();
        app.handle_event(TermEvent::Resize(90, 30));
        assert_eq!(app.board().unwrap().lane(Status::Todo).viewport().0, 90 / 3 - 6);

        let mut release = key(KeyCode::Char('q'));
        release.kind = KeyEventKind::Release;
        app.handle_event(TermEvent::Key(release));
        assert!(!app.should_quit());
    }

    #[test]
    fn test_store_failure_surfaces_from_flush() {
        let (dir, store) = temp_store();
        let mut app = App::new(store, 120, 40);
        app.flush().unwrap();
        drop(dir);
        app.pending.push_back(Effect::ArchiveProject { id: 1, index: 0 });
        assert!(app.flush().is_err());
    }
}
