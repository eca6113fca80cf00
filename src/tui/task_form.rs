//! Task form for creating and editing a task.
//!
//! The form is a two-step input: the title first, then the description.
//! Confirming on the description hands the task back to the router as a
//! deferred store effect and switches to the board.

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::{
    fields::Status,
    task::Task,
    tui::{
        colors::{GREY, INPUT_BORDER},
        effect::{Effect, Navigation, Route},
        enums::FormFocus,
        input::InputField,
        keys::{help_line, FORM_KEYS},
    },
};

/// Whether submission inserts a new task or merges onto an existing one.
#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Create { status: Status, project_id: i64 },
    Edit { id: i64, index: usize, status: Status, project_id: i64 },
}

#[derive(Debug)]
pub struct TaskForm {
    mode: FormMode,
    focus: FormFocus,
    pub title: InputField,
    pub description: InputField,
}

impl TaskForm {
    /// Empty form that creates a task in the lane it was opened from.
    pub fn new(status: Status, project_id: i64) -> Self {
        let mut title = InputField::new("Task name");
        title.focus();
        Self {
            mode: FormMode::Create { status, project_id },
            focus: FormFocus::Title,
            title,
            description: InputField::multiline("Description"),
        }
    }

    /// Form prefilled from `task`, which sits at `index` of its lane.
    pub fn edit(task: &Task, index: usize) -> Self {
        let mut form = Self::new(task.status, task.project_id);
        form.mode = FormMode::Edit {
            id: task.id,
            index,
            status: task.status,
            project_id: task.project_id,
        };
        form.title.set_value(&task.name);
        form.description.set_value(&task.info);
        form
    }

    pub fn focus(&self) -> FormFocus {
        self.focus
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    fn active_field(&mut self) -> &mut InputField {
        match self.focus {
            FormFocus::Title => &mut self.title,
            FormFocus::Description => &mut self.description,
        }
    }

    /// The task the form currently describes.
    fn task(&self) -> Task {
        let (name, info) = (self.title.value.as_str(), self.description.value.as_str());
        match self.mode {
            FormMode::Create { status, project_id } => Task::new(status, name, info, project_id),
            FormMode::Edit { id, status, project_id, .. } => Task { id, ..Task::new(status, name, info, project_id) },
        }
    }

    fn submit(&self) -> Navigation {
        let task = self.task();
        let effect = match self.mode {
            FormMode::Create { .. } => Effect::CreateTask(task),
            FormMode::Edit { index, .. } => Effect::UpdateTask { task, index },
        };
        Navigation::go_with(Route::Board, effect)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Navigation {
        let keys = &FORM_KEYS;
        if keys.quit.matches(&key) {
            return Navigation::Quit;
        }
        if keys.back.matches(&key) {
            return Navigation::go(Route::Board);
        }
        if keys.next.matches(&key) {
            match self.focus {
                FormFocus::Title => {
                    self.title.blur();
                    self.description.focus();
                    self.focus = FormFocus::Description;
                }
                FormFocus::Description => return self.submit(),
            }
            return Navigation::Stay;
        }
        self.active_field().handle_key(key);
        Navigation::Stay
    }

    /// Blink tick.
    pub fn tick(&mut self) {
        self.active_field().blink();
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let form_width = area.width.min(72);
        let column = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Fill(1), Constraint::Length(form_width), Constraint::Fill(1)])
            .split(area)[1];

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Heading
                Constraint::Length(3), // Title
                Constraint::Min(5),    // Description
                Constraint::Length(1), // Help
            ])
            .margin(1)
            .split(column);

        let heading = if self.is_edit() { "Edit task" } else { "Create a new task" };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(heading, Style::default().add_modifier(Modifier::BOLD))))
                .alignment(Alignment::Center),
            chunks[0],
        );

        render_field(f, chunks[1], &self.title, "Title");
        render_field(f, chunks[2], &self.description, "Description");

        f.render_widget(
            Paragraph::new(help_line(&FORM_KEYS.short_help())).alignment(Alignment::Center),
            chunks[3],
        );
    }
}

fn render_field(f: &mut Frame, area: Rect, field: &InputField, label: &'static str) {
    let border_style = if field.active {
        Style::default().fg(INPUT_BORDER)
    } else {
        Style::default().fg(GREY)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(label);
    let inner = block.inner(area);

    let paragraph = if field.value.is_empty() {
        Paragraph::new(field.placeholder).style(Style::default().fg(GREY))
    } else {
        Paragraph::new(field.value.as_str())
    };
    f.render_widget(paragraph.block(block).wrap(Wrap { trim: false }), area);

    if field.cursor_visible() {
        let (col, row) = field.cursor_position();
        if col < inner.width && row < inner.height {
            f.set_cursor_position((inner.x + col, inner.y + row));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(form: &mut TaskForm, text: &str) {
        for c in text.chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_create_flow_yields_create_effect() {
        let mut form = TaskForm::new(Status::InProgress, 4);
        assert_eq!(form.focus(), FormFocus::Title);
        type_text(&mut form, "write docs");
        assert!(matches!(form.handle_key(ctrl('y')), Navigation::Stay));
        assert_eq!(form.focus(), FormFocus::Description);
        assert!(form.description.active);
        assert!(!form.title.active);

        type_text(&mut form, "all of them");
        match form.handle_key(ctrl('y')) {
            Navigation::Go { to: Route::Board, effect: Some(Effect::CreateTask(task)) } => {
                assert_eq!(task.id, 0);
                assert_eq!(task.name, "write docs");
                assert_eq!(task.info, "all of them");
                assert_eq!(task.status, Status::InProgress);
                assert_eq!(task.project_id, 4);
            }
            other => panic!("unexpected navigation: {other:?}"),
        }
    }

    #[test]
    fn test_edit_flow_yields_update_effect() {
        let existing = Task { id: 9, name: "old".into(), info: "desc".into(), status: Status::Done, project_id: 2 };
        let mut form = TaskForm::edit(&existing, 3);
        assert!(form.is_edit());
        assert_eq!(form.title.value, "old");

        form.handle_key(key(KeyCode::Backspace));
        form.handle_key(ctrl('y'));
        match form.handle_key(ctrl('y')) {
            Navigation::Go { to: Route::Board, effect: Some(Effect::UpdateTask { task, index }) } => {
                assert_eq!(index, 3);
                assert_eq!(task.id, 9);
                assert_eq!(task.name, "ol");
                assert_eq!(task.info, "desc");
                assert_eq!(task.status, Status::Done);
            }
            other => panic!("unexpected navigation: {other:?}"),
        }
    }

    #[test]
    fn test_enter_is_newline_only_in_description() {
        let mut form = TaskForm::new(Status::Todo, 1);
        type_text(&mut form, "a");
        form.handle_key(key(KeyCode::Enter));
        assert_eq!(form.title.value, "a");
        form.handle_key(ctrl('y'));
        type_text(&mut form, "x");
        form.handle_key(key(KeyCode::Enter));
        type_text(&mut form, "y");
        assert_eq!(form.description.value, "x\ny");
    }

    #[test]
    fn test_back_and_quit() {
        let mut form = TaskForm::new(Status::Todo, 1);
        assert!(matches!(form.handle_key(key(KeyCode::Esc)), Navigation::Go { to: Route::Board, effect: None }));
        assert!(matches!(form.handle_key(ctrl('b')), Navigation::Go { to: Route::Board, effect: None }));
        assert!(matches!(form.handle_key(ctrl('c')), Navigation::Quit));
        // 'q' is plain text here.
        form.handle_key(key(KeyCode::Char('q')));
        assert_eq!(form.title.value, "q");
    }

    #[test]
    fn test_tick_blinks_active_field() {
        let mut form = TaskForm::new(Status::Todo, 1);
        assert!(form.title.cursor_visible());
        form.tick();
        assert!(!form.title.cursor_visible());
        assert!(!form.description.cursor_visible());
    }

    #[test]
    fn test_render() {
        let mut form = TaskForm::new(Status::Todo, 1);
        type_text(&mut form, "hello");
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| form.render(f, f.area())).unwrap();
    }
}
