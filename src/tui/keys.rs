//! Key maps for every screen, with the labels shown in the help line.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

/// One action and the keys that trigger it.
pub struct Binding {
    keys: &'static [(KeyCode, KeyModifiers)],
    pub help_key: &'static str,
    pub help_desc: &'static str,
}

impl Binding {
    const fn new(
        keys: &'static [(KeyCode, KeyModifiers)],
        help_key: &'static str,
        help_desc: &'static str,
    ) -> Self {
        Binding { keys, help_key, help_desc }
    }

    /// Shift is ignored for character keys, since terminals already fold it
    /// into the character itself.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        let modifiers = match key.code {
            KeyCode::Char(_) => key.modifiers.difference(KeyModifiers::SHIFT),
            _ => key.modifiers,
        };
        self.keys.iter().any(|&(code, mods)| code == key.code && mods == modifiers)
    }
}

const NONE: KeyModifiers = KeyModifiers::NONE;
const CTRL: KeyModifiers = KeyModifiers::CONTROL;

pub struct BoardKeys {
    pub up: Binding,
    pub down: Binding,
    pub left: Binding,
    pub right: Binding,
    pub help: Binding,
    pub edit: Binding,
    pub new: Binding,
    pub advance: Binding,
    pub delete: Binding,
    pub view: Binding,
    pub projects: Binding,
    pub quit: Binding,
}

impl BoardKeys {
    pub fn short_help(&self) -> Vec<&Binding> {
        vec![&self.new, &self.advance, &self.projects, &self.quit, &self.help]
    }

    pub fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![
            vec![&self.up, &self.down, &self.left, &self.right],
            vec![&self.new, &self.edit, &self.delete, &self.advance, &self.view],
            vec![&self.projects, &self.quit, &self.help],
        ]
    }
}

pub static BOARD_KEYS: BoardKeys = BoardKeys {
    up: Binding::new(&[(KeyCode::Up, NONE), (KeyCode::Char('k'), NONE)], "↑/k", "move up"),
    down: Binding::new(&[(KeyCode::Down, NONE), (KeyCode::Char('j'), NONE)], "↓/j", "move down"),
    left: Binding::new(&[(KeyCode::Left, NONE), (KeyCode::Char('h'), NONE)], "←/h", "move left"),
    right: Binding::new(&[(KeyCode::Right, NONE), (KeyCode::Char('l'), NONE)], "→/l", "move right"),
    help: Binding::new(&[(KeyCode::Char('?'), NONE)], "?", "toggle help"),
    edit: Binding::new(&[(KeyCode::Char('e'), NONE)], "e", "edit task"),
    new: Binding::new(&[(KeyCode::Char('n'), NONE)], "n", "new task"),
    advance: Binding::new(&[(KeyCode::Enter, NONE)], "enter", "move task"),
    delete: Binding::new(&[(KeyCode::Char('d'), NONE)], "d", "delete task"),
    view: Binding::new(&[(KeyCode::Char('v'), NONE)], "v", "view task"),
    projects: Binding::new(&[(KeyCode::Char('p'), NONE)], "p", "projects"),
    quit: Binding::new(
        &[(KeyCode::Char('q'), NONE), (KeyCode::Esc, NONE), (KeyCode::Char('c'), CTRL)],
        "q",
        "quit",
    ),
};

pub struct FormKeys {
    pub next: Binding,
    pub back: Binding,
    pub quit: Binding,
}

impl FormKeys {
    pub fn short_help(&self) -> Vec<&Binding> {
        vec![&self.next, &self.back, &self.quit]
    }
}

pub static FORM_KEYS: FormKeys = FormKeys {
    next: Binding::new(&[(KeyCode::Char('y'), CTRL)], "ctrl+y", "next field/confirm"),
    back: Binding::new(&[(KeyCode::Esc, NONE), (KeyCode::Char('b'), CTRL)], "esc", "back"),
    quit: Binding::new(&[(KeyCode::Char('c'), CTRL)], "ctrl+c", "quit"),
};

pub struct ProjectListKeys {
    pub up: Binding,
    pub down: Binding,
    pub select: Binding,
    pub new: Binding,
    pub archive: Binding,
    pub view_archived: Binding,
    pub help: Binding,
    pub quit: Binding,
}

impl ProjectListKeys {
    pub fn short_help(&self) -> Vec<&Binding> {
        vec![&self.up, &self.down, &self.select, &self.help]
    }

    pub fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![
            vec![&self.up, &self.down, &self.select],
            vec![&self.new, &self.archive, &self.view_archived],
            vec![&self.help, &self.quit],
        ]
    }
}

pub static PROJECT_LIST_KEYS: ProjectListKeys = ProjectListKeys {
    up: Binding::new(&[(KeyCode::Up, NONE), (KeyCode::Char('k'), NONE)], "↑/k", "move up"),
    down: Binding::new(&[(KeyCode::Down, NONE), (KeyCode::Char('j'), NONE)], "↓/j", "move down"),
    select: Binding::new(
        &[(KeyCode::Enter, NONE), (KeyCode::Char(' '), NONE)],
        "enter/space",
        "select project",
    ),
    new: Binding::new(&[(KeyCode::Char('n'), NONE)], "n", "new project"),
    archive: Binding::new(&[(KeyCode::Char('a'), NONE)], "a", "archive project"),
    view_archived: Binding::new(&[(KeyCode::Char('v'), NONE)], "v", "view archived projects"),
    help: Binding::new(&[(KeyCode::Char('?'), NONE)], "?", "toggle help"),
    quit: Binding::new(
        &[(KeyCode::Char('q'), NONE), (KeyCode::Esc, NONE), (KeyCode::Char('c'), CTRL)],
        "q",
        "quit",
    ),
};

pub struct TaskViewKeys {
    pub back: Binding,
    pub quit: Binding,
}

pub static TASK_VIEW_KEYS: TaskViewKeys = TaskViewKeys {
    back: Binding::new(
        &[(KeyCode::Esc, NONE), (KeyCode::Char('q'), NONE), (KeyCode::Backspace, NONE)],
        "esc",
        "back",
    ),
    quit: Binding::new(&[(KeyCode::Char('c'), CTRL)], "ctrl+c", "quit"),
};

/// Single help line: `key desc • key desc • ...`.
pub fn help_line(bindings: &[&Binding]) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, binding) in bindings.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" • ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(binding.help_key, Style::default().fg(Color::Gray)));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(binding.help_desc, Style::default().fg(Color::DarkGray)));
    }
    Line::from(spans)
}

/// Expanded help: one line per binding row, columns side by side.
pub fn full_help_lines(columns: &[Vec<&Binding>]) -> Vec<Line<'static>> {
    let rows = columns.iter().map(Vec::len).max().unwrap_or(0);
    (0..rows)
        .map(|row| {
            let mut spans = Vec::new();
            for column in columns {
                let cell = column
                    .get(row)
                    .map(|b| format!("{:<12} {:<16}", b.help_key, b.help_desc))
                    .unwrap_or_else(|| " ".repeat(30));
                spans.push(Span::styled(cell, Style::default().fg(Color::DarkGray)));
            }
            Line::from(spans)
        })
        .collect()
}
