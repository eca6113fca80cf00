//! Read-only view of a single task.

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::task::Task;
use crate::tui::{
    colors::{GREY, SECONDARY},
    effect::{Navigation, Route},
    keys::{help_line, TASK_VIEW_KEYS},
    utils::centered_rect,
};

#[derive(Debug)]
pub struct TaskView {
    task: Task,
}

impl TaskView {
    pub fn new(task: Task) -> Self {
        TaskView { task }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Navigation {
        if TASK_VIEW_KEYS.quit.matches(&key) {
            Navigation::Quit
        } else if TASK_VIEW_KEYS.back.matches(&key) {
            Navigation::go(Route::Board)
        } else {
            Navigation::Stay
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let popup = centered_rect(70, 60, area);
        f.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(format!(" {} ", self.task.status.title()))
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(SECONDARY));
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .margin(1)
            .split(inner);

        let mut lines = vec![
            Line::from(Span::styled(self.task.name.clone(), Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
        ];
        if self.task.info.is_empty() {
            lines.push(Line::from(Span::styled("No description.", Style::default().fg(GREY))));
        } else {
            lines.extend(self.task.info.lines().map(|line| {
                Line::from(Span::styled(line.to_string(), Style::default().add_modifier(Modifier::ITALIC)))
            }));
        }
        f.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true }),
            chunks[0],
        );

        let help = help_line(&[&TASK_VIEW_KEYS.back, &TASK_VIEW_KEYS.quit]);
        f.render_widget(Paragraph::new(help).alignment(Alignment::Center), chunks[1]);
    }
}
