//! A single status lane of a board.
//!
//! The lane owns an in-memory list of tasks with a cursor and splits it into
//! pages that fit its viewport. None of the list operations write to the
//! store; the board persists first and then mutates the lane.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
    Frame,
};

use crate::db::Store;
use crate::error::Result;
use crate::fields::Status;
use crate::task::Task;
use crate::tui::colors::{FOCUS, GREY, HIGHLIGHT};

/// Horizontal padding inside the lane border.
pub const PAD: u16 = 2;
/// Rows taken by border, padding, title and page indicator.
const CHROME_HEIGHT: u16 = 2 + 2 + 1 + 1;
/// Columns taken by border and padding.
const CHROME_WIDTH: u16 = 2 + PAD * 2;
/// Each task shows a title line, a description line and a spacer.
const ITEM_HEIGHT: u16 = 3;

#[derive(Debug, Clone)]
pub struct Lane {
    status: Status,
    title: String,
    focused: bool,
    items: Vec<Task>,
    cursor: usize,
    list_width: u16,
    list_height: u16,
}

impl Lane {
    /// Load every task of `project_id` with `status` and size the lane to the
    /// given outer dimensions.
    pub fn load(store: &Store, width: u16, height: u16, project_id: i64, status: Status) -> Result<Self> {
        let items = store.get_tasks_by_status(status, project_id)?;
        Ok(Lane::new(status, items, width, height))
    }

    pub fn new(status: Status, items: Vec<Task>, width: u16, height: u16) -> Self {
        let mut lane = Lane {
            status,
            title: status.title().to_string(),
            focused: false,
            items,
            cursor: 0,
            list_width: 0,
            list_height: 0,
        };
        lane.resize(width, height);
        lane
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn items(&self) -> &[Task] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cursor position. Meaningless while the lane is empty.
    pub fn index(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&Task> {
        self.items.get(self.cursor)
    }

    /// Append a task at the end of the list.
    pub fn insert(&mut self, task: Task) {
        self.items.push(task);
    }

    /// Remove the task at `index`, keeping the cursor within bounds.
    pub fn remove_at(&mut self, index: usize) -> Option<Task> {
        if index >= self.items.len() {
            return None;
        }
        let task = self.items.remove(index);
        self.clamp_cursor();
        Some(task)
    }

    /// Replace the task at `index`. Out-of-range indices are ignored.
    pub fn set_at(&mut self, index: usize, task: Task) {
        if let Some(slot) = self.items.get_mut(index) {
            *slot = task;
        }
    }

    pub fn select_index(&mut self, index: usize) {
        self.cursor = index;
        self.clamp_cursor();
    }

    /// Bring the cursor back inside the list after outside changes.
    pub fn refresh(&mut self) {
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.items.len().saturating_sub(1));
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.items.len() {
            self.cursor += 1;
        }
    }

    /// Recompute the list viewport from the lane's outer size.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.list_width = width.saturating_sub(CHROME_WIDTH);
        self.list_height = height.saturating_sub(CHROME_HEIGHT);
    }

    pub fn viewport(&self) -> (u16, u16) {
        (self.list_width, self.list_height)
    }

    pub fn per_page(&self) -> usize {
        usize::from((self.list_height / ITEM_HEIGHT).max(1))
    }

    pub fn page(&self) -> usize {
        self.cursor / self.per_page()
    }

    pub fn total_pages(&self) -> usize {
        self.items.len().div_ceil(self.per_page()).max(1)
    }

    pub fn on_first_page(&self) -> bool {
        self.page() == 0
    }

    pub fn on_last_page(&self) -> bool {
        self.page() + 1 >= self.total_pages()
    }

    /// Jump to the first item of the next page.
    pub fn next_page(&mut self) {
        if !self.on_last_page() {
            self.select_index((self.page() + 1) * self.per_page());
        }
    }

    /// Jump to the first item of the previous page.
    pub fn prev_page(&mut self) {
        if !self.on_first_page() {
            self.select_index((self.page() - 1) * self.per_page());
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(FOCUS)
        } else {
            Style::default().fg(ratatui::style::Color::Reset).add_modifier(Modifier::HIDDEN)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .padding(Padding::new(PAD, PAD, 1, 1));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Min(0),    // Items
                Constraint::Length(1), // Pager
            ])
            .split(inner);

        let title = Paragraph::new(Line::from(Span::styled(
            format!(" {} ", self.title),
            Style::default().bg(GREY).add_modifier(Modifier::BOLD),
        )));
        f.render_widget(title, chunks[0]);

        if self.items.is_empty() {
            f.render_widget(Paragraph::new("No items.").style(Style::default().fg(GREY)), chunks[1]);
            return;
        }

        let width = usize::from(chunks[1].width.saturating_sub(2));
        let start = self.page() * self.per_page();
        let mut lines = Vec::new();
        for (i, task) in self.items.iter().enumerate().skip(start).take(self.per_page()) {
            let selected = self.focused && i == self.cursor;
            let (bar, name_style, info_style) = if selected {
                (
                    Span::styled("│ ", Style::default().fg(HIGHLIGHT)),
                    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD),
                    Style::default().fg(HIGHLIGHT),
                )
            } else {
                (Span::raw("  "), Style::default(), Style::default().fg(GREY))
            };
            let info = task.info.lines().next().unwrap_or("");
            lines.push(Line::from(vec![bar.clone(), Span::styled(truncate(&task.name, width), name_style)]));
            lines.push(Line::from(vec![bar, Span::styled(truncate(info, width), info_style)]));
            lines.push(Line::from(""));
        }
        f.render_widget(Paragraph::new(lines), chunks[1]);

        if self.total_pages() > 1 {
            let dots: String = (0..self.total_pages())
                .map(|p| if p == self.page() { '•' } else { '○' })
                .collect();
            f.render_widget(Paragraph::new(dots).style(Style::default().fg(GREY)), chunks[2]);
        }
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::temp_store;
    use ratatui::{backend::TestBackend, Terminal};

    fn task(id: i64, name: &str) -> Task {
        Task { id, name: name.to_string(), ..Task::default() }
    }

    fn lane_with(n: i64, height: u16) -> Lane {
        Lane::new(Status::Todo, (1..=n).map(|i| task(i, &format!("t{i}"))).collect(), 30, height)
    }

    #[test]
    fn test_load_reads_only_matching_tasks() {
        let (_dir, store) = temp_store();
        store.insert_task("a", "", 1, Status::InProgress).unwrap();
        store.insert_task("b", "", 1, Status::Todo).unwrap();
        store.insert_task("c", "", 2, Status::InProgress).unwrap();
        let lane = Lane::load(&store, 30, 20, 1, Status::InProgress).unwrap();
        assert_eq!(lane.len(), 1);
        assert_eq!(lane.items()[0].name, "a");
        assert_eq!(lane.title(), "In Progress");
    }

    #[test]
    fn test_remove_keeps_cursor_in_bounds() {
        let mut lane = lane_with(3, 20);
        lane.select_index(2);
        assert_eq!(lane.remove_at(2).map(|t| t.id), Some(3));
        assert_eq!(lane.index(), 1);
        assert!(lane.remove_at(5).is_none());
    }

    #[test]
    fn test_remove_last_item_leaves_empty_lane() {
        let mut lane = lane_with(1, 20);
        lane.remove_at(0);
        assert!(lane.is_empty());
        assert!(lane.selected().is_none());
        assert_eq!(lane.index(), 0);
    }

    #[test]
    fn test_set_at_replaces_in_place() {
        let mut lane = lane_with(2, 20);
        lane.set_at(1, task(2, "renamed"));
        lane.set_at(9, task(9, "ignored"));
        assert_eq!(lane.items()[1].name, "renamed");
        assert_eq!(lane.len(), 2);
    }

    #[test]
    fn test_select_index_clamps() {
        let mut lane = lane_with(2, 20);
        lane.select_index(10);
        assert_eq!(lane.index(), 1);
    }

    #[test]
    fn test_resize_subtracts_chrome() {
        let mut lane = lane_with(0, 20);
        lane.resize(40, 30);
        assert_eq!(lane.viewport(), (40 - CHROME_WIDTH, 30 - CHROME_HEIGHT));
        lane.resize(3, 3);
        assert_eq!(lane.viewport(), (0, 0));
        assert_eq!(lane.per_page(), 1);
    }

    #[test]
    fn test_pagination() {
        // 12 rows of list -> 4 items per page.
        let mut lane = lane_with(10, 12 + CHROME_HEIGHT);
        assert_eq!(lane.per_page(), 4);
        assert_eq!(lane.total_pages(), 3);
        assert!(lane.on_first_page());

        lane.next_page();
        assert_eq!(lane.index(), 4);
        lane.next_page();
        assert_eq!(lane.index(), 8);
        assert!(lane.on_last_page());
        lane.next_page();
        assert_eq!(lane.index(), 8);

        lane.prev_page();
        assert_eq!(lane.index(), 4);
    }

    #[test]
    fn test_render_empty_and_full_lanes() {
        let mut terminal = Terminal::new(TestBackend::new(30, 20)).unwrap();
        let mut lane = lane_with(0, 20);
        lane.focus();
        terminal.draw(|f| lane.render(f, f.area())).unwrap();

        let lane = lane_with(8, 20);
        terminal.draw(|f| lane.render(f, f.area())).unwrap();
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer name", 6), "a lon…");
    }
}
