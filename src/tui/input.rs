//! Text input handling for the form and the project-name prompt.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// An editable line (or block, when `multiline`) of text with a cursor.
///
/// The cursor counts characters, not bytes.
#[derive(Clone, Debug)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
    pub active: bool,
    pub placeholder: &'static str,
    multiline: bool,
    cursor_visible: bool,
}

impl InputField {
    /// Create a new empty input field.
    pub fn new(placeholder: &'static str) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            active: false,
            placeholder,
            multiline: false,
            cursor_visible: true,
        }
    }

    /// Create a field where Enter inserts a newline.
    pub fn multiline(placeholder: &'static str) -> Self {
        Self { multiline: true, ..Self::new(placeholder) }
    }

    /// Replace the text and park the cursor at its end.
    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.chars().count();
    }

    pub fn focus(&mut self) {
        self.active = true;
        self.cursor_visible = true;
    }

    pub fn blur(&mut self) {
        self.active = false;
    }

    /// Toggle cursor visibility; called on every tick while the field is active.
    pub fn blink(&mut self) {
        if self.active {
            self.cursor_visible = !self.cursor_visible;
        }
    }

    pub fn cursor_visible(&self) -> bool {
        self.active && self.cursor_visible
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Insert a character at the current cursor position.
    pub fn handle_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_index(self.cursor - 1);
            self.value.remove(at);
            self.cursor -= 1;
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    /// Apply an editing key. Returns false for keys the field does not use.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.cursor_visible = true;
        match key.code {
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                self.handle_char(c)
            }
            KeyCode::Enter if self.multiline => self.handle_char('\n'),
            KeyCode::Backspace => self.handle_backspace(),
            KeyCode::Delete => self.handle_delete(),
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.chars().count(),
            _ => return false,
        }
        true
    }

    /// Line and column of the cursor, for placing the terminal cursor.
    pub fn cursor_position(&self) -> (u16, u16) {
        let before: String = self.value.chars().take(self.cursor).collect();
        let row = before.matches('\n').count();
        let col = before.rsplit('\n').next().map_or(0, |line| line.chars().count());
        (col as u16, row as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_insert_and_backspace_multibyte() {
        let mut field = InputField::new("");
        for c in "añb".chars() {
            field.handle_char(c);
        }
        field.move_cursor_left();
        field.handle_backspace();
        assert_eq!(field.value, "ab");
        assert_eq!(field.cursor, 1);
    }

    #[test]
    fn test_delete_at_end_is_noop() {
        let mut field = InputField::new("");
        field.set_value("abc");
        field.handle_delete();
        assert_eq!(field.value, "abc");
        field.cursor = 0;
        field.handle_delete();
        assert_eq!(field.value, "bc");
    }

    #[test]
    fn test_enter_only_in_multiline() {
        let mut single = InputField::new("");
        assert!(!single.handle_key(key(KeyCode::Enter)));
        let mut multi = InputField::multiline("");
        multi.set_value("one");
        assert!(multi.handle_key(key(KeyCode::Enter)));
        multi.handle_key(key(KeyCode::Char('x')));
        assert_eq!(multi.value, "one\nx");
        assert_eq!(multi.cursor_position(), (1, 1));
    }

    #[test]
    fn test_control_chars_are_not_inserted() {
        let mut field = InputField::new("");
        assert!(!field.handle_key(KeyEvent::new(KeyCode::Char('y'), KeyModifiers::CONTROL)));
        assert!(field.value.is_empty());
    }

    #[test]
    fn test_blink_only_when_active() {
        let mut field = InputField::new("");
        field.blink();
        assert!(!field.cursor_visible());
        field.focus();
        assert!(field.cursor_visible());
        field.blink();
        assert!(!field.cursor_visible());
        field.handle_key(key(KeyCode::Char('a')));
        assert!(field.cursor_visible());
    }
}
