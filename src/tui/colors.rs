//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Border of the focused lane.
pub const FOCUS: Color = Color::Indexed(62);
/// Muted text: help lines, placeholders.
pub const GREY: Color = Color::Indexed(241);
/// Progress bar fill and task detail frame.
pub const SECONDARY: Color = Color::Rgb(0x66, 0x33, 0x99);
/// Selected item in a lane or table.
pub const HIGHLIGHT: Color = Color::Rgb(0xC0, 0xFF, 0xE3);
/// Border of the form's input boxes.
pub const INPUT_BORDER: Color = Color::Indexed(33);
