//! Enumerations for TUI state management.

/// The four top-level screens. The router keeps one of these as the active
/// discriminant and the matching state in its registry.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ScreenKind {
    ProjectList,
    Board,
    Form,
    TaskDetail,
}

/// Which of the form's two inputs receives keystrokes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FormFocus {
    Title,
    Description,
}
