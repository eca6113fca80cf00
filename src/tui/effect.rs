//! Values that flow between the screens and the router.
//!
//! Key handlers never touch the store. They answer with a [`Navigation`];
//! any store work rides along as an [`Effect`], which the router runs before
//! the next frame and turns into an [`Event`] for the screen that owns the
//! affected data.

use crate::fields::Status;
use crate::project::ProjectRow;
use crate::task::Task;
use crate::tui::enums::ScreenKind;
use crate::tui::task_form::TaskForm;
use crate::tui::task_view::TaskView;

/// What the active screen asks the router to do after a key press.
#[derive(Debug)]
pub enum Navigation {
    Stay,
    Quit,
    /// Stay on this screen but run a store operation.
    Run(Effect),
    /// Switch screens, optionally running a store operation first.
    Go { to: Route, effect: Option<Effect> },
}

impl Navigation {
    pub fn go(to: Route) -> Self {
        Navigation::Go { to, effect: None }
    }

    pub fn go_with(to: Route, effect: Effect) -> Self {
        Navigation::Go { to, effect: Some(effect) }
    }
}

/// Destination of a screen switch. Screens that are rebuilt on every visit
/// carry their fresh state; the others are taken from the registry.
#[derive(Debug)]
pub enum Route {
    ProjectList,
    Board,
    Form(Box<TaskForm>),
    TaskDetail(TaskView),
}

impl Route {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Route::ProjectList => ScreenKind::ProjectList,
            Route::Board => ScreenKind::Board,
            Route::Form(_) => ScreenKind::Form,
            Route::TaskDetail(_) => ScreenKind::TaskDetail,
        }
    }
}

/// A deferred store operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Insert an unsaved task; the created event carries the assigned id.
    CreateTask(Task),
    /// Merge-update a task shown at `index` of its lane.
    UpdateTask { task: Task, index: usize },
    AdvanceSelectedTask,
    DeleteSelectedTask,
    OpenBoard { project_id: i64 },
    RefreshProjects,
    CreateProject { name: String },
    ArchiveProject { id: i64, index: usize },
}

/// The outcome of an effect, folded back into screen state.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    TaskCreated(Task),
    TaskEdited { task: Task, index: usize },
    /// A task left this lane; its viewport needs refreshing.
    LaneChanged(Status),
    ProjectsLoaded(Vec<ProjectRow>),
    ProjectArchived { index: usize },
}
