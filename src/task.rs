//! Task data structure and the merge rule used for partial updates.

use serde::{Deserialize, Serialize};

use crate::fields::Status;

/// A single card on a board.
///
/// `id` is assigned by the store; `0` marks a task that has not been saved yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub info: String,
    pub status: Status,
    pub project_id: i64,
}

impl Task {
    /// Build an unsaved task.
    pub fn new(status: Status, name: &str, info: &str, project_id: i64) -> Self {
        Task {
            id: 0,
            name: name.to_string(),
            info: info.to_string(),
            status,
            project_id,
        }
    }

    /// Merge `incoming` onto `self` with the sentinel rule of [`TaskPatch::from_task`].
    /// The id of `self` is always kept.
    pub fn merge(&self, incoming: &Task) -> Task {
        let mut merged = self.clone();
        TaskPatch::from_task(incoming).apply(&mut merged);
        merged
    }
}

/// The set of fields an update actually carries.
///
/// `None` means "keep the stored value". The id is not part of a patch, so it
/// can never be overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub info: Option<String>,
    pub status: Option<Status>,
    pub project_id: Option<i64>,
}

impl TaskPatch {
    /// Read a full task as a patch: empty strings and a zero project count as
    /// absent, the status is always present (`Todo` is a real value).
    ///
    /// A text field the user deliberately cleared is indistinguishable from
    /// one that was never supplied, so clearing a name or description through
    /// this path keeps the old text.
    pub fn from_task(task: &Task) -> Self {
        TaskPatch {
            name: Some(task.name.clone()).filter(|s| !s.is_empty()),
            info: Some(task.info.clone()).filter(|s| !s.is_empty()),
            status: Some(task.status),
            project_id: Some(task.project_id).filter(|&p| p != 0),
        }
    }

    pub fn apply(&self, task: &mut Task) {
        if let Some(name) = &self.name {
            task.name = name.clone();
        }
        if let Some(info) = &self.info {
            task.info = info.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(project_id) = self.project_id {
            task.project_id = project_id;
        }
    }
}
