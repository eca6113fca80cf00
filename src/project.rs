//! Projects and the per-project rows shown in the project list.

use serde::{Deserialize, Serialize};

use crate::fields::{ProjectStatus, Status};

/// A named group of tasks. Projects are archived, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub sort_order: i64,
    pub status: ProjectStatus,
}

/// A project together with its live task counts per lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRow {
    pub project: Project,
    pub todo: i64,
    pub in_progress: i64,
    pub done: i64,
}

impl ProjectRow {
    /// Build a row from the grouped counts returned by the store.
    /// Statuses missing from `counts` have no tasks.
    pub fn new(project: Project, counts: &[(Status, i64)]) -> Self {
        let mut row = ProjectRow { project, todo: 0, in_progress: 0, done: 0 };
        for &(status, count) in counts {
            match status {
                Status::Todo => row.todo = count,
                Status::InProgress => row.in_progress = count,
                Status::Done => row.done = count,
            }
        }
        row
    }

    pub fn total(&self) -> i64 {
        self.todo + self.in_progress + self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_from_partial_counts() {
        let project = Project {
            id: 1,
            name: "Home".to_string(),
            sort_order: 1,
            status: ProjectStatus::Open,
        };
        let row = ProjectRow::new(project, &[(Status::Done, 4), (Status::Todo, 2)]);
        assert_eq!((row.todo, row.in_progress, row.done), (2, 0, 4));
        assert_eq!(row.total(), 6);
    }
}
