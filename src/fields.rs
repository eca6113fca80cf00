//! Enumerations shared by the store and the board.
//!
//! `Status` doubles as lane identity: the board keeps one lane per variant,
//! indexed by [`Status::index`]. Both enums are stored as small integers.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// Task status, ordered `Todo < InProgress < Done`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Todo, Status::InProgress, Status::Done];

    /// Position of the status in [`Status::ALL`], used to index lanes.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Next status in the cycle. `Done` wraps around to `Todo`.
    pub fn next(self) -> Status {
        match self {
            Status::Todo => Status::InProgress,
            Status::InProgress => Status::Done,
            Status::Done => Status::Todo,
        }
    }

    /// Previous status in the cycle. `Todo` wraps around to `Done`.
    pub fn prev(self) -> Status {
        match self {
            Status::Todo => Status::Done,
            Status::InProgress => Status::Todo,
            Status::Done => Status::InProgress,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Status::Todo => "To Do",
            Status::InProgress => "In Progress",
            Status::Done => "Done",
        }
    }

    fn from_code(code: i64) -> Option<Status> {
        match code {
            0 => Some(Status::Todo),
            1 => Some(Status::InProgress),
            2 => Some(Status::Done),
            _ => None,
        }
    }
}

/// Project visibility. Archived projects are hidden from the default listing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Open,
    Archived,
}

impl ProjectStatus {
    /// The other view, for the "view archived" toggle.
    pub fn toggled(self) -> ProjectStatus {
        match self {
            ProjectStatus::Open => ProjectStatus::Archived,
            ProjectStatus::Archived => ProjectStatus::Open,
        }
    }
}

impl ToSql for Status {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(*self as i64))
    }
}

impl FromSql for Status {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = value.as_i64()?;
        Status::from_code(code).ok_or(FromSqlError::OutOfRange(code))
    }
}

impl ToSql for ProjectStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(*self as i64))
    }
}

impl FromSql for ProjectStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_i64()? {
            0 => Ok(ProjectStatus::Open),
            1 => Ok(ProjectStatus::Archived),
            other => Err(FromSqlError::OutOfRange(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_cycle_wraps() {
        assert_eq!(Status::Todo.next(), Status::InProgress);
        assert_eq!(Status::InProgress.next(), Status::Done);
        assert_eq!(Status::Done.next(), Status::Todo);
        assert_eq!(Status::Todo.prev(), Status::Done);
        for s in Status::ALL {
            assert_eq!(s.next().prev(), s);
        }
    }

    #[test]
    fn test_status_order_and_index() {
        assert!(Status::Todo < Status::InProgress);
        assert!(Status::InProgress < Status::Done);
        assert_eq!(Status::ALL.map(Status::index), [0, 1, 2]);
    }

    #[test]
    fn test_project_status_toggle() {
        assert_eq!(ProjectStatus::Open.toggled(), ProjectStatus::Archived);
        assert_eq!(ProjectStatus::Archived.toggled(), ProjectStatus::Open);
    }
}
