//! SQLite-backed storage for tasks and projects.
//!
//! `Store` only remembers where the database lives. Every operation opens its
//! own connection and drops it before returning, on success and on error
//! alike; nothing is pooled or shared between calls.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::error::{KanbanError, Result};
use crate::fields::{ProjectStatus, Status};
use crate::project::{Project, ProjectRow};
use crate::task::Task;

/// Handle to the on-disk store.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Open (and on first run create) the store at `path`, making sure both
    /// tables exist.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let store = Store { path: path.to_path_buf() };
        store.create_tasks_table()?;
        store.create_projects_table()?;
        debug!(path = %store.path.display(), "store ready");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        Ok(conn)
    }

    // ----- tasks -----

    pub fn create_tasks_table(&self) -> Result<()> {
        self.connect()?.execute_batch(
            "CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT,
                info TEXT,
                status INTEGER,
                project INTEGER
            )",
        )?;
        Ok(())
    }

    /// Insert a task and return the id the store assigned to it.
    pub fn insert_task(&self, name: &str, info: &str, project_id: i64, status: Status) -> Result<i64> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO tasks (name, info, status, project) VALUES (?1, ?2, ?3, ?4)",
            params![name, info, status, project_id],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, project_id, ?status, "inserted task");
        Ok(id)
    }

    pub fn delete_task(&self, id: i64) -> Result<()> {
        self.connect()?.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        debug!(id, "deleted task");
        Ok(())
    }

    pub fn get_task(&self, id: i64) -> Result<Task> {
        self.connect()?
            .query_row(
                "SELECT id, name, info, status, project FROM tasks WHERE id = ?1",
                params![id],
                row_to_task,
            )
            .optional()?
            .ok_or(KanbanError::TaskNotFound(id))
    }

    /// Merge `task` onto the stored row (see [`Task::merge`]) and persist the
    /// result. Returns the task as it is now stored.
    pub fn update_task(&self, task: &Task) -> Result<Task> {
        let merged = self.get_task(task.id)?.merge(task);
        self.connect()?.execute(
            "UPDATE tasks SET name = ?1, info = ?2, status = ?3, project = ?4 WHERE id = ?5",
            params![merged.name, merged.info, merged.status, merged.project_id, merged.id],
        )?;
        debug!(id = merged.id, status = ?merged.status, "updated task");
        Ok(merged)
    }

    /// Move `task` one step along the status cycle and persist it.
    pub fn next_status(&self, task: &Task) -> Result<Task> {
        let advanced = Task { status: task.status.next(), ..task.clone() };
        self.update_task(&advanced)
    }

    pub fn get_tasks_by_status(&self, status: Status, project_id: i64) -> Result<Vec<Task>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, info, status, project FROM tasks
             WHERE status = ?1 AND project = ?2
             ORDER BY id ASC",
        )?;
        let tasks = stmt
            .query_map(params![status, project_id], row_to_task)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }

    pub fn get_task_counts_by_project_grouped_by_status(&self, project_id: i64) -> Result<Vec<(Status, i64)>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT status, COUNT(*) FROM tasks WHERE project = ?1 GROUP BY status ORDER BY status",
        )?;
        let counts: Vec<(Status, i64)> = stmt
            .query_map(params![project_id], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(counts)
    }

    // ----- projects -----

    pub fn create_projects_table(&self) -> Result<()> {
        self.connect()?.execute_batch(
            "CREATE TABLE IF NOT EXISTS projects (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT,
                sort_order INTEGER,
                status INTEGER DEFAULT 0
            )",
        )?;
        Ok(())
    }

    /// Append a project after every existing one and return its id.
    pub fn insert_project(&self, name: &str) -> Result<i64> {
        let sort_order = self.get_highest_sort_order()? + 1;
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO projects (name, sort_order) VALUES (?1, ?2)",
            params![name, sort_order],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, sort_order, "inserted project");
        Ok(id)
    }

    pub fn get_project(&self, id: i64) -> Result<Project> {
        self.connect()?
            .query_row(
                "SELECT id, name, sort_order, status FROM projects WHERE id = ?1",
                params![id],
                row_to_project,
            )
            .optional()?
            .ok_or(KanbanError::ProjectNotFound(id))
    }

    pub fn get_projects_by_status(&self, status: ProjectStatus) -> Result<Vec<Project>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, sort_order, status FROM projects
             WHERE status = ?1
             ORDER BY sort_order ASC, id ASC",
        )?;
        let projects = stmt
            .query_map(params![status], row_to_project)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(projects)
    }

    pub fn archive_project(&self, id: i64) -> Result<()> {
        self.connect()?.execute(
            "UPDATE projects SET status = ?1 WHERE id = ?2",
            params![ProjectStatus::Archived, id],
        )?;
        debug!(id, "archived project");
        Ok(())
    }

    /// Highest sort order in use, or `0` when there are no projects.
    pub fn get_highest_sort_order(&self) -> Result<i64> {
        let highest = self.connect()?.query_row(
            "SELECT COALESCE(MAX(sort_order), 0) FROM projects",
            [],
            |row| row.get(0),
        )?;
        Ok(highest)
    }

    /// Projects with the given status, each with its task counts.
    pub fn project_rows(&self, status: ProjectStatus) -> Result<Vec<ProjectRow>> {
        self.get_projects_by_status(status)?
            .into_iter()
            .map(|project| {
                let counts = self.get_task_counts_by_project_grouped_by_status(project.id)?;
                Ok(ProjectRow::new(project, &counts))
            })
            .collect()
    }
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        info: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        status: row.get(3)?,
        project_id: row.get(4)?,
    })
}

fn row_to_project(row: &rusqlite::Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        sort_order: row.get::<_, Option<i64>>(2)?.unwrap_or_default(),
        status: row.get(3)?,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    /// A store in a fresh temporary directory. Keep the `TempDir` alive for
    /// as long as the store is used.
    pub(crate) fn temp_store() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(&dir.path().join("kanban.db")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_open_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("data").join("kanban.db");
        let store = Store::open(&path).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_insert_then_get_round_trip() {
        let (_dir, store) = temp_store();
        let id = store.insert_task("Buy milk", "semi-skimmed", 2, Status::InProgress).unwrap();
        assert!(id > 0);
        let task = store.get_task(id).unwrap();
        assert_eq!(
            task,
            Task {
                id,
                name: "Buy milk".to_string(),
                info: "semi-skimmed".to_string(),
                status: Status::InProgress,
                project_id: 2,
            }
        );
    }

    #[test]
    fn test_get_missing_task_is_not_found() {
        let (_dir, store) = temp_store();
        assert!(matches!(store.get_task(42), Err(KanbanError::TaskNotFound(42))));
    }

    #[test]
    fn test_delete_task() {
        let (_dir, store) = temp_store();
        let id = store.insert_task("a", "", 1, Status::Todo).unwrap();
        store.delete_task(id).unwrap();
        assert!(store.get_task(id).is_err());
    }

    #[test]
    fn test_update_merges_onto_stored_row() {
        let (_dir, store) = temp_store();
        let id = store.insert_task("Title", "Body", 1, Status::Done).unwrap();
        let incoming = Task { id, name: String::new(), info: "New body".to_string(), status: Status::Todo, project_id: 0 };
        let updated = store.update_task(&incoming).unwrap();
        assert_eq!(updated.name, "Title");
        assert_eq!(updated.info, "New body");
        assert_eq!(updated.status, Status::Todo);
        assert_eq!(updated.project_id, 1);
        assert_eq!(store.get_task(id).unwrap(), updated);
    }

    #[test]
    fn test_next_status_wraps_done_to_todo() {
        let (_dir, store) = temp_store();
        let id = store.insert_task("t", "", 1, Status::Done).unwrap();
        let task = store.get_task(id).unwrap();
        let advanced = store.next_status(&task).unwrap();
        assert_eq!(advanced.status, Status::Todo);
        assert_eq!(store.get_task(id).unwrap().status, Status::Todo);
    }

    #[test]
    fn test_tasks_by_status_filters_project_and_keeps_insert_order() {
        let (_dir, store) = temp_store();
        let a = store.insert_task("a", "", 1, Status::Todo).unwrap();
        store.insert_task("other project", "", 2, Status::Todo).unwrap();
        store.insert_task("done", "", 1, Status::Done).unwrap();
        let b = store.insert_task("b", "", 1, Status::Todo).unwrap();

        let ids: Vec<i64> = store
            .get_tasks_by_status(Status::Todo, 1)
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn test_counts_grouped_by_status() {
        let (_dir, store) = temp_store();
        store.insert_task("a", "", 1, Status::Todo).unwrap();
        store.insert_task("b", "", 1, Status::Todo).unwrap();
        store.insert_task("c", "", 1, Status::Done).unwrap();
        store.insert_task("d", "", 9, Status::InProgress).unwrap();
        let counts = store.get_task_counts_by_project_grouped_by_status(1).unwrap();
        assert_eq!(counts, vec![(Status::Todo, 2), (Status::Done, 1)]);
    }

    #[test]
    fn test_projects_sort_order_appends() {
        let (_dir, store) = temp_store();
        assert_eq!(store.get_highest_sort_order().unwrap(), 0);
        let first = store.insert_project("First").unwrap();
        let second = store.insert_project("Second").unwrap();
        assert_eq!(store.get_project(first).unwrap().sort_order, 1);
        assert_eq!(store.get_project(second).unwrap().sort_order, 2);
        assert_eq!(store.get_highest_sort_order().unwrap(), 2);
    }

    #[test]
    fn test_archive_hides_project_from_open_listing() {
        let (_dir, store) = temp_store();
        let keep = store.insert_project("Keep").unwrap();
        let gone = store.insert_project("Old").unwrap();
        store.archive_project(gone).unwrap();

        let open: Vec<i64> = store.get_projects_by_status(ProjectStatus::Open).unwrap().iter().map(|p| p.id).collect();
        assert_eq!(open, vec![keep]);

        let archived = store.get_projects_by_status(ProjectStatus::Archived).unwrap();
        assert_eq!(
            archived,
            vec![Project { id: gone, name: "Old".to_string(), sort_order: 2, status: ProjectStatus::Archived }]
        );
    }

    #[test]
    fn test_project_rows_carry_counts() {
        let (_dir, store) = temp_store();
        let id = store.insert_project("Home").unwrap();
        store.insert_task("a", "", id, Status::InProgress).unwrap();
        store.insert_task("b", "", id, Status::Done).unwrap();
        let rows = store.project_rows(ProjectStatus::Open).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!((rows[0].todo, rows[0].in_progress, rows[0].done), (0, 1, 1));
    }
}
