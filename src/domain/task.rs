use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide task id counter
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identifier for a task within the process lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    fn next() -> Self {
        Self(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Make sure freshly allocated ids never collide with ids loaded from disk
    fn reserve_past(self) {
        NEXT_TASK_ID.fetch_max(self.0 + 1, Ordering::Relaxed);
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// A task attached to the active session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub validated: bool,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TaskId::next(),
            name: name.into(),
            validated: false,
        }
    }
}

/// Ordered task list of the active session
///
/// The store itself does not know about run states; the session machine
/// decides when a mutation is allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Task>", into = "Vec<Task>")]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl From<Vec<Task>> for TaskStore {
    fn from(tasks: Vec<Task>) -> Self {
        for task in &tasks {
            task.id.reserve_past();
        }
        Self { tasks }
    }
}

impl From<TaskStore> for Vec<Task> {
    fn from(store: TaskStore) -> Self {
        store.tasks
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new unvalidated task
    pub fn add(&mut self, name: impl Into<String>) -> Task {
        let task = Task::new(name);
        self.tasks.push(task.clone());
        task
    }

    /// Remove a task, returning it if it existed
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(idx))
    }

    pub fn rename(&mut self, id: TaskId, name: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(task) => {
                task.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Set the validated flag; returns the previous value, or None if the id is unknown
    pub fn set_validated(&mut self, id: TaskId, validated: bool) -> Option<bool> {
        let task = self.get_mut(id)?;
        let previous = task.validated;
        task.validated = validated;
        Some(previous)
    }

    fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Tasks in insertion order
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Split into (validated, unvalidated), consuming the store
    pub fn partition(self) -> (Vec<Task>, Vec<Task>) {
        self.tasks.into_iter().partition(|t| t.validated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut store = TaskStore::new();
        store.add("write");
        store.add("review");
        store.add("ship");

        let names: Vec<&str> = store.list().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["write", "review", "ship"]);
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let mut store = TaskStore::new();
        let a = store.add("");
        let b = store.add("");
        assert_ne!(a.id, b.id);
        assert!(b.id > a.id);
    }

    #[test]
    fn test_remove_and_rename() {
        let mut store = TaskStore::new();
        let a = store.add("a");
        let b = store.add("b");

        assert!(store.rename(b.id, "bee"));
        assert_eq!(store.remove(a.id).map(|t| t.name), Some("a".to_string()));
        assert!(store.remove(a.id).is_none());
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.list()[0].name, "bee");
    }

    #[test]
    fn test_set_validated_reports_previous() {
        let mut store = TaskStore::new();
        let a = store.add("a");

        assert_eq!(store.set_validated(a.id, true), Some(false));
        assert_eq!(store.set_validated(a.id, true), Some(true));
        assert!(store.list()[0].validated);
    }

    #[test]
    fn test_partition() {
        let mut store = TaskStore::new();
        let a = store.add("A");
        store.add("B");
        store.set_validated(a.id, true);

        let (done, open) = store.partition();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].name, "A");
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].name, "B");
    }

    #[test]
    fn test_loaded_ids_do_not_collide_with_new_ones() {
        let json = r#"[{"id": 900000, "name": "old", "validated": false}]"#;
        let mut store: TaskStore = serde_json::from_str(json).unwrap();
        let fresh = store.add("new");
        assert!(fresh.id > TaskId(900000));
    }
}
