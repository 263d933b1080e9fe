use super::store::KeyValueStore;
use crate::domain::{CompletedSessionRecord, Session};
use crate::error::{StorageError, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

pub const ACTIVE_SESSION_KEY: &str = "active-session";
pub const COMPLETED_SESSIONS_KEY: &str = "completed-sessions";
pub const INCOMPLETE_TASKS_KEY: &str = "incomplete-tasks";

/// Reads and writes the three durable records on top of a key-value store
#[derive(Debug)]
pub struct SessionRepository<S> {
    store: S,
}

impl<S: KeyValueStore> SessionRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Overwrite the active session record
    pub fn save_active_session(&mut self, session: &Session) -> StorageResult<()> {
        self.write_json(ACTIVE_SESSION_KEY, session)?;
        debug!(
            run_state = ?session.run_state,
            seconds = session.seconds_remaining,
            "saved active session"
        );
        Ok(())
    }

    /// Load the active session
    ///
    /// An archived finished record counts as absent. An unparseable record
    /// surfaces as `StorageError::Corrupt` so the caller can discard it.
    pub fn load_active_session(&self) -> StorageResult<Option<Session>> {
        let Some(raw) = self.store.get(ACTIVE_SESSION_KEY)? else {
            return Ok(None);
        };

        let session: Session = serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
            key: ACTIVE_SESSION_KEY.to_string(),
            source,
        })?;

        if session.is_archived_marker() {
            debug!("stored session is an archived marker, ignoring");
            return Ok(None);
        }
        Ok(Some(session))
    }

    /// Load the active session for display, reading a corrupt record as absent
    pub fn peek_active_session(&self) -> StorageResult<Option<Session>> {
        match self.load_active_session() {
            Err(e @ StorageError::Corrupt { .. }) => {
                warn!(error = %e, "ignoring corrupt active session");
                Ok(None)
            }
            other => other,
        }
    }

    pub fn clear_active_session(&mut self) -> StorageResult<()> {
        self.store.remove(ACTIVE_SESSION_KEY)
    }

    /// All completed sessions, oldest first
    pub fn load_completed_sessions(&self) -> StorageResult<Vec<CompletedSessionRecord>> {
        self.read_json_or_default(COMPLETED_SESSIONS_KEY)
    }

    /// Read-modify-write append to the session log
    pub fn append_completed_session(&mut self, record: CompletedSessionRecord) -> StorageResult<()> {
        let mut records = self.load_completed_sessions()?;
        records.push(record);
        self.write_json(COMPLETED_SESSIONS_KEY, &records)
    }

    /// Remove every task with this name from the log, dropping records it empties
    ///
    /// Returns the number of task entries removed.
    pub fn delete_completed_task_by_name(&mut self, name: &str) -> StorageResult<usize> {
        let mut records = self.load_completed_sessions()?;
        let mut removed = 0;

        records.retain_mut(|record| {
            let before = record.tasks.len();
            record.tasks.retain(|task| task.name != name);
            let dropped = before - record.tasks.len();
            removed += dropped;
            !(dropped > 0 && record.tasks.is_empty())
        });

        if removed > 0 {
            self.write_json(COMPLETED_SESSIONS_KEY, &records)?;
        }
        Ok(removed)
    }

    pub fn get_incomplete_tasks(&self) -> StorageResult<Vec<String>> {
        self.read_json_or_default(INCOMPLETE_TASKS_KEY)
    }

    pub fn set_incomplete_tasks(&mut self, names: &[String]) -> StorageResult<()> {
        self.write_json(INCOMPLETE_TASKS_KEY, &names)
    }

    pub fn clear_incomplete_tasks(&mut self) -> StorageResult<()> {
        self.store.remove(INCOMPLETE_TASKS_KEY)
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(value).map_err(|source| StorageError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &json)
    }

    /// Lists fall back to empty when the stored value cannot be parsed
    fn read_json_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> StorageResult<T> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(T::default());
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(key, error = %e, "discarding corrupt record");
                Ok(T::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompletedTask, RunState};
    use crate::persistence::{FileStore, MemoryStore};
    use chrono::Local;
    use pretty_assertions::assert_eq;

    fn record(name: &str, tasks: &[&str]) -> CompletedSessionRecord {
        CompletedSessionRecord::new(
            name,
            Local::now(),
            tasks
                .iter()
                .map(|t| CompletedTask { name: t.to_string() })
                .collect(),
        )
    }

    #[test]
    fn test_active_session_round_trip() {
        let mut repo = SessionRepository::new(MemoryStore::new());
        assert!(repo.load_active_session().unwrap().is_none());

        let mut session = Session::default();
        session.run_state = RunState::Running;
        session.seconds_remaining = 1234;
        session.tasks.add("write");
        repo.save_active_session(&session).unwrap();

        let loaded = repo.load_active_session().unwrap().unwrap();
        assert_eq!(loaded, session);

        repo.clear_active_session().unwrap();
        assert!(repo.load_active_session().unwrap().is_none());
    }

    #[test]
    fn test_archived_marker_loads_as_absent() {
        let mut repo = SessionRepository::new(MemoryStore::new());
        let mut session = Session::default();
        session.run_state = RunState::Finished;
        session.seconds_remaining = 0;
        session.archived = true;
        repo.save_active_session(&session).unwrap();

        assert!(repo.load_active_session().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_active_session_is_reported() {
        let mut store = MemoryStore::new();
        store.set(ACTIVE_SESSION_KEY, "{not json").unwrap();
        let repo = SessionRepository::new(store);

        let err = repo.load_active_session().unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[test]
    fn test_peek_reads_corrupt_active_session_as_absent() {
        let mut store = MemoryStore::new();
        store.set(ACTIVE_SESSION_KEY, "{not json").unwrap();
        let repo = SessionRepository::new(store);

        assert!(repo.peek_active_session().unwrap().is_none());
        assert!(repo.store().contains(ACTIVE_SESSION_KEY));
    }

    #[test]
    fn test_append_completed_sessions_in_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut repo = SessionRepository::new(FileStore::new(temp_dir.path()));

        repo.append_completed_session(record("morning", &["A"])).unwrap();
        repo.append_completed_session(record("afternoon", &["B"])).unwrap();

        let names: Vec<String> = repo
            .load_completed_sessions()
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["morning".to_string(), "afternoon".to_string()]);
    }

    #[test]
    fn test_delete_completed_task_by_name() {
        let mut repo = SessionRepository::new(MemoryStore::new());
        repo.append_completed_session(record("one", &["A", "B"])).unwrap();
        repo.append_completed_session(record("two", &["A"])).unwrap();
        repo.append_completed_session(record("three", &["C", "A", "A"])).unwrap();

        let removed = repo.delete_completed_task_by_name("A").unwrap();
        assert_eq!(removed, 4);

        let records = repo.load_completed_sessions().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "one");
        assert_eq!(records[0].tasks, vec![CompletedTask { name: "B".to_string() }]);
        assert_eq!(records[1].name, "three");
        assert_eq!(records[1].tasks, vec![CompletedTask { name: "C".to_string() }]);
    }

    #[test]
    fn test_delete_keeps_records_that_were_already_empty() {
        let mut repo = SessionRepository::new(MemoryStore::new());
        repo.append_completed_session(record("empty", &[])).unwrap();
        repo.append_completed_session(record("full", &["A"])).unwrap();

        repo.delete_completed_task_by_name("A").unwrap();
        let records = repo.load_completed_sessions().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "empty");
    }

    #[test]
    fn test_incomplete_tasks() {
        let mut repo = SessionRepository::new(MemoryStore::new());
        assert!(repo.get_incomplete_tasks().unwrap().is_empty());

        repo.set_incomplete_tasks(&["B".to_string(), "C".to_string()]).unwrap();
        assert_eq!(repo.get_incomplete_tasks().unwrap(), vec!["B", "C"]);

        repo.clear_incomplete_tasks().unwrap();
        assert!(repo.get_incomplete_tasks().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_lists_read_as_empty() {
        let mut store = MemoryStore::new();
        store.set(COMPLETED_SESSIONS_KEY, "garbage").unwrap();
        store.set(INCOMPLETE_TASKS_KEY, "{}").unwrap();
        let repo = SessionRepository::new(store);

        assert!(repo.load_completed_sessions().unwrap().is_empty());
        assert!(repo.get_incomplete_tasks().unwrap().is_empty());
    }
}
