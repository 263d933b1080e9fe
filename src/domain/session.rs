use super::enums::{Mode, RunState};
use super::task::TaskStore;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The durable active session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub name: String,
    pub seconds_remaining: u32,
    pub run_state: RunState,
    pub mode: Mode,
    #[serde(default)]
    pub started_at: Option<DateTime<Local>>,
    #[serde(default)]
    pub tasks: TaskStore,
    /// Task list was seeded from the carryover and the session has not started yet
    #[serde(default)]
    pub carryover_seeded: bool,
    /// Set on a finished record once it has been archived; such a record loads as absent
    #[serde(default)]
    pub archived: bool,
}

impl Session {
    /// A fresh idle session with the mode's default countdown
    pub fn idle(mode: Mode) -> Self {
        Self {
            name: String::new(),
            seconds_remaining: mode.default_seconds(),
            run_state: RunState::Idle,
            mode,
            started_at: None,
            tasks: TaskStore::new(),
            carryover_seeded: false,
            archived: false,
        }
    }

    /// Whether this stored record should be treated as no session at all
    pub fn is_archived_marker(&self) -> bool {
        self.run_state == RunState::Finished && self.archived
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::idle(Mode::Work)
    }
}

/// Snapshot of a validated task inside the session log
///
/// Only the name survives archiving; two tasks with the same name are
/// indistinguishable from here on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTask {
    pub name: String,
}

/// One finished, user-confirmed work session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedSessionRecord {
    pub id: Uuid,
    pub name: String,
    pub completed_at: DateTime<Local>,
    pub tasks: Vec<CompletedTask>,
}

impl CompletedSessionRecord {
    pub fn new(name: impl Into<String>, completed_at: DateTime<Local>, tasks: Vec<CompletedTask>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            completed_at,
            tasks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_session_defaults() {
        let session = Session::idle(Mode::Break);
        assert_eq!(session.seconds_remaining, 300);
        assert_eq!(session.run_state, RunState::Idle);
        assert!(session.tasks.is_empty());
        assert!(session.started_at.is_none());
    }

    #[test]
    fn test_archived_marker_requires_finished() {
        let mut session = Session::default();
        session.archived = true;
        assert!(!session.is_archived_marker());

        session.run_state = RunState::Finished;
        assert!(session.is_archived_marker());
    }

    #[test]
    fn test_session_tolerates_missing_optional_fields() {
        let json = r#"{"seconds_remaining": 42, "run_state": "paused", "mode": "work"}"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.seconds_remaining, 42);
        assert_eq!(session.run_state, RunState::Paused);
        assert!(session.name.is_empty());
        assert!(!session.archived);
    }
}
