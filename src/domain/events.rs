use super::enums::{Mode, RunState};
use super::task::TaskId;
use thiserror::Error;

/// Why a session operation was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("session is already running")]
    AlreadyRunning,
    #[error("operation requires an idle session (currently {0:?})")]
    NotIdle(RunState),
    #[error("operation requires a running session (currently {0:?})")]
    NotRunning(RunState),
    #[error("operation requires a finished session (currently {0:?})")]
    NotFinished(RunState),
    #[error("session cannot be started from {0:?}")]
    CannotStart(RunState),
    #[error("no task with id {0}")]
    UnknownTask(TaskId),
    #[error("tasks belong to work sessions")]
    BreakHasNoTasks,
}

/// Outcome of a state-machine operation
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Ok,
    Rejected { reason: Rejection },
}

impl Transition {
    pub fn rejected(reason: Rejection) -> Self {
        Self::Rejected { reason }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn is_rejected(&self) -> bool {
        !self.is_ok()
    }
}

/// Notifications queued for the presentation layer and collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Run state, countdown, mode or task list changed
    StateChanged,
    /// Countdown hit zero
    ReachedZero { mode: Mode },
    /// A work session entered `finished`; task validation is open
    WorkFinished,
    /// `complete()` ran on a finished session
    Completed { mode: Mode },
    /// Anything derived from this task's validation must be dropped
    TaskUnvalidated { id: TaskId },
    /// A work session was started with an empty task list
    StartedWithoutTasks,
    /// First storage failure of the process
    StorageWarning { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_helpers() {
        assert!(Transition::Ok.is_ok());
        let rejected = Transition::rejected(Rejection::AlreadyRunning);
        assert!(rejected.is_rejected());
        assert_eq!(
            rejected,
            Transition::Rejected {
                reason: Rejection::AlreadyRunning
            }
        );
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(
            Rejection::NotIdle(RunState::Running).to_string(),
            "operation requires an idle session (currently Running)"
        );
    }
}
