//! Archiving of a finished work session.
//!
//! Validated tasks go to the session log, unvalidated task names go to the
//! carryover list, and the active session record is retired. Task identity
//! degrades to the name string on both paths.
//!
//! The stored record is flagged `archived` before anything is appended, so
//! a run interrupted halfway never archives the same session twice.

use crate::domain::{CompletedSessionRecord, CompletedTask, Session, Task};
use crate::error::{StorageError, StorageResult};
use crate::persistence::{KeyValueStore, SessionRepository};
use chrono::{DateTime, Local};
use tracing::info;

/// What a rollover did, including storage steps that failed
#[derive(Debug, Default)]
pub struct RolloverOutcome {
    pub record: Option<CompletedSessionRecord>,
    pub carried_over: Vec<String>,
    pub failures: Vec<StorageError>,
}

/// Archive a finished work session
///
/// Takes the session's tasks. Every storage step is attempted even if an
/// earlier one fails; failures are collected in the outcome.
pub fn roll_over<S: KeyValueStore>(
    session: &mut Session,
    repo: &mut SessionRepository<S>,
    now: DateTime<Local>,
) -> RolloverOutcome {
    let mut outcome = RolloverOutcome::default();

    session.archived = true;
    if let Err(e) = repo.save_active_session(session) {
        outcome.failures.push(e);
    }

    let (validated, unvalidated) = std::mem::take(&mut session.tasks).partition();

    let record = CompletedSessionRecord::new(
        session.name.clone(),
        now,
        validated
            .into_iter()
            .map(|task| CompletedTask { name: task.name })
            .collect(),
    );
    if let Err(e) = repo.append_completed_session(record.clone()) {
        outcome.failures.push(e);
    }
    outcome.record = Some(record);

    outcome.carried_over = carryover_names(unvalidated);
    if let Err(e) = append_carryover(repo, &outcome.carried_over) {
        outcome.failures.push(e);
    }

    if let Err(e) = repo.clear_active_session() {
        outcome.failures.push(e);
    }

    info!(
        validated = outcome.record.as_ref().map_or(0, |r| r.tasks.len()),
        carried_over = outcome.carried_over.len(),
        "archived work session"
    );
    outcome
}

/// Names worth carrying over, in order; blank names are dropped
pub fn carryover_names(tasks: Vec<Task>) -> Vec<String> {
    tasks
        .into_iter()
        .map(|task| task.name)
        .filter(|name| !name.trim().is_empty())
        .collect()
}

/// Append names to the stored carryover list
pub fn append_carryover<S: KeyValueStore>(
    repo: &mut SessionRepository<S>,
    names: &[String],
) -> StorageResult<()> {
    if names.is_empty() {
        return Ok(());
    }
    let mut stored = repo.get_incomplete_tasks()?;
    stored.extend(names.iter().cloned());
    repo.set_incomplete_tasks(&stored)
}
