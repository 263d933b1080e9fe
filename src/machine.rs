//! The session state machine.
//!
//! `idle -> running -> {paused, finished}`, `paused -> running`, and
//! `finished -> idle` through `complete()`. Every operation returns a
//! [`Transition`]; illegal calls are rejected without touching state.
//! State-mutating operations persist the session right away. Storage
//! failures never abort an operation: the in-memory session stays
//! authoritative and the first failure is surfaced as a warning.

use crate::domain::{
    parse_user_input, Mode, Rejection, RunState, Session, SessionEvent, Task, TaskId, Transition,
};
use crate::error::StorageError;
use crate::persistence::{KeyValueStore, SessionRepository};
use crate::rollover::{append_carryover, carryover_names, roll_over};
use crate::ticker::TickHandle;
use chrono::Local;
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct SessionMachine<S: KeyValueStore> {
    session: Session,
    repo: SessionRepository<S>,
    tick_handle: Option<TickHandle>,
    events: Vec<SessionEvent>,
    storage_warning: Option<String>,
}

impl<S: KeyValueStore> SessionMachine<S> {
    /// Restore the machine from storage
    ///
    /// A stored running session resumes ticking right away; the stored
    /// countdown is trusted as-is, time spent while the program was not
    /// running is not deducted. With nothing stored (or a corrupt record)
    /// the machine starts idle in work mode and seeds the carryover.
    pub fn load(repo: SessionRepository<S>) -> Self {
        let mut machine = Self {
            session: Session::default(),
            repo,
            tick_handle: None,
            events: Vec::new(),
            storage_warning: None,
        };

        match machine.repo.load_active_session() {
            Ok(Some(session)) => {
                info!(
                    run_state = ?session.run_state,
                    mode = ?session.mode,
                    seconds = session.seconds_remaining,
                    "restored active session"
                );
                machine.session = session;
                if machine.session.run_state == RunState::Running {
                    machine.tick_handle = Some(TickHandle::arm(Instant::now()));
                }
            }
            Ok(None) => {
                if machine.seed_carryover() {
                    machine.persist();
                }
            }
            Err(e @ StorageError::Corrupt { .. }) => {
                warn!(error = %e, "discarding corrupt active session");
                if let Err(e) = machine.repo.clear_active_session() {
                    machine.note_storage_failure(e);
                }
                if machine.seed_carryover() {
                    machine.persist();
                }
            }
            Err(e) => machine.note_storage_failure(e),
        }

        machine.events.push(SessionEvent::StateChanged);
        machine
    }

    /// Start from idle, or resume from paused
    pub fn start(&mut self) -> Transition {
        match self.session.run_state {
            RunState::Running => return Transition::rejected(Rejection::AlreadyRunning),
            RunState::Finished => {
                return Transition::rejected(Rejection::CannotStart(RunState::Finished))
            }
            RunState::Idle => {
                if self.session.seconds_remaining == 0 {
                    self.session.seconds_remaining = self.session.mode.default_seconds();
                }
                self.session.started_at = Some(Local::now());
                self.session.carryover_seeded = false;
                if self.session.mode == Mode::Work && self.session.tasks.is_empty() {
                    self.events.push(SessionEvent::StartedWithoutTasks);
                }
                info!(
                    mode = ?self.session.mode,
                    seconds = self.session.seconds_remaining,
                    "session started"
                );
            }
            RunState::Paused => {
                info!(seconds = self.session.seconds_remaining, "session resumed");
            }
        }

        self.session.run_state = RunState::Running;
        self.tick_handle = Some(TickHandle::arm(Instant::now()));
        self.changed();
        Transition::Ok
    }

    pub fn pause(&mut self) -> Transition {
        if self.session.run_state != RunState::Running {
            return Transition::rejected(Rejection::NotRunning(self.session.run_state));
        }
        self.tick_handle = None;
        self.session.run_state = RunState::Paused;
        info!(seconds = self.session.seconds_remaining, "session paused");
        self.changed();
        Transition::Ok
    }

    /// Back to idle with the current mode's default countdown, from any state
    pub fn reset(&mut self) -> Transition {
        self.tick_handle = None;
        if let Err(e) = self.repo.clear_active_session() {
            self.note_storage_failure(e);
        }
        self.session = Session::idle(self.session.mode);
        info!(mode = ?self.session.mode, "session reset");
        self.events.push(SessionEvent::StateChanged);
        Transition::Ok
    }

    /// Flip between work and break; idle only
    pub fn toggle_mode(&mut self) -> Transition {
        if self.session.run_state != RunState::Idle {
            return Transition::rejected(Rejection::NotIdle(self.session.run_state));
        }
        self.session.mode = self.session.mode.toggled();
        self.session.seconds_remaining = self.session.mode.default_seconds();
        match self.session.mode {
            Mode::Work => {
                self.seed_carryover();
            }
            Mode::Break => self.park_tasks(),
        }
        info!(mode = ?self.session.mode, "mode toggled");
        self.changed();
        Transition::Ok
    }

    /// One elapsed second while running
    pub fn tick(&mut self) -> Transition {
        if self.session.run_state != RunState::Running {
            return Transition::rejected(Rejection::NotRunning(self.session.run_state));
        }

        self.session.seconds_remaining = self.session.seconds_remaining.saturating_sub(1);
        if self.session.seconds_remaining == 0 {
            self.finish();
        } else {
            debug!(seconds = self.session.seconds_remaining, "tick");
            self.changed();
        }
        Transition::Ok
    }

    /// Fire every tick that came due up to `now`
    ///
    /// Returns the number of ticks applied. Stops early when the countdown
    /// finishes.
    pub fn pump(&mut self, now: Instant) -> u32 {
        let due = match self.tick_handle.as_mut() {
            Some(handle) => handle.due_ticks(now),
            None => return 0,
        };

        let mut fired = 0;
        for _ in 0..due {
            if self.tick_handle.is_none() || self.tick().is_rejected() {
                break;
            }
            fired += 1;
        }
        fired
    }

    /// Leave `finished`
    ///
    /// A break goes straight back to idle work. A work session is archived
    /// and the machine lands idle in break mode, waiting for `start()`.
    pub fn complete(&mut self) -> Transition {
        if self.session.run_state != RunState::Finished {
            return Transition::rejected(Rejection::NotFinished(self.session.run_state));
        }

        let finished_mode = self.session.mode;
        match finished_mode {
            Mode::Break => {
                self.park_tasks();
                if let Err(e) = self.repo.clear_active_session() {
                    self.note_storage_failure(e);
                }
                self.session = Session::idle(Mode::Work);
                self.seed_carryover();
            }
            Mode::Work => {
                let outcome = roll_over(&mut self.session, &mut self.repo, Local::now());
                for failure in outcome.failures {
                    self.note_storage_failure(failure);
                }
                self.session = Session::idle(Mode::Break);
            }
        }

        info!(mode = ?finished_mode, "session completed");
        self.events.push(SessionEvent::Completed {
            mode: finished_mode,
        });
        self.changed();
        Transition::Ok
    }

    /// Apply user-edited timer text; idle only
    pub fn edit_time(&mut self, text: &str) -> Transition {
        if self.session.run_state != RunState::Idle {
            return Transition::rejected(Rejection::NotIdle(self.session.run_state));
        }
        self.session.seconds_remaining = parse_user_input(text, self.session.mode);
        self.changed();
        Transition::Ok
    }

    /// Rename the session; idle only
    pub fn set_name(&mut self, name: &str) -> Transition {
        if self.session.run_state != RunState::Idle {
            return Transition::rejected(Rejection::NotIdle(self.session.run_state));
        }
        self.session.name = name.trim().to_string();
        self.changed();
        Transition::Ok
    }

    /// Append a task to an idle work session
    pub fn add_task(&mut self, name: &str) -> Result<Task, Rejection> {
        if self.session.run_state != RunState::Idle {
            return Err(Rejection::NotIdle(self.session.run_state));
        }
        if self.session.mode == Mode::Break {
            return Err(Rejection::BreakHasNoTasks);
        }
        let task = self.session.tasks.add(name);
        debug!(id = %task.id, "task added");
        self.changed();
        Ok(task)
    }

    pub fn delete_task(&mut self, id: TaskId) -> Transition {
        if self.session.run_state != RunState::Idle {
            return Transition::rejected(Rejection::NotIdle(self.session.run_state));
        }
        if self.session.tasks.remove(id).is_none() {
            return Transition::rejected(Rejection::UnknownTask(id));
        }
        self.changed();
        Transition::Ok
    }

    pub fn rename_task(&mut self, id: TaskId, name: &str) -> Transition {
        if self.session.run_state != RunState::Idle {
            return Transition::rejected(Rejection::NotIdle(self.session.run_state));
        }
        if !self.session.tasks.rename(id, name) {
            return Transition::rejected(Rejection::UnknownTask(id));
        }
        self.changed();
        Transition::Ok
    }

    /// Mark a task done; finished only, idempotent
    pub fn validate_task(&mut self, id: TaskId) -> Transition {
        if self.session.run_state != RunState::Finished {
            return Transition::rejected(Rejection::NotFinished(self.session.run_state));
        }
        match self.session.tasks.set_validated(id, true) {
            None => Transition::rejected(Rejection::UnknownTask(id)),
            Some(true) => Transition::Ok,
            Some(false) => {
                self.changed();
                Transition::Ok
            }
        }
    }

    /// Reverse a validation; finished only
    pub fn unvalidate_task(&mut self, id: TaskId) -> Transition {
        if self.session.run_state != RunState::Finished {
            return Transition::rejected(Rejection::NotFinished(self.session.run_state));
        }
        match self.session.tasks.set_validated(id, false) {
            None => Transition::rejected(Rejection::UnknownTask(id)),
            Some(false) => Transition::Ok,
            Some(true) => {
                self.events.push(SessionEvent::TaskUnvalidated { id });
                self.changed();
                Transition::Ok
            }
        }
    }

    /// Drop a task name from the session log
    pub fn forget_completed_task(&mut self, name: &str) -> usize {
        match self.repo.delete_completed_task_by_name(name) {
            Ok(removed) => {
                info!(name, removed, "removed task from session log");
                removed
            }
            Err(e) => {
                self.note_storage_failure(e);
                0
            }
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn run_state(&self) -> RunState {
        self.session.run_state
    }

    pub fn mode(&self) -> Mode {
        self.session.mode
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.session.seconds_remaining
    }

    pub fn tasks(&self) -> &[Task] {
        self.session.tasks.list()
    }

    pub fn repository(&self) -> &SessionRepository<S> {
        &self.repo
    }

    pub fn is_ticking(&self) -> bool {
        self.tick_handle.is_some()
    }

    /// First storage failure message, if any
    pub fn storage_warning(&self) -> Option<&str> {
        self.storage_warning.as_deref()
    }

    /// Take queued events, oldest first
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    fn finish(&mut self) {
        self.tick_handle = None;
        self.session.run_state = RunState::Finished;
        info!(mode = ?self.session.mode, "countdown reached zero");
        self.events.push(SessionEvent::ReachedZero {
            mode: self.session.mode,
        });
        if self.session.mode == Mode::Work {
            self.events.push(SessionEvent::WorkFinished);
        }
        self.changed();
    }

    /// Turn stored carryover names into fresh tasks and clear the list
    ///
    /// Returns whether anything was seeded.
    fn seed_carryover(&mut self) -> bool {
        let names = match self.repo.get_incomplete_tasks() {
            Ok(names) => names,
            Err(e) => {
                self.note_storage_failure(e);
                return false;
            }
        };
        if names.is_empty() {
            return false;
        }

        for name in &names {
            self.session.tasks.add(name.as_str());
        }
        self.session.carryover_seeded = true;
        if let Err(e) = self.repo.clear_incomplete_tasks() {
            self.note_storage_failure(e);
        }
        info!(count = names.len(), "seeded carryover tasks");
        true
    }

    /// Move the session's tasks onto the carryover list
    ///
    /// Breaks hold no tasks; whatever the work session had waits for the
    /// next idle work session.
    fn park_tasks(&mut self) {
        let names = carryover_names(std::mem::take(&mut self.session.tasks).partition().1);
        self.session.carryover_seeded = false;
        if names.is_empty() {
            return;
        }
        if let Err(e) = append_carryover(&mut self.repo, &names) {
            self.note_storage_failure(e);
        }
        info!(count = names.len(), "parked tasks for the next work session");
    }

    fn changed(&mut self) {
        self.persist();
        self.events.push(SessionEvent::StateChanged);
    }

    fn persist(&mut self) {
        if let Err(e) = self.repo.save_active_session(&self.session) {
            self.note_storage_failure(e);
        }
    }

    fn note_storage_failure(&mut self, error: StorageError) {
        if self.storage_warning.is_some() {
            debug!(error = %error, "storage failure");
            return;
        }
        warn!(error = %error, "storage failure, keeping in-memory state");
        let message = format!("Storage unavailable, progress may not be saved: {}", error);
        self.events.push(SessionEvent::StorageWarning {
            message: message.clone(),
        });
        self.storage_warning = Some(message);
    }
}
