use crate::domain::{
    format_seconds, CompletedSessionRecord, Mode, Rejection, RunState, SessionEvent, TaskId, Transition,
    UiMode,
};
use crate::machine::SessionMachine;
use crate::notifications;
use crate::persistence::KeyValueStore;
use std::time::Instant;
use tracing::debug;

/// A row of the history pane: (record index, task index)
pub type HistoryRow = (usize, usize);

/// Main application state
pub struct AppState {
    pub machine: SessionMachine<Box<dyn KeyValueStore>>,
    pub ui_mode: UiMode,
    pub selected_task: usize,
    pub input_buffer: String,
    pub editing_task: Option<TaskId>,
    pub history: Vec<CompletedSessionRecord>,
    pub history_selected: usize,
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(machine: SessionMachine<Box<dyn KeyValueStore>>) -> Self {
        let mut app = Self {
            machine,
            ui_mode: UiMode::Normal,
            selected_task: 0,
            input_buffer: String::new(),
            editing_task: None,
            history: Vec::new(),
            history_selected: 0,
            status_message: None,
        };
        app.process_events();
        app
    }

    /// Advance the countdown and react to whatever it produced
    pub fn tick(&mut self, now: Instant) {
        if self.machine.pump(now) > 0 {
            self.process_events();
        }
    }

    /// Drain machine events and forward them to collaborators
    pub fn process_events(&mut self) {
        for event in self.machine.drain_events() {
            match event {
                SessionEvent::StateChanged => self.clamp_selection(),
                SessionEvent::ReachedZero { mode } => {
                    notifications::notify_session_finished(mode);
                    self.status_message = Some(match mode {
                        Mode::Work => "Time's up! Mark finished tasks with v, then press c.".to_string(),
                        Mode::Break => "Break is over. Press c to get back to work.".to_string(),
                    });
                }
                SessionEvent::WorkFinished => {
                    self.selected_task = 0;
                }
                SessionEvent::Completed { mode } => {
                    self.status_message = Some(match mode {
                        Mode::Work => "Session archived. Press s to start your break.".to_string(),
                        Mode::Break => "Ready for the next pomodoro.".to_string(),
                    });
                }
                SessionEvent::TaskUnvalidated { id } => {
                    debug!(%id, "task unvalidated");
                }
                SessionEvent::StartedWithoutTasks => {
                    self.status_message = Some("Started without any tasks.".to_string());
                }
                SessionEvent::StorageWarning { message } => {
                    self.status_message = Some(message);
                }
            }
        }
    }

    /// Show a rejection to the user; accepted transitions clear the status line
    fn report(&mut self, transition: Transition) {
        match transition {
            Transition::Ok => self.status_message = None,
            Transition::Rejected { reason } => {
                debug!(%reason, "operation rejected");
                self.status_message = Some(capitalize(&reason.to_string()));
            }
        }
        self.process_events();
    }

    /// Start, resume or pause depending on the current state
    pub fn toggle_start_pause(&mut self) {
        let transition = match self.machine.run_state() {
            RunState::Running => self.machine.pause(),
            _ => self.machine.start(),
        };
        self.report(transition);
    }

    pub fn reset(&mut self) {
        let transition = self.machine.reset();
        self.report(transition);
    }

    pub fn toggle_mode(&mut self) {
        let transition = self.machine.toggle_mode();
        self.report(transition);
    }

    pub fn complete(&mut self) {
        let transition = self.machine.complete();
        self.report(transition);
    }

    /// Currently selected task id
    pub fn selected_task_id(&self) -> Option<TaskId> {
        self.machine.tasks().get(self.selected_task).map(|t| t.id)
    }

    pub fn move_selection_up(&mut self) {
        self.selected_task = self.selected_task.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_task + 1 < self.machine.tasks().len() {
            self.selected_task += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.machine.tasks().len();
        if len == 0 {
            self.selected_task = 0;
        } else if self.selected_task >= len {
            self.selected_task = len - 1;
        }
    }

    /// Toggle the validated flag of the selected task
    pub fn toggle_validate_selected(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        let validated = self
            .machine
            .tasks()
            .get(self.selected_task)
            .map_or(false, |t| t.validated);
        let transition = if validated {
            self.machine.unvalidate_task(id)
        } else {
            self.machine.validate_task(id)
        };
        self.report(transition);
    }

    pub fn delete_selected_task(&mut self) {
        if let Some(id) = self.selected_task_id() {
            let transition = self.machine.delete_task(id);
            self.report(transition);
        }
    }

    /// Add an empty task and open the name editor for it
    pub fn add_task(&mut self) {
        match self.machine.add_task("") {
            Ok(task) => {
                self.selected_task = self.machine.tasks().len().saturating_sub(1);
                self.open_input(UiMode::EditingTask, String::new());
                self.editing_task = Some(task.id);
                self.status_message = None;
                self.process_events();
            }
            Err(reason) => self.report(Transition::rejected(reason)),
        }
    }

    pub fn begin_rename_selected(&mut self) {
        if self.machine.run_state() != RunState::Idle {
            self.refuse_unless_idle();
            return;
        }
        let Some(task) = self.machine.tasks().get(self.selected_task).cloned() else {
            return;
        };
        self.open_input(UiMode::EditingTask, task.name);
        self.editing_task = Some(task.id);
    }

    pub fn begin_edit_time(&mut self) {
        if self.machine.run_state() != RunState::Idle {
            self.refuse_unless_idle();
            return;
        }
        let current = format_seconds(self.machine.seconds_remaining());
        self.open_input(UiMode::EditingTime, current);
    }

    pub fn begin_edit_name(&mut self) {
        if self.machine.run_state() != RunState::Idle {
            self.refuse_unless_idle();
            return;
        }
        let current = self.machine.session().name.clone();
        self.open_input(UiMode::EditingName, current);
    }

    fn refuse_unless_idle(&mut self) {
        let state = self.machine.run_state();
        self.report(Transition::rejected(Rejection::NotIdle(state)));
    }

    fn open_input(&mut self, mode: UiMode, initial: String) {
        self.ui_mode = mode;
        self.input_buffer = initial;
    }

    pub fn input_add_char(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    pub fn input_backspace(&mut self) {
        self.input_buffer.pop();
    }

    /// Apply the input buffer to whatever is being edited
    pub fn submit_input(&mut self) {
        let text = std::mem::take(&mut self.input_buffer);
        let transition = match self.ui_mode {
            UiMode::EditingTime => self.machine.edit_time(&text),
            UiMode::EditingName => self.machine.set_name(&text),
            UiMode::EditingTask => match self.editing_task.take() {
                Some(id) if text.trim().is_empty() => self.machine.delete_task(id),
                Some(id) => self.machine.rename_task(id, text.trim()),
                None => Transition::Ok,
            },
            _ => Transition::Ok,
        };
        self.ui_mode = UiMode::Normal;
        self.report(transition);
    }

    /// Leave the editor; a freshly added task that never got a name is dropped
    pub fn cancel_input(&mut self) {
        if let Some(id) = self.editing_task.take() {
            let unnamed = self
                .machine
                .tasks()
                .iter()
                .any(|t| t.id == id && t.name.is_empty());
            if unnamed {
                let _ = self.machine.delete_task(id);
            }
        }
        self.input_buffer.clear();
        self.ui_mode = UiMode::Normal;
        self.process_events();
    }

    /// Open or close the session log
    pub fn toggle_history(&mut self) {
        if self.ui_mode == UiMode::History {
            self.ui_mode = UiMode::Normal;
            return;
        }
        self.reload_history();
        self.history_selected = 0;
        self.ui_mode = UiMode::History;
    }

    fn reload_history(&mut self) {
        match self.machine.repository().load_completed_sessions() {
            Ok(records) => self.history = records,
            Err(e) => {
                self.history.clear();
                self.status_message = Some(format!("Could not read session log: {}", e));
            }
        }
    }

    /// Selectable rows of the history pane, newest record first
    pub fn history_rows(&self) -> Vec<HistoryRow> {
        self.history
            .iter()
            .enumerate()
            .rev()
            .flat_map(|(r, record)| (0..record.tasks.len()).map(move |t| (r, t)))
            .collect()
    }

    pub fn history_up(&mut self) {
        self.history_selected = self.history_selected.saturating_sub(1);
    }

    pub fn history_down(&mut self) {
        if self.history_selected + 1 < self.history_rows().len() {
            self.history_selected += 1;
        }
    }

    /// Remove the selected task name from every record of the log
    pub fn forget_selected_history_task(&mut self) {
        let rows = self.history_rows();
        let Some(&(r, t)) = rows.get(self.history_selected) else {
            return;
        };
        let name = self.history[r].tasks[t].name.clone();
        let removed = self.machine.forget_completed_task(&name);
        let noun = if removed == 1 { "entry" } else { "entries" };
        self.status_message = Some(format!("Removed {} {} named \"{}\"", removed, noun, name));
        self.process_events();

        self.reload_history();
        let len = self.history_rows().len();
        if self.history_selected >= len {
            self.history_selected = len.saturating_sub(1);
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, SessionRepository};

    fn create_test_app() -> AppState {
        let store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        AppState::new(SessionMachine::load(SessionRepository::new(store)))
    }

    fn finish_countdown(app: &mut AppState) {
        while app.machine.run_state() == RunState::Running {
            let _ = app.machine.tick();
        }
        app.process_events();
    }

    #[test]
    fn test_add_and_name_task() {
        let mut app = create_test_app();
        app.add_task();
        assert_eq!(app.ui_mode, UiMode::EditingTask);

        for c in "write tests".chars() {
            app.input_add_char(c);
        }
        app.submit_input();

        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.machine.tasks().len(), 1);
        assert_eq!(app.machine.tasks()[0].name, "write tests");
    }

    #[test]
    fn test_cancelled_new_task_is_dropped() {
        let mut app = create_test_app();
        app.add_task();
        app.cancel_input();
        assert!(app.machine.tasks().is_empty());
    }

    #[test]
    fn test_toggle_start_pause() {
        let mut app = create_test_app();
        app.toggle_start_pause();
        assert_eq!(app.machine.run_state(), RunState::Running);
        app.toggle_start_pause();
        assert_eq!(app.machine.run_state(), RunState::Paused);
    }

    #[test]
    fn test_rejection_is_reported() {
        let mut app = create_test_app();
        app.toggle_start_pause();
        app.toggle_mode();
        assert_eq!(app.machine.mode(), Mode::Work);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Operation requires an idle session (currently Running)")
        );
    }

    #[test]
    fn test_edit_time_while_running_is_refused() {
        let mut app = create_test_app();
        app.toggle_start_pause();
        app.begin_edit_time();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_validate_and_complete_flow() {
        let mut app = create_test_app();
        app.add_task();
        app.input_add_char('A');
        app.submit_input();
        let _ = app.machine.edit_time("0:01");
        app.toggle_start_pause();
        finish_countdown(&mut app);
        assert_eq!(app.machine.run_state(), RunState::Finished);

        app.toggle_validate_selected();
        assert!(app.machine.tasks()[0].validated);
        app.complete();

        assert_eq!(app.machine.mode(), Mode::Break);
        app.toggle_history();
        assert_eq!(app.ui_mode, UiMode::History);
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history_rows(), vec![(0, 0)]);

        app.forget_selected_history_task();
        assert!(app.history.is_empty());
    }
}
