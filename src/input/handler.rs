use crate::app::AppState;
use crate::domain::UiMode;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events, returns true when the app should quit
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::EditingTime | UiMode::EditingName | UiMode::EditingTask => {
            handle_input_mode(app, key)
        }
        UiMode::History => handle_history_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),

        // Timer controls
        KeyCode::Enter | KeyCode::Char('s') => app.toggle_start_pause(),
        KeyCode::Char('r') => app.reset(),
        KeyCode::Char('m') => app.toggle_mode(),
        KeyCode::Char('c') => app.complete(),
        KeyCode::Char('t') => app.begin_edit_time(),
        KeyCode::Char('n') => app.begin_edit_name(),

        // Tasks
        KeyCode::Char('a') => app.add_task(),
        KeyCode::Char('e') => app.begin_rename_selected(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected_task(),
        KeyCode::Char('v') | KeyCode::Char(' ') => app.toggle_validate_selected(),

        KeyCode::Char('h') => app.toggle_history(),
        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
        _ => {}
    }
    Ok(false)
}

/// Handle keys while a text field is being edited
fn handle_input_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_input(),
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Backspace => app.input_backspace(),
        KeyCode::Char(c) => app.input_add_char(c),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the session log view
fn handle_history_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.history_up(),
        KeyCode::Down | KeyCode::Char('j') => app.history_down(),
        KeyCode::Char('d') | KeyCode::Delete => app.forget_selected_history_task(),
        KeyCode::Char('h') | KeyCode::Esc => app.toggle_history(),
        KeyCode::Char('q') => return Ok(true),
        _ => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Mode, RunState};
    use crate::machine::SessionMachine;
    use crate::persistence::{KeyValueStore, MemoryStore, SessionRepository};

    fn create_test_app() -> AppState {
        let store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        AppState::new(SessionMachine::load(SessionRepository::new(store)))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_key(app, key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_handle_quit() {
        let mut app = create_test_app();
        assert!(handle_key(&mut app, key(KeyCode::Char('q'))).unwrap());

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(handle_key(&mut app, ctrl_c).unwrap());
    }

    #[test]
    fn test_start_pause_keys() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('s'))).unwrap();
        assert_eq!(app.machine.run_state(), RunState::Running);

        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.machine.run_state(), RunState::Paused);

        handle_key(&mut app, key(KeyCode::Char('r'))).unwrap();
        assert_eq!(app.machine.run_state(), RunState::Idle);
    }

    #[test]
    fn test_edit_time_through_keys() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('t'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::EditingTime);
        assert_eq!(app.input_buffer, "25:00");

        for _ in 0..5 {
            handle_key(&mut app, key(KeyCode::Backspace)).unwrap();
        }
        type_text(&mut app, "12:34");
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();

        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.machine.seconds_remaining(), 754);
    }

    #[test]
    fn test_typing_q_in_editor_does_not_quit() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('a'))).unwrap();
        let quit = handle_key(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert!(!quit);
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.machine.tasks()[0].name, "q");
    }

    #[test]
    fn test_mode_key_and_history_toggle() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('m'))).unwrap();
        assert_eq!(app.machine.mode(), Mode::Break);

        handle_key(&mut app, key(KeyCode::Char('h'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::History);
        handle_key(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_navigation() {
        let mut app = create_test_app();
        for name in ["one", "two"] {
            handle_key(&mut app, key(KeyCode::Char('a'))).unwrap();
            type_text(&mut app, name);
            handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        }
        assert_eq!(app.selected_task, 1);

        handle_key(&mut app, key(KeyCode::Up)).unwrap();
        assert_eq!(app.selected_task, 0);
        handle_key(&mut app, key(KeyCode::Down)).unwrap();
        handle_key(&mut app, key(KeyCode::Down)).unwrap();
        assert_eq!(app.selected_task, 1);
    }
}
