//! Desktop notifications for a countdown reaching zero
//! Currently only implements macOS notifications

use crate::domain::Mode;
#[cfg(target_os = "macos")]
use std::process::Command;

/// Title and body for the "session reached zero" notification
pub fn finished_message(mode: Mode) -> (&'static str, &'static str) {
    match mode {
        Mode::Work => ("Pomodoro finished!", "Take a well-earned break."),
        Mode::Break => ("Break over", "Back to work!"),
    }
}

/// Send a notification when the countdown reaches zero; failures are ignored
pub fn notify_session_finished(mode: Mode) {
    let (title, body) = finished_message(mode);

    #[cfg(target_os = "macos")]
    {
        let script = format!(
            r#"display notification "{}" with title "Tomate - {}""#,
            body.replace('"', "\\\""),
            title.replace('"', "\\\"")
        );

        if let Err(e) = Command::new("osascript").arg("-e").arg(&script).output() {
            tracing::debug!(error = %e, "notification not delivered");
        }
    }

    #[cfg(not(target_os = "macos"))]
    {
        tracing::info!(title, body, "session reached zero");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_message_depends_on_mode() {
        assert_eq!(finished_message(Mode::Work).0, "Pomodoro finished!");
        assert_eq!(finished_message(Mode::Break).1, "Back to work!");
    }
}
