use serde::{Deserialize, Serialize};

/// Default work duration in seconds (25:00)
pub const WORK_SECONDS: u32 = 1500;

/// Default break duration in seconds (05:00)
pub const BREAK_SECONDS: u32 = 300;

/// Run state of the active session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Running,
    Paused,
    Finished,
}

impl RunState {
    /// Label shown in the timer pane and `status` output
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Running => "RUNNING",
            Self::Paused => "PAUSED",
            Self::Finished => "FINISHED",
        }
    }
}

/// Work or break countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Work,
    Break,
}

impl Mode {
    /// Default countdown for this mode, in seconds
    pub fn default_seconds(&self) -> u32 {
        match self {
            Self::Work => WORK_SECONDS,
            Self::Break => BREAK_SECONDS,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Work => Self::Break,
            Self::Break => Self::Work,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Break => "Break",
        }
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    EditingTime,
    EditingName,
    EditingTask,
    History,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_defaults() {
        assert_eq!(Mode::Work.default_seconds(), 1500);
        assert_eq!(Mode::Break.default_seconds(), 300);
    }

    #[test]
    fn test_mode_toggled() {
        assert_eq!(Mode::Work.toggled(), Mode::Break);
        assert_eq!(Mode::Break.toggled(), Mode::Work);
    }

    #[test]
    fn test_run_state_serializes_lowercase() {
        let json = serde_json::to_string(&RunState::Finished).unwrap();
        assert_eq!(json, "\"finished\"");
        let parsed: RunState = serde_json::from_str("\"paused\"").unwrap();
        assert_eq!(parsed, RunState::Paused);
    }
}
