use crate::domain::{Mode, RunState};
use ratatui::style::{Color, Modifier, Style};

/// Default text style
pub fn default_style() -> Style {
    Style::default().fg(Color::White)
}

/// Selected row highlight style
pub fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::LightCyan)
        .add_modifier(Modifier::BOLD)
}

/// Style for the run state badge
pub fn run_state_style(state: RunState) -> Style {
    match state {
        RunState::Running => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
        RunState::Paused => Style::default().fg(Color::Yellow),
        RunState::Idle => Style::default().fg(Color::Gray),
        RunState::Finished => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    }
}

/// Countdown digits, tinted by mode
pub fn clock_style(mode: Mode) -> Style {
    let color = match mode {
        Mode::Work => Color::LightRed,
        Mode::Break => Color::LightGreen,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Title style for panes
pub fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Border style
pub fn border_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Modal background style
pub fn modal_bg_style() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

/// Modal title style
pub fn modal_title_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Keybinding hint style
pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Status line style
pub fn status_style() -> Style {
    Style::default().fg(Color::Yellow)
}

/// Validated task style
pub fn done_style() -> Style {
    Style::default().fg(Color::Green)
}
