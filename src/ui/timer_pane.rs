use crate::app::AppState;
use crate::domain::{format_seconds, RunState};
use crate::ui::styles::{border_style, clock_style, default_style, run_state_style, title_style};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the countdown, mode and session name
pub fn render_timer_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let session = app.machine.session();

    let name = if session.name.is_empty() {
        "untitled session".to_string()
    } else {
        session.name.clone()
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{} ", session.mode.name()), title_style()),
            Span::styled(format!("[{}]", session.run_state.label()), run_state_style(session.run_state)),
        ]),
        Line::raw(""),
        Line::from(Span::styled(
            format_seconds(session.seconds_remaining),
            clock_style(session.mode),
        )),
        Line::raw(""),
        Line::from(Span::styled(name, default_style())),
    ];

    if session.run_state == RunState::Idle && session.carryover_seeded {
        lines.push(Line::from(Span::styled(
            "Unfinished tasks carried over from last session",
            run_state_style(RunState::Paused),
        )));
    }

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(" Tomate ", title_style())),
    );
    f.render_widget(paragraph, area);
}
