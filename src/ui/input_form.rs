use crate::app::AppState;
use crate::domain::UiMode;
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the single-line editor for time, session name or task name
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    let (title, hint) = match app.ui_mode {
        UiMode::EditingTime => (" Set Timer ", "MM:SS or minutes"),
        UiMode::EditingName => (" Session Name ", "What is this session about?"),
        UiMode::EditingTask => (" Task ", "Empty name removes the task"),
        _ => return,
    };

    let modal_area = create_modal_area(area);

    // Clear the area behind the form
    f.render_widget(Clear, modal_area);

    let lines = vec![
        Line::raw(""),
        Line::from(vec![
            Span::raw("> "),
            Span::styled(&app.input_buffer, modal_title_style()),
            Span::styled("█", modal_title_style()), // Cursor
        ]),
        Line::raw(""),
        Line::raw(hint),
        Line::raw("Enter to save  ·  Esc to cancel"),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title, modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}
