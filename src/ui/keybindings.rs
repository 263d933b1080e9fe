use crate::domain::UiMode;
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, ui_mode: UiMode, area: Rect) {
    let hints = match ui_mode {
        UiMode::Normal => Line::from(vec![
            Span::raw(" s start/pause   "),
            Span::raw("r reset   "),
            Span::raw("m work/break   "),
            Span::raw("c complete   "),
            Span::raw("t time   "),
            Span::raw("n name   "),
            Span::raw("a add   "),
            Span::raw("e rename   "),
            Span::raw("d delete   "),
            Span::raw("v validate   "),
            Span::raw("h history   "),
            Span::raw("q quit"),
        ]),
        UiMode::History => Line::from(vec![
            Span::raw(" ↑/↓ select   "),
            Span::raw("d forget task   "),
            Span::raw("h/Esc back   "),
            Span::raw("q quit"),
        ]),
        UiMode::EditingTime | UiMode::EditingName | UiMode::EditingTask => {
            Line::from(vec![Span::raw(" Enter save   "), Span::raw("Esc cancel")])
        }
    };

    let paragraph = Paragraph::new(hints).style(hint_style());
    f.render_widget(paragraph, area);
}
