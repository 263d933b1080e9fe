use crate::app::AppState;
use crate::ui::styles::{border_style, default_style, hint_style, selected_style, title_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Render the completed-session log, newest first
pub fn render_history_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Completed sessions ", title_style()));

    if app.history.is_empty() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "No completed sessions yet.",
            hint_style(),
        )))
        .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let selected = app.history_rows().get(app.history_selected).copied();
    let mut items = Vec::new();

    for (r, record) in app.history.iter().enumerate().rev() {
        let name = if record.name.is_empty() { "untitled session" } else { record.name.as_str() };
        items.push(ListItem::new(Line::from(vec![
            Span::styled(record.completed_at.format("%Y-%m-%d %H:%M  ").to_string(), hint_style()),
            Span::styled(name.to_string(), title_style()),
        ])));

        for (t, task) in record.tasks.iter().enumerate() {
            let style = if selected == Some((r, t)) {
                selected_style()
            } else {
                default_style()
            };
            items.push(ListItem::new(Line::from(Span::styled(
                format!("    ✓ {}", task.name),
                style,
            ))));
        }
    }

    f.render_widget(List::new(items).block(block), area);
}
