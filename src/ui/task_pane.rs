use crate::app::AppState;
use crate::domain::{Mode, RunState};
use crate::ui::styles::{border_style, default_style, done_style, hint_style, selected_style, title_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Render the task list of the active session
pub fn render_task_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let state = app.machine.run_state();
    let title = match state {
        RunState::Finished => " Tasks - mark what you finished ",
        _ => " Tasks ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(title, title_style()));

    let tasks = app.machine.tasks();
    if tasks.is_empty() {
        let hint = match (app.machine.mode(), state) {
            (Mode::Break, _) => "Enjoy the break.",
            (_, RunState::Idle) => "No tasks yet. Press a to add one.",
            _ => "No tasks for this session.",
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(hint, hint_style()))).block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = tasks
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            let mark = if task.validated { "[x] " } else { "[ ] " };
            let name = if task.name.is_empty() { "(unnamed)" } else { task.name.as_str() };
            let style = if idx == app.selected_task {
                selected_style()
            } else if task.validated {
                done_style()
            } else {
                default_style()
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, style),
                Span::styled(name.to_string(), style),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}
