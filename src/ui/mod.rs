pub mod history_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod styles;
pub mod task_pane;
pub mod timer_pane;

use crate::app::AppState;
use crate::domain::UiMode;
use history_pane::render_history_pane;
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use ratatui::{
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use styles::status_style;
use task_pane::render_task_pane;
use timer_pane::render_timer_pane;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, app.ui_mode, layout.keybindings_area);
    render_timer_pane(f, app, layout.timer_area);

    if app.ui_mode == UiMode::History {
        render_history_pane(f, app, layout.body_area);
    } else {
        render_task_pane(f, app, layout.body_area);
    }

    let status = app
        .status_message
        .as_deref()
        .or(app.machine.storage_warning())
        .unwrap_or("");
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(format!(" {}", status), status_style()))),
        layout.status_area,
    );

    // Input form overlays everything else
    render_input_form(f, app, size);
}
