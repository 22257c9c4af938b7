use super::Frame;
use crate::state::{Route, State};
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Render topbar widget showing the current path and page title.
///
pub fn topbar(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme();
    let route = state.current_route();
    let title = match route {
        Route::Campaign(_) => state
            .detail_campaign()
            .map(|c| c.name.clone())
            .unwrap_or_else(|| route.title().to_string()),
        Route::Email(_) => state
            .detail_email()
            .map(|e| e.name.clone())
            .unwrap_or_else(|| route.title().to_string()),
        _ => route.title().to_string(),
    };

    let line = Line::from(vec![
        Span::styled(route.path(), styling::muted_text_style(theme)),
        Span::raw("  "),
        Span::styled(title, styling::active_list_item_style(theme)),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::normal_block_border_style(theme));
    frame.render_widget(Paragraph::new(line).block(block), size);
}
