use super::Frame;
use crate::state::{Focus, Route, State};
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

const BLOCK_TITLE: &str = "CRM";

/// Render sidebar widget according to state.
///
pub fn sidebar(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme();
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::normal_block_border_style(theme));

    let list_item_style;
    if state.current_focus() == Focus::Sidebar {
        list_item_style = styling::active_list_item_style(theme);
        block = block
            .border_style(styling::active_block_border_style(theme))
            .title(Span::styled(BLOCK_TITLE, styling::active_block_title_style()));
    } else {
        list_item_style = styling::current_list_item_style(theme);
        block = block.title(BLOCK_TITLE);
    }

    let current = state.current_route().collection();
    let items: Vec<ListItem> = Route::sidebar()
        .iter()
        .map(|route| {
            let active = match route {
                Route::Dashboard => state.current_route() == &Route::Dashboard,
                _ => route.collection() == current,
            };
            let marker = if active { "▸ " } else { "  " };
            let count = route
                .collection()
                .map(|c| format!(" ({})", state.store().len(c)))
                .unwrap_or_default();
            ListItem::new(Line::from(vec![
                Span::raw(marker),
                Span::raw(route.title()),
                Span::styled(count, styling::muted_text_style(theme)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .style(styling::normal_text_style(theme))
        .highlight_style(list_item_style)
        .block(block);

    let mut list_state = ListState::default();
    list_state.select(Some(state.sidebar_index()));
    frame.render_stateful_widget(list, size, &mut list_state);
}
