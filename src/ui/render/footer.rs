use super::Frame;
use crate::state::{Focus, Route, State};
use crate::ui::widgets::{spinner, styling};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Key hints for the current page and focus.
///
fn hints(state: &State) -> &'static str {
    if state.is_search_mode() {
        return " Type to search, Enter: keep, Esc: clear";
    }
    if state.current_focus() == Focus::Sidebar {
        return " j/k: navigate, Enter: open, Tab: main, T: theme, L: log, q: quit";
    }
    match state.current_route() {
        Route::Dashboard => " Tab: sidebar, T: theme, L: log, q: quit",
        Route::Collection(_) => {
            " j/k: move, Enter: open, n: new, e: edit, d: delete, space: select, /: search, s: sort, [/]: views, v: save view, w: close view"
        }
        Route::Campaign(_) => " e: edit, d: delete, a: add asset, b: add budget item, Esc: back",
        Route::Email(_) => " e: edit, d: delete, s: send test, S: send, Esc: back",
    }
}

/// Render footer widget with key hints, toast message and busy indicator.
///
pub fn footer(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(40)])
        .split(size);

    frame.render_widget(
        Paragraph::new(hints(state)).style(styling::muted_text_style(theme)),
        chunks[0],
    );

    let status = if let Some(toast) = state.toast() {
        Line::from(Span::styled(
            toast.message.clone(),
            styling::toast_style(theme, toast.level),
        ))
    } else if state.is_busy() {
        Line::from(Span::styled(
            format!("{} working ({})", spinner::frame(state), state.pending_count()),
            styling::normal_text_style(theme),
        ))
    } else {
        Line::from("")
    };
    frame.render_widget(
        Paragraph::new(status).alignment(Alignment::Right),
        chunks[1],
    );
}
