use super::{footer, log, main, sidebar, topbar, Frame};
use crate::state::State;
use ratatui::layout::{Constraint, Direction, Layout};

const SIDEBAR_WIDTH: u16 = 22;
const LOG_HEIGHT: u16 = 10;

/// Render every widget according to state.
///
pub fn all(frame: &mut Frame, state: &mut State) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(frame.size());

    sidebar(frame, columns[0], state);

    let log_height = if state.is_log_visible() { LOG_HEIGHT } else { 0 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(log_height),
            Constraint::Length(1),
        ])
        .split(columns[1]);

    topbar(frame, rows[0], state);
    main(frame, rows[1], state);
    if state.is_log_visible() {
        log(frame, rows[2], state);
    }
    footer(frame, rows[3], state);
}
