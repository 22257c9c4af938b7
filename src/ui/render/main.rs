use super::{dashboard, detail, form, modal, table, Frame};
use crate::state::{Route, State};
use ratatui::layout::Rect;

/// Render main widget according to state, with any open overlay on top.
///
pub fn main(frame: &mut Frame, size: Rect, state: &mut State) {
    match state.current_route().clone() {
        Route::Dashboard => dashboard::dashboard(frame, size, state),
        Route::Collection(collection) => table::table(frame, size, state, collection),
        Route::Campaign(_) => detail::campaign(frame, size, state),
        Route::Email(_) => detail::email(frame, size, state),
    }

    if state.has_form() {
        form::form(frame, size, state);
    }
    if state.has_template_picker() {
        modal::template_picker(frame, size, state);
    }
    if state.has_confirmation() {
        modal::confirmation(frame, size, state);
    }
    if state.has_theme_selector() {
        modal::theme_selector(frame, size, state);
    }
}
