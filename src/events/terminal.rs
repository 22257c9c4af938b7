use crate::forms::FieldInput;
use crate::state::{Focus, Route, State, StateError, Toast};
use anyhow::Result;
use crossterm::{
    event,
    event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
};
use log::*;
use std::{sync::mpsc, thread, time::Duration};

/// Specify terminal event poll rate in milliseconds.
///
const TICK_RATE_IN_MS: u64 = 60;

/// Specify different terminal event types.
///
#[derive(Debug)]
pub enum Event<I> {
    Input(I),
    Tick,
}

/// Specify struct for managing terminal events channel.
///
pub struct Handler {
    rx: mpsc::Receiver<Event<KeyEvent>>,
    _tx: mpsc::Sender<Event<KeyEvent>>,
}

impl Handler {
    /// Return new instance after spawning new input polling thread.
    ///
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let tx_clone = tx.clone();
        thread::spawn(move || loop {
            let tick_rate = Duration::from_millis(TICK_RATE_IN_MS);
            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                        if tx_clone.send(Event::Input(key)).is_err() {
                            break;
                        }
                    }
                    Ok(_) => (),
                    Err(e) => warn!("Failed to read terminal event: {}", e),
                },
                Ok(false) => (),
                Err(e) => warn!("Failed to poll terminal events: {}", e),
            }
            if tx_clone.send(Event::Tick).is_err() {
                break;
            }
        });
        Handler { rx, _tx: tx }
    }

    /// Receive next terminal event and handle it accordingly. Returns result
    /// with value true if should continue or false if exit was requested.
    ///
    pub fn handle_next(&self, state: &mut State) -> Result<bool> {
        match self.rx.recv()? {
            Event::Input(key) => Ok(handle_key(state, key)),
            Event::Tick => {
                if state.is_busy() {
                    state.advance_spinner_index();
                }
                Ok(true)
            }
        }
    }
}

impl Default for Handler {
    fn default() -> Self {
        Handler::new()
    }
}

/// Show a failed action as an error toast.
///
fn report(state: &mut State, result: Result<(), StateError>) {
    if let Err(e) = result {
        debug!("Action rejected: {}", e);
        state.set_toast(Toast::error(e.to_string()));
    }
}

fn is_text(key: &KeyEvent) -> bool {
    key.modifiers == KeyModifiers::NONE || key.modifiers == KeyModifiers::SHIFT
}

/// Apply one key press to state. Returns false if exit was requested.
///
pub fn handle_key(state: &mut State, key: KeyEvent) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        debug!("Processing exit terminal event '{:?}'...", key);
        return false;
    }
    state.clear_toast();

    if state.has_confirmation() {
        handle_confirmation(state, key);
        true
    } else if state.has_theme_selector() {
        handle_theme_selector(state, key);
        true
    } else if state.has_template_picker() {
        handle_template_picker(state, key);
        true
    } else if state.has_form() {
        handle_form(state, key);
        true
    } else if state.is_search_mode() {
        handle_search(state, key);
        true
    } else {
        handle_normal(state, key)
    }
}

fn handle_confirmation(state: &mut State, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            state.confirm_delete();
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            state.cancel_delete();
        }
        _ => (),
    }
}

fn handle_theme_selector(state: &mut State, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.next_theme();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.previous_theme();
        }
        KeyCode::Enter => {
            state.select_theme();
        }
        KeyCode::Esc => {
            state.close_theme_selector();
        }
        _ => (),
    }
}

fn handle_template_picker(state: &mut State, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.next_template();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.previous_template();
        }
        KeyCode::Enter => {
            state.confirm_template();
        }
        KeyCode::Esc => {
            state.close_template_picker();
        }
        _ => (),
    }
}

fn handle_form(state: &mut State, key: KeyEvent) {
    if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
        state.submit_form();
        return;
    }
    let form = match state.form_mut() {
        Some(form) => form,
        None => return,
    };
    match key.code {
        KeyCode::Esc => {
            debug!("Discarding form '{}'.", form.title());
            state.close_form();
        }
        KeyCode::Tab | KeyCode::Down => {
            form.next_field();
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.previous_field();
        }
        _ if form.is_editing_multiline() => {
            form.editor_mut().input(key);
        }
        KeyCode::Enter => {
            state.submit_form();
        }
        KeyCode::Left | KeyCode::Right => {
            let is_choice = matches!(
                form.focused_field().map(|f| &f.input),
                Some(FieldInput::Choice(_))
            );
            if is_choice {
                form.cycle_choice(key.code == KeyCode::Right);
            }
        }
        KeyCode::Backspace => {
            form.backspace();
        }
        KeyCode::Char(c) if is_text(&key) => {
            form.input_char(c);
        }
        _ => (),
    }
}

fn handle_search(state: &mut State, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            state.clear_search();
        }
        KeyCode::Enter => {
            state.exit_search_mode();
        }
        KeyCode::Backspace => {
            state.pop_search_char();
        }
        KeyCode::Char(c) if is_text(&key) => {
            state.push_search_char(c);
        }
        _ => (),
    }
}

fn handle_normal(state: &mut State, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => {
            debug!("Processing exit terminal event '{:?}'...", key);
            return false;
        }
        KeyCode::Tab => {
            state.toggle_focus();
        }
        KeyCode::Char('L') => {
            state.toggle_log();
        }
        KeyCode::Char('T') => {
            state.open_theme_selector();
        }
        _ => match state.current_focus() {
            Focus::Sidebar => handle_sidebar(state, key),
            Focus::Main => handle_main(state, key),
        },
    }
    true
}

fn handle_sidebar(state: &mut State, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.next_sidebar();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.previous_sidebar();
        }
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
            state.select_sidebar();
        }
        _ => (),
    }
}

fn handle_main(state: &mut State, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            if state.back().is_none() {
                state.focus_sidebar();
            }
        }
        KeyCode::Char('n') => {
            let result = state.open_create_form();
            report(state, result);
        }
        KeyCode::Char('e') => {
            let result = state.open_edit_form();
            report(state, result);
        }
        KeyCode::Char('d') => {
            let result = state.request_delete();
            report(state, result);
        }
        _ => match state.current_route().clone() {
            Route::Campaign(_) => handle_campaign(state, key),
            Route::Email(_) => handle_email(state, key),
            Route::Collection(_) => handle_table(state, key),
            Route::Dashboard => (),
        },
    }
}

fn handle_campaign(state: &mut State, key: KeyEvent) {
    let result = match key.code {
        KeyCode::Char('a') => state.open_asset_form(),
        KeyCode::Char('b') => state.open_budget_item_form(),
        _ => Ok(()),
    };
    report(state, result);
}

fn handle_email(state: &mut State, key: KeyEvent) {
    let result = match key.code {
        KeyCode::Char('s') => state.send_test_email(),
        KeyCode::Char('S') => state.send_email(),
        _ => Ok(()),
    };
    report(state, result);
}

fn handle_table(state: &mut State, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.next_row();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.previous_row();
        }
        KeyCode::Enter => {
            let result = state.open_cursor_row();
            report(state, result);
        }
        KeyCode::Char('/') => {
            state.enter_search_mode();
        }
        KeyCode::Char(' ') => {
            state.toggle_cursor_row();
        }
        KeyCode::Char('a') => {
            state.toggle_all_rows();
        }
        KeyCode::Char('x') => {
            state.clear_selection();
        }
        KeyCode::Char('s') => {
            state.cycle_sort();
        }
        KeyCode::Char(']') | KeyCode::Right => {
            state.next_view();
        }
        KeyCode::Char('[') | KeyCode::Left => {
            state.previous_view();
        }
        KeyCode::Char('v') => {
            state.save_search_as_view();
        }
        KeyCode::Char('w') => {
            state.close_active_view();
        }
        KeyCode::Char('>') => {
            state.move_active_view(true);
        }
        KeyCode::Char('<') => {
            state.move_active_view(false);
        }
        KeyCode::Char('t') => {
            let result = state.open_template_picker();
            report(state, result);
        }
        _ => (),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crm::{Collection, Contact, DemoData};
    use crate::state::ToastLevel;
    use crate::store::Store;
    use fake::{Fake, Faker};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(state: &mut State, text: &str) {
        for c in text.chars() {
            assert!(handle_key(state, press(KeyCode::Char(c))));
        }
    }

    fn state() -> State {
        let contacts = (0..3)
            .map(|i| {
                let mut contact: Contact = Faker.fake();
                contact.id = format!("c{}", i);
                contact
            })
            .collect();
        let mut state = State::default();
        *state.store_mut() = Store::in_memory(DemoData {
            contacts,
            ..DemoData::default()
        });
        state
    }

    #[test]
    fn ctrl_c_and_q_exit() {
        let mut state = state();
        assert!(!handle_key(
            &mut state,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
        ));
        assert!(!handle_key(&mut state, press(KeyCode::Char('q'))));
    }

    #[test]
    fn q_is_text_in_search() {
        let mut state = state();
        state.navigate(Route::Collection(Collection::Contacts));
        handle_key(&mut state, press(KeyCode::Char('/')));
        assert!(state.is_search_mode());
        type_text(&mut state, "q");
        assert_eq!(state.table(Collection::Contacts).query(), "q");
        handle_key(&mut state, press(KeyCode::Enter));
        assert!(!state.is_search_mode());
        assert_eq!(state.table(Collection::Contacts).query(), "q");
    }

    #[test]
    fn sidebar_opens_page() {
        let mut state = state();
        handle_key(&mut state, press(KeyCode::Char('j')));
        handle_key(&mut state, press(KeyCode::Enter));
        assert_eq!(state.current_route(), &Route::Collection(Collection::Contacts));
        assert_eq!(state.current_focus(), Focus::Main);
        handle_key(&mut state, press(KeyCode::Esc));
        assert_eq!(state.current_focus(), Focus::Sidebar);
    }

    #[test]
    fn create_form_by_keyboard() {
        let mut state = state();
        state.navigate(Route::Collection(Collection::Contacts));
        handle_key(&mut state, press(KeyCode::Char('n')));
        assert!(state.has_form());
        type_text(&mut state, "Ada");
        handle_key(&mut state, press(KeyCode::Tab));
        handle_key(&mut state, press(KeyCode::Tab));
        type_text(&mut state, "ada@example.com");
        handle_key(&mut state, press(KeyCode::Enter));
        assert!(!state.has_form());
        assert_eq!(state.store().contacts.len(), 4);
    }

    #[test]
    fn escape_discards_form() {
        let mut state = state();
        state.navigate(Route::Collection(Collection::Contacts));
        handle_key(&mut state, press(KeyCode::Char('n')));
        handle_key(&mut state, press(KeyCode::Esc));
        assert!(!state.has_form());
        assert_eq!(state.store().contacts.len(), 3);
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut state = state();
        state.navigate(Route::Collection(Collection::Contacts));
        handle_key(&mut state, press(KeyCode::Char('d')));
        assert!(state.has_confirmation());
        handle_key(&mut state, press(KeyCode::Char('n')));
        assert_eq!(state.store().contacts.len(), 3);
        handle_key(&mut state, press(KeyCode::Char('d')));
        handle_key(&mut state, press(KeyCode::Char('y')));
        assert_eq!(state.store().contacts.len(), 2);
    }

    #[test]
    fn unavailable_action_shows_error_toast() {
        let mut state = state();
        state.focus_main();
        handle_key(&mut state, press(KeyCode::Char('n')));
        assert_eq!(state.toast().unwrap().level, ToastLevel::Error);
        handle_key(&mut state, press(KeyCode::Char('j')));
        assert!(state.toast().is_none());
    }
}
