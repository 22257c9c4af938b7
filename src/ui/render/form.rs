use super::modal::centered_rect;
use super::Frame;
use crate::forms::FieldInput;
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const LABEL_WIDTH: usize = 18;
const EDITOR_HEIGHT: u16 = 6;

/// Render the open create or edit form as a popup.
///
pub fn form(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme().clone();
    let form = match state.form_mut() {
        Some(form) => form,
        None => return,
    };

    let popup_area = centered_rect(70, 80, size);
    frame.render_widget(Clear, popup_area);
    let outer = Block::default()
        .title(Span::styled(form.title(), styling::active_block_title_style()))
        .borders(Borders::ALL)
        .border_style(styling::active_block_border_style(&theme));
    let inner = outer.inner(popup_area);
    frame.render_widget(outer, popup_area);

    let editing = form.is_editing_multiline();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(if editing { EDITOR_HEIGHT } else { 0 }),
            Constraint::Length(2),
        ])
        .split(inner);

    let lines: Vec<Line> = form
        .fields()
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let focused = i == form.focused();
            let marker = if field.required { "*" } else { " " };
            let label = format!("{:<width$}", format!("{}{}", field.label, marker), width = LABEL_WIDTH);
            let value = match &field.input {
                FieldInput::Choice(_) if focused => format!("◂ {} ▸", field.value),
                FieldInput::Multiline => form
                    .value(field.key)
                    .and_then(|v| v.lines().next().map(str::to_string))
                    .unwrap_or_default(),
                _ if focused => format!("{}█", field.value),
                _ => field.value.clone(),
            };
            let style = if focused {
                styling::highlight_style(&theme)
            } else {
                styling::normal_text_style(&theme)
            };
            Line::from(vec![
                Span::styled(label, styling::header_style(&theme)),
                Span::styled(value, style),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), chunks[0]);

    let hint = if editing {
        "Tab: next field, Ctrl+S: save, Esc: cancel"
    } else {
        "Tab/↑↓: move, ←→: change option, Enter: save, Esc: cancel"
    };
    let mut footer = vec![Line::from(Span::styled(hint, styling::muted_text_style(&theme)))];
    if let Some(error) = form.error() {
        footer.insert(
            0,
            Line::from(Span::styled(
                error.to_string(),
                styling::toast_style(&theme, crate::state::ToastLevel::Error),
            )),
        );
    }
    frame.render_widget(Paragraph::new(footer), chunks[2]);

    if editing {
        let label = form
            .focused_field()
            .map(|f| f.label)
            .unwrap_or("Notes");
        let block = Block::default()
            .title(label)
            .borders(Borders::ALL)
            .border_style(styling::active_block_border_style(&theme));
        let editor = form.editor_mut();
        editor.set_block(block);
        frame.render_widget(editor.widget(), chunks[1]);
    }
}
