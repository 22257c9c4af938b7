use super::Frame;
use crate::state::State;
use crate::ui::widgets::styling;
use crate::ui::Theme;
use crate::utils::formatting::truncate;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

const MAX_VISIBLE: usize = 8;

/// Render the delete confirmation popup.
///
pub fn confirmation(frame: &mut Frame, size: Rect, state: &State) {
    let confirmation = match state.confirmation() {
        Some(confirmation) => confirmation,
        None => return,
    };
    let popup_area = centered_rect(60, 25, size);
    frame.render_widget(Clear, popup_area);

    let theme = state.get_theme();
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            truncate(&confirmation.prompt(), 60),
            Style::default()
                .fg(theme.text.to_color())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "This action cannot be undone.",
            Style::default()
                .fg(theme.warning.to_color())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "y/Enter: confirm, n/Esc: cancel",
            styling::muted_text_style(theme),
        )),
    ];

    let border = Style::default()
        .fg(theme.error.to_color())
        .add_modifier(Modifier::BOLD);
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled("Confirm delete", border))
                .border_style(border),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, popup_area);
}

/// Render the template picker of the emails page.
///
pub fn template_picker(frame: &mut Frame, size: Rect, state: &State) {
    let names: Vec<String> = state
        .store()
        .templates
        .items()
        .iter()
        .map(|t| format!("{}  ({})", t.name, t.category))
        .collect();
    let selected = state.template_picker_index().unwrap_or(0);
    picker(frame, size, state.get_theme(), "Start from template", &names, selected);
}

/// Render the theme selector.
///
pub fn theme_selector(frame: &mut Frame, size: Rect, state: &State) {
    let current = &state.get_theme().name;
    let names: Vec<String> = Theme::available_themes()
        .iter()
        .map(|name| {
            // "tokyo-night" -> "Tokyo Night"
            let display_name = name
                .split('-')
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        None => String::new(),
                        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            if name == current {
                format!("{} (current)", display_name)
            } else {
                display_name
            }
        })
        .collect();
    let selected = state.theme_selector_index().unwrap_or(0);
    picker(frame, size, state.get_theme(), "Select theme", &names, selected);
}

/// Render a popup list with a scrolling window around the selected item.
///
fn picker(frame: &mut Frame, size: Rect, theme: &Theme, title: &str, items: &[String], selected: usize) {
    let popup_area = centered_rect(50, 50, size);
    frame.render_widget(Clear, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(popup_area);

    let title_block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            title.to_string(),
            Style::default()
                .fg(theme.info.to_color())
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(styling::active_block_border_style(theme));
    let hint = Paragraph::new("j/k: navigate, Enter: select, Esc: cancel")
        .block(title_block)
        .alignment(Alignment::Center);
    frame.render_widget(hint, chunks[0]);

    let total = items.len();
    let start = if total <= MAX_VISIBLE {
        0
    } else {
        selected
            .saturating_sub(MAX_VISIBLE / 2)
            .min(total - MAX_VISIBLE)
    };
    let end = (start + MAX_VISIBLE).min(total);
    let list_items: Vec<ListItem> = items[start..end]
        .iter()
        .map(|item| ListItem::new(item.clone()))
        .collect();

    let mut list_state = ListState::default();
    if !list_items.is_empty() {
        list_state.select(Some(selected.saturating_sub(start).min(list_items.len() - 1)));
    }

    let list = List::new(list_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} available", total))
                .border_style(styling::active_block_border_style(theme)),
        )
        .style(styling::normal_text_style(theme))
        .highlight_style(styling::highlight_style(theme));
    frame.render_stateful_widget(list, chunks[1], &mut list_state);
}

/// Return a rectangle centered in `r` covering the given percentages.
///
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
