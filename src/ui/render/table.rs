use super::Frame;
use crate::crm::Collection;
use crate::state::{Focus, State};
use crate::store::Store;
use crate::table::SortDirection;
use crate::ui::widgets::styling;
use crate::utils::formatting::truncate;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Tabs},
};

const MAX_CELL_WIDTH: usize = 32;

/// Render the view tabs, search line and rows of a collection page.
///
pub fn table(frame: &mut Frame, size: Rect, state: &mut State, collection: Collection) {
    let theme = state.get_theme();
    let view = state.table(collection);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(3)])
        .split(size);

    let titles: Vec<Line> = view
        .tabs()
        .iter()
        .map(|tab| Line::from(tab.name.clone()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(view.active_index())
        .style(styling::muted_text_style(theme))
        .highlight_style(styling::active_list_item_style(theme));
    frame.render_widget(tabs, chunks[0]);

    let search = if state.is_search_mode() {
        Line::from(vec![
            Span::styled("/", styling::active_list_item_style(theme)),
            Span::raw(view.query().to_string()),
            Span::styled("█", styling::muted_text_style(theme)),
        ])
    } else if !view.query().is_empty() {
        Line::from(vec![
            Span::styled("/", styling::muted_text_style(theme)),
            Span::raw(view.query().to_string()),
        ])
    } else if view.selected_count() > 0 {
        Line::from(Span::styled(
            format!("{} selected", view.selected_count()),
            styling::selected_row_style(theme),
        ))
    } else {
        Line::from(Span::styled(
            "/ to search",
            styling::muted_text_style(theme),
        ))
    };
    frame.render_widget(Paragraph::new(search), chunks[1]);

    let columns = Store::columns(collection);
    let sort = view.sort();
    let header = Row::new(
        std::iter::once(Cell::from(" "))
            .chain(columns.iter().enumerate().map(|(i, name)| {
                let arrow = match sort {
                    Some(s) if s.column == i => match s.direction {
                        SortDirection::Ascending => " ▲",
                        SortDirection::Descending => " ▼",
                    },
                    _ => "",
                };
                Cell::from(format!("{}{}", name, arrow))
            })),
    )
    .style(styling::header_style(theme));

    let visible = state.visible_rows();
    let rows: Vec<Row> = visible
        .iter()
        .map(|row| {
            let selected = view.is_selected(&row.id);
            let marker = if selected { "●" } else { " " };
            let cells = std::iter::once(Cell::from(marker)).chain(
                row.cells
                    .iter()
                    .map(|cell| Cell::from(truncate(cell, MAX_CELL_WIDTH))),
            );
            let style = if selected {
                styling::selected_row_style(theme)
            } else {
                styling::normal_text_style(theme)
            };
            Row::new(cells).style(style)
        })
        .collect();

    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(1))
        .chain(columns.iter().map(|_| Constraint::Min(8)))
        .collect();

    let border_style = if state.current_focus() == Focus::Main {
        styling::active_block_border_style(theme)
    } else {
        styling::normal_block_border_style(theme)
    };
    let title = format!("{} ({})", collection.title(), visible.len());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    if rows.is_empty() {
        let message = if view.query().is_empty() {
            format!("No {} yet. Press n to create one.", collection.key())
        } else {
            "No results found".to_string()
        };
        frame.render_widget(
            Paragraph::new(message)
                .style(styling::muted_text_style(theme))
                .block(block),
            chunks[2],
        );
        return;
    }

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(styling::highlight_style(theme));
    let mut table_state = TableState::default();
    table_state.select(Some(view.cursor()));
    frame.render_stateful_widget(table, chunks[2], &mut table_state);
}
