use super::Frame;
use crate::state::{Focus, State, ToastLevel};
use crate::ui::widgets::styling;
use crate::utils::formatting::{format_currency, format_percent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

/// Render dashboard page with record counts and pipeline figures.
///
pub fn dashboard(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme();
    let stats = state.dashboard_stats();
    let border_style = if state.current_focus() == Focus::Main {
        styling::active_block_border_style(theme)
    } else {
        styling::normal_block_border_style(theme)
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(size);

    let counts: Vec<Line> = stats
        .counts
        .iter()
        .map(|(collection, count)| {
            Line::from(vec![
                Span::styled(format!("{:<12}", collection.title()), styling::header_style(theme)),
                Span::raw(count.to_string()),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(counts).block(
            Block::default()
                .title("Records")
                .borders(Borders::ALL)
                .border_style(border_style),
        ),
        chunks[0],
    );

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3)])
        .split(chunks[1]);

    let figure = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{:<22}", label), styling::header_style(theme)),
            Span::raw(value),
        ])
    };
    let mut overdue = figure("Overdue tasks", stats.overdue_tasks.to_string());
    if stats.overdue_tasks > 0 {
        overdue.style = styling::toast_style(theme, ToastLevel::Error);
    }
    let lines = vec![
        figure("Open deals", stats.open_deals.to_string()),
        figure("Pipeline value", format_currency(stats.pipeline_value)),
        figure("Campaign budget", format_currency(stats.campaign_budget)),
        figure("Campaign spend", format_currency(stats.campaign_spend)),
        figure("Emails sent", stats.emails_sent.to_string()),
        figure("Open rate", format_percent(stats.open_rate)),
        figure("Click rate", format_percent(stats.click_rate)),
        overdue,
    ];
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title("Overview")
                .borders(Borders::ALL)
                .border_style(border_style),
        ),
        right[0],
    );

    let spent = if stats.campaign_budget > 0.0 {
        (stats.campaign_spend / stats.campaign_budget).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title("Budget spent")
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .gauge_style(styling::active_list_item_style(theme))
        .ratio(spent)
        .label(format_percent(spent));
    frame.render_widget(gauge, right[1]);
}
