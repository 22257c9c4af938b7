use super::Frame;
use crate::crm::{Campaign, Email};
use crate::state::{Focus, State};
use crate::ui::widgets::{spinner, styling};
use crate::ui::Theme;
use crate::utils::formatting::{format_currency, format_percent, format_timestamp};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

fn block<'a>(title: &'a str, state: &State) -> Block<'a> {
    let theme = state.get_theme();
    let border_style = if state.current_focus() == Focus::Main {
        styling::active_block_border_style(theme)
    } else {
        styling::normal_block_border_style(theme)
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn field<'a>(theme: &Theme, label: &str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<12}", label), styling::header_style(theme)),
        Span::raw(value),
    ])
}

fn not_found(frame: &mut Frame, size: Rect, state: &State, what: &str) {
    let paragraph = Paragraph::new(format!("{} not found", what))
        .style(styling::muted_text_style(state.get_theme()))
        .alignment(Alignment::Center)
        .block(block("Not found", state));
    frame.render_widget(paragraph, size);
}

/// Render campaign detail page: summary, assets, budget, tasks and timeline.
///
pub fn campaign(frame: &mut Frame, size: Rect, state: &mut State) {
    let campaign = match state.detail_campaign() {
        Some(campaign) => campaign,
        None => return not_found(frame, size, state, "Campaign"),
    };
    let theme = state.get_theme();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(size);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10),
            Constraint::Min(3),
            Constraint::Min(3),
        ])
        .split(columns[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(columns[1]);

    frame.render_widget(
        Paragraph::new(summary(theme, campaign))
            .wrap(Wrap { trim: true })
            .block(block("Campaign", state)),
        left[0],
    );

    let assets: Vec<ListItem> = campaign
        .assets
        .iter()
        .map(|asset| {
            ListItem::new(Line::from(vec![
                Span::raw(asset.name.clone()),
                Span::styled(format!("  {}", asset.kind), styling::muted_text_style(theme)),
            ]))
        })
        .collect();
    frame.render_widget(
        List::new(assets).block(block("Assets (a: add)", state)),
        left[1],
    );

    let mut budget: Vec<ListItem> = campaign
        .budget_items
        .iter()
        .map(|item| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{:<20}", item.name)),
                Span::styled(format!("{:<12}", item.category), styling::muted_text_style(theme)),
                Span::raw(format_currency(item.amount)),
            ]))
        })
        .collect();
    budget.push(ListItem::new(Line::from(Span::styled(
        format!("Planned total {}", format_currency(campaign.planned_total())),
        styling::header_style(theme),
    ))));
    frame.render_widget(
        List::new(budget).block(block("Budget items (b: add)", state)),
        left[2],
    );

    let tasks: Vec<ListItem> = state
        .store()
        .tasks
        .items()
        .iter()
        .filter(|task| task.campaign_id.as_deref() == Some(campaign.id.as_str()))
        .map(|task| {
            ListItem::new(Line::from(vec![
                Span::raw(task.title.clone()),
                Span::styled(
                    format!("  {}  {}", task.status, task.due_date.clone().unwrap_or_default()),
                    styling::muted_text_style(theme),
                ),
            ]))
        })
        .collect();
    frame.render_widget(List::new(tasks).block(block("Tasks", state)), right[0]);

    let timeline: Vec<ListItem> = state
        .store()
        .activities
        .for_campaign(&campaign.id)
        .into_iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{}  ", format_timestamp(&entry.timestamp)),
                    styling::muted_text_style(theme),
                ),
                Span::raw(format!("{} {} {}", entry.actor, entry.action, entry.entity)),
            ]))
        })
        .collect();
    frame.render_widget(List::new(timeline).block(block("Activity", state)), right[1]);
}

fn summary<'a>(theme: &Theme, campaign: &Campaign) -> Vec<Line<'a>> {
    let dates = format!(
        "{} → {}",
        campaign.start_date.clone().unwrap_or_default(),
        campaign.end_date.clone().unwrap_or_default()
    );
    let remaining = campaign.remaining_budget();
    let mut lines = vec![
        field(theme, "Status", campaign.status.to_string()),
        field(theme, "Owner", campaign.owner.clone()),
        field(theme, "Dates", dates),
        field(theme, "Budget", format_currency(campaign.budget)),
        field(theme, "Spend", format_currency(campaign.spend)),
        field(theme, "Remaining", format_currency(remaining)),
    ];
    if remaining < 0.0 {
        lines[5].style = Style::default().fg(theme.error.to_color());
    }
    if !campaign.notes.is_empty() {
        lines.push(field(theme, "Notes", campaign.notes.clone()));
    }
    lines
}

/// Render email detail page: metrics and content blocks.
///
pub fn email(frame: &mut Frame, size: Rect, state: &mut State) {
    let email = match state.detail_email() {
        Some(email) => email,
        None => return not_found(frame, size, state, "Email"),
    };
    let theme = state.get_theme();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(3)])
        .split(size);

    let mut title = "Email (s: send test, S: send)".to_string();
    if state.is_busy() {
        title = format!("{} {}", title, spinner::frame(state));
    }
    frame.render_widget(
        Paragraph::new(metrics(theme, email)).block(block(&title, state)),
        chunks[0],
    );

    let blocks: Vec<ListItem> = email
        .content
        .iter()
        .map(|content| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<8}", content.kind()), styling::header_style(theme)),
                Span::raw(content.summary()),
            ]))
        })
        .collect();
    frame.render_widget(
        List::new(blocks).block(block("Content", state)),
        chunks[1],
    );
}

fn metrics<'a>(theme: &Theme, email: &Email) -> Vec<Line<'a>> {
    vec![
        field(theme, "Subject", email.subject.clone()),
        field(theme, "Status", email.status.to_string()),
        field(
            theme,
            "Sent at",
            email.sent_at.as_deref().map(format_timestamp).unwrap_or_default(),
        ),
        field(theme, "Sent", email.metrics.sent.to_string()),
        field(theme, "Delivered", email.metrics.delivered.to_string()),
        field(
            theme,
            "Opened",
            format!("{} ({})", email.metrics.opened, format_percent(email.open_rate())),
        ),
        field(
            theme,
            "Clicked",
            format!("{} ({})", email.metrics.clicked, format_percent(email.click_rate())),
        ),
    ]
}
