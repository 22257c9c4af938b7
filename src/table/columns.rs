use super::Tabular;
use crate::crm::*;
use crate::utils::formatting::{format_currency, format_percent, format_timestamp};

fn date(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

impl Tabular for Contact {
    const COLUMNS: &'static [&'static str] = &[
        "Name",
        "Email",
        "Phone",
        "Company",
        "Lifecycle stage",
        "Lead status",
        "Owner",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.full_name(),
            self.email.clone(),
            self.phone.clone(),
            self.company.clone(),
            self.lifecycle_stage.to_string(),
            self.lead_status.to_string(),
            self.owner.clone(),
        ]
    }
}

impl Tabular for Company {
    const COLUMNS: &'static [&'static str] = &[
        "Name",
        "Domain",
        "Industry",
        "City",
        "Lifecycle stage",
        "Owner",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.domain.clone(),
            self.industry.clone(),
            self.city.clone(),
            self.lifecycle_stage.to_string(),
            self.owner.clone(),
        ]
    }
}

impl Tabular for Deal {
    const COLUMNS: &'static [&'static str] = &["Name", "Stage", "Amount", "Close date", "Owner"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.stage.to_string(),
            format_currency(self.amount),
            date(&self.close_date),
            self.owner.clone(),
        ]
    }
}

impl Tabular for Campaign {
    const COLUMNS: &'static [&'static str] = &[
        "Name", "Status", "Start", "End", "Budget", "Spend", "Owner",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.status.to_string(),
            date(&self.start_date),
            date(&self.end_date),
            format_currency(self.budget),
            format_currency(self.spend),
            self.owner.clone(),
        ]
    }
}

impl Tabular for Email {
    const COLUMNS: &'static [&'static str] = &[
        "Name",
        "Status",
        "Subject",
        "Sent",
        "Open rate",
        "Click rate",
        "Updated",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.status.to_string(),
            self.subject.clone(),
            self.metrics.sent.to_string(),
            format_percent(self.open_rate()),
            format_percent(self.click_rate()),
            format_timestamp(&self.updated_at),
        ]
    }
}

impl Tabular for Task {
    const COLUMNS: &'static [&'static str] = &[
        "Title", "Type", "Status", "Priority", "Due", "Campaign",
    ];

    fn cells(&self) -> Vec<String> {
        let due = match (&self.due_date, &self.due_time) {
            (Some(d), Some(t)) if !t.is_empty() => format!("{} {}", d, t),
            (Some(d), _) => d.clone(),
            (None, _) => String::new(),
        };
        vec![
            self.title.clone(),
            self.task_type.to_string(),
            self.status.to_string(),
            self.priority.to_string(),
            due,
            date(&self.campaign_id),
        ]
    }
}

impl Tabular for CrmList {
    const COLUMNS: &'static [&'static str] = &["Name", "Type", "Object", "Members", "Owner"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.kind.to_string(),
            self.object_type.to_string(),
            self.member_ids.len().to_string(),
            self.owner.clone(),
        ]
    }
}

impl Tabular for Playbook {
    const COLUMNS: &'static [&'static str] = &["Name", "Description", "Owner", "Updated"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.description.clone(),
            self.owner.clone(),
            format_timestamp(&self.updated_at),
        ]
    }
}

impl Tabular for Template {
    const COLUMNS: &'static [&'static str] = &["Name", "Subject", "Category", "Updated"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.subject.clone(),
            self.category.clone(),
            format_timestamp(&self.updated_at),
        ]
    }
}
