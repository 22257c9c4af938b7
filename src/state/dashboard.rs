//! Figures shown on the dashboard page.

use crate::crm::{ratio, Collection};
use crate::store::Store;

/// Aggregates computed from the store.
///
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub counts: Vec<(Collection, usize)>,
    pub open_deals: usize,
    pub pipeline_value: f64,
    pub campaign_budget: f64,
    pub campaign_spend: f64,
    pub emails_sent: u64,
    pub open_rate: f64,
    pub click_rate: f64,
    pub overdue_tasks: usize,
}

impl DashboardStats {
    /// Compute the figures, treating tasks due before `today` as overdue.
    ///
    pub fn collect(store: &Store, today: &str) -> DashboardStats {
        let open_deals: Vec<_> = store.deals.items().iter().filter(|d| d.is_open()).collect();
        let emails = store.emails.items();
        let delivered: u64 = emails.iter().map(|e| u64::from(e.metrics.delivered)).sum();
        let opened: u64 = emails.iter().map(|e| u64::from(e.metrics.opened)).sum();
        let clicked: u64 = emails.iter().map(|e| u64::from(e.metrics.clicked)).sum();
        DashboardStats {
            counts: Collection::ALL
                .iter()
                .map(|c| (*c, store.len(*c)))
                .collect(),
            open_deals: open_deals.len(),
            pipeline_value: open_deals.iter().map(|d| d.amount).sum(),
            campaign_budget: store.campaigns.items().iter().map(|c| c.budget).sum(),
            campaign_spend: store.campaigns.items().iter().map(|c| c.spend).sum(),
            emails_sent: emails.iter().map(|e| u64::from(e.metrics.sent)).sum(),
            open_rate: ratio(opened, delivered),
            click_rate: ratio(clicked, delivered),
            overdue_tasks: store
                .tasks
                .items()
                .iter()
                .filter(|t| t.is_overdue(today))
                .count(),
        }
    }
}
