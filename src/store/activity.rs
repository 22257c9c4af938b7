//! Append-only campaign timeline.

use crate::crm::{generate_id, timestamp, Activity, ActivityAction};

/// Holds activity entries in the order they were recorded.
///
#[derive(Debug, Default, Clone)]
pub struct ActivityLog {
    entries: Vec<Activity>,
}

impl ActivityLog {
    pub fn new() -> ActivityLog {
        ActivityLog::default()
    }

    /// Append an entry for the given campaign and return it.
    ///
    pub fn record(
        &mut self,
        campaign_id: &str,
        actor: &str,
        action: ActivityAction,
        entity: &str,
    ) -> &Activity {
        self.entries.push(Activity {
            id: generate_id(),
            campaign_id: campaign_id.to_string(),
            actor: actor.to_string(),
            action,
            entity: entity.to_string(),
            timestamp: timestamp(),
        });
        let last = self.entries.len() - 1;
        &self.entries[last]
    }

    /// Return every entry in recording order.
    ///
    pub fn entries(&self) -> &[Activity] {
        &self.entries
    }

    /// Return the entries of one campaign, newest first.
    ///
    pub fn for_campaign(&self, campaign_id: &str) -> Vec<&Activity> {
        self.entries
            .iter()
            .rev()
            .filter(|entry| entry.campaign_id == campaign_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_appends_in_order() {
        let mut log = ActivityLog::new();
        log.record("c1", "Jane", ActivityAction::Created, "Q4 Launch");
        log.record("c1", "Jane", ActivityAction::AssetAdded, "Landing page");
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].action, ActivityAction::Created);
        assert_eq!(log.entries()[1].entity, "Landing page");
    }

    #[test]
    fn for_campaign_filters_and_reverses() {
        let mut log = ActivityLog::new();
        log.record("c1", "Jane", ActivityAction::Created, "first");
        log.record("c2", "Jane", ActivityAction::Created, "other");
        log.record("c1", "Jane", ActivityAction::Updated, "second");

        let entries = log.for_campaign("c1");
        let names: Vec<&str> = entries.iter().map(|e| e.entity.as_str()).collect();
        assert_eq!(names, vec!["second", "first"]);
        assert!(log.for_campaign("c3").is_empty());
    }
}
