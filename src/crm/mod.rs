//! CRM domain model.
//!
//! This module contains the records managed by the application:
//! - Entity types (campaigns, emails, contacts, companies, deals, tasks, ...)
//! - Choice enums for statuses and stages
//! - Identifier and timestamp generation
//! - Demo data used to seed an empty store

mod demo;
mod id;
mod resource;

pub use demo::DemoData;
pub use id::{generate_id, timestamp, today};
pub use resource::*;

use serde::{Deserialize, Serialize};

/// Names the entity collections held by the store.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Contacts,
    Companies,
    Deals,
    Campaigns,
    Emails,
    Tasks,
    Lists,
    Playbooks,
    Templates,
}

impl Collection {
    pub const ALL: [Collection; 9] = [
        Collection::Contacts,
        Collection::Companies,
        Collection::Deals,
        Collection::Campaigns,
        Collection::Emails,
        Collection::Tasks,
        Collection::Lists,
        Collection::Playbooks,
        Collection::Templates,
    ];

    /// Storage key and route segment of the collection.
    ///
    pub fn key(&self) -> &'static str {
        match self {
            Collection::Contacts => "contacts",
            Collection::Companies => "companies",
            Collection::Deals => "deals",
            Collection::Campaigns => "campaigns",
            Collection::Emails => "emails",
            Collection::Tasks => "tasks",
            Collection::Lists => "lists",
            Collection::Playbooks => "playbooks",
            Collection::Templates => "templates",
        }
    }

    /// Human readable title.
    ///
    pub fn title(&self) -> &'static str {
        match self {
            Collection::Contacts => "Contacts",
            Collection::Companies => "Companies",
            Collection::Deals => "Deals",
            Collection::Campaigns => "Campaigns",
            Collection::Emails => "Emails",
            Collection::Tasks => "Tasks",
            Collection::Lists => "Lists",
            Collection::Playbooks => "Playbooks",
            Collection::Templates => "Templates",
        }
    }

    /// Singular noun used in prompts and messages.
    ///
    pub fn singular(&self) -> &'static str {
        match self {
            Collection::Contacts => "contact",
            Collection::Companies => "company",
            Collection::Deals => "deal",
            Collection::Campaigns => "campaign",
            Collection::Emails => "email",
            Collection::Tasks => "task",
            Collection::Lists => "list",
            Collection::Playbooks => "playbook",
            Collection::Templates => "template",
        }
    }

    /// Look up a collection by its key.
    ///
    pub fn from_key(key: &str) -> Option<Collection> {
        Collection::ALL.iter().copied().find(|c| c.key() == key)
    }
}
