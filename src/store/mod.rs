//! Client-side state store.
//!
//! This module contains the entity slices and their persistence:
//! - `Slice`: an ordered record list with add/update/remove operations
//! - `Storage`: key-value backends that mirrored slices write through to
//! - `ActivityLog`: the append-only campaign timeline
//! - `Store`: the root grouping one slice per collection

mod activity;
mod error;
mod slice;
mod storage;

pub use activity::ActivityLog;
pub use error::StoreError;
pub use slice::{Patch, Record, Slice};
pub use storage::{FileStorage, MemoryStorage, Storage};

use crate::crm::*;
use crate::table::{Row, TableView, Tabular};
use log::*;
use std::sync::Arc;

/// Run an expression against the slice of the given collection, binding it
/// to `$slice`. Every arm sees a differently typed slice.
///
macro_rules! with_slice {
    ($store:expr, $collection:expr, |mut $slice:ident| $body:expr) => {
        match $collection {
            $crate::crm::Collection::Contacts => {
                let $slice = &mut $store.contacts;
                $body
            }
            $crate::crm::Collection::Companies => {
                let $slice = &mut $store.companies;
                $body
            }
            $crate::crm::Collection::Deals => {
                let $slice = &mut $store.deals;
                $body
            }
            $crate::crm::Collection::Campaigns => {
                let $slice = &mut $store.campaigns;
                $body
            }
            $crate::crm::Collection::Emails => {
                let $slice = &mut $store.emails;
                $body
            }
            $crate::crm::Collection::Tasks => {
                let $slice = &mut $store.tasks;
                $body
            }
            $crate::crm::Collection::Lists => {
                let $slice = &mut $store.lists;
                $body
            }
            $crate::crm::Collection::Playbooks => {
                let $slice = &mut $store.playbooks;
                $body
            }
            $crate::crm::Collection::Templates => {
                let $slice = &mut $store.templates;
                $body
            }
        }
    };
    ($store:expr, $collection:expr, |$slice:ident| $body:expr) => {
        match $collection {
            $crate::crm::Collection::Contacts => {
                let $slice = &$store.contacts;
                $body
            }
            $crate::crm::Collection::Companies => {
                let $slice = &$store.companies;
                $body
            }
            $crate::crm::Collection::Deals => {
                let $slice = &$store.deals;
                $body
            }
            $crate::crm::Collection::Campaigns => {
                let $slice = &$store.campaigns;
                $body
            }
            $crate::crm::Collection::Emails => {
                let $slice = &$store.emails;
                $body
            }
            $crate::crm::Collection::Tasks => {
                let $slice = &$store.tasks;
                $body
            }
            $crate::crm::Collection::Lists => {
                let $slice = &$store.lists;
                $body
            }
            $crate::crm::Collection::Playbooks => {
                let $slice = &$store.playbooks;
                $body
            }
            $crate::crm::Collection::Templates => {
                let $slice = &$store.templates;
                $body
            }
        }
    };
}

pub(crate) use with_slice;

/// Houses one slice per collection plus the activity log.
///
pub struct Store {
    pub contacts: Slice<Contact>,
    pub companies: Slice<Company>,
    pub deals: Slice<Deal>,
    pub campaigns: Slice<Campaign>,
    pub emails: Slice<Email>,
    pub tasks: Slice<Task>,
    pub lists: Slice<CrmList>,
    pub playbooks: Slice<Playbook>,
    pub templates: Slice<Template>,
    pub activities: ActivityLog,
}

impl Default for Store {
    fn default() -> Self {
        Store::in_memory(DemoData::default())
    }
}

fn open_slice<T: Record>(
    collection: Collection,
    storage: &Arc<dyn Storage>,
    mirrored: &[Collection],
    defaults: Vec<T>,
) -> Slice<T> {
    if mirrored.contains(&collection) {
        Slice::mirrored(collection.key(), Arc::clone(storage), defaults)
    } else {
        Slice::new(defaults)
    }
}

impl Store {
    /// Return a store whose listed collections are mirrored into storage.
    /// Mirrored collections seed from storage and fall back to the given
    /// defaults; the others start from the defaults.
    ///
    pub fn open(storage: Arc<dyn Storage>, mirrored: &[Collection], defaults: DemoData) -> Store {
        info!(
            "Opening store, mirrored collections: {:?}",
            mirrored.iter().map(|c| c.key()).collect::<Vec<_>>()
        );
        Store {
            contacts: open_slice(Collection::Contacts, &storage, mirrored, defaults.contacts),
            companies: open_slice(Collection::Companies, &storage, mirrored, defaults.companies),
            deals: open_slice(Collection::Deals, &storage, mirrored, defaults.deals),
            campaigns: open_slice(Collection::Campaigns, &storage, mirrored, defaults.campaigns),
            emails: open_slice(Collection::Emails, &storage, mirrored, defaults.emails),
            tasks: open_slice(Collection::Tasks, &storage, mirrored, defaults.tasks),
            lists: open_slice(Collection::Lists, &storage, mirrored, defaults.lists),
            playbooks: open_slice(Collection::Playbooks, &storage, mirrored, defaults.playbooks),
            templates: open_slice(Collection::Templates, &storage, mirrored, defaults.templates),
            activities: ActivityLog::new(),
        }
    }

    /// Return a store that keeps everything in memory.
    ///
    pub fn in_memory(defaults: DemoData) -> Store {
        Store::open(Arc::new(MemoryStorage::new()), &[], defaults)
    }

    /// Number of records in the collection.
    ///
    pub fn len(&self, collection: Collection) -> usize {
        with_slice!(self, collection, |slice| slice.len())
    }

    pub fn contains(&self, collection: Collection, id: &str) -> bool {
        with_slice!(self, collection, |slice| slice.contains(id))
    }

    pub fn is_mirrored(&self, collection: Collection) -> bool {
        with_slice!(self, collection, |slice| slice.is_mirrored())
    }

    /// Column headers of the collection's table.
    ///
    pub fn columns(collection: Collection) -> &'static [&'static str] {
        match collection {
            Collection::Contacts => Contact::COLUMNS,
            Collection::Companies => Company::COLUMNS,
            Collection::Deals => Deal::COLUMNS,
            Collection::Campaigns => Campaign::COLUMNS,
            Collection::Emails => Email::COLUMNS,
            Collection::Tasks => Task::COLUMNS,
            Collection::Lists => CrmList::COLUMNS,
            Collection::Playbooks => Playbook::COLUMNS,
            Collection::Templates => Template::COLUMNS,
        }
    }

    /// Rows of the collection visible through the table view.
    ///
    pub fn rows(&self, collection: Collection, table: &TableView) -> Vec<Row> {
        with_slice!(self, collection, |slice| table.rows(slice.items()))
    }

    /// Update a record of the collection by id.
    ///
    pub fn update(&mut self, collection: Collection, id: &str, patch: Patch) -> Result<(), StoreError> {
        with_slice!(self, collection, |mut slice| slice.update(id, patch).map(|_| ()))
    }

    /// Remove the listed records from the collection and return how many
    /// were removed.
    ///
    pub fn remove_many(&mut self, collection: Collection, ids: &[String]) -> usize {
        with_slice!(self, collection, |mut slice| slice.remove_many(ids).len())
    }
}
