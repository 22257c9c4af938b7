//! Ordered record collections with CRUD operations.

use super::storage::Storage;
use super::StoreError;
use crate::crm::timestamp;
use log::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Shallow set of top-level field replacements, keyed by field name.
///
pub type Patch = Map<String, Value>;

/// A record stored in a slice.
///
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Singular noun naming the record type in errors and logs.
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// Stamp the updated-at timestamp.
    fn touch(&mut self, now: &str);
}

/// Where a mirrored slice writes itself after every mutation.
///
struct Mirror {
    key: String,
    storage: Arc<dyn Storage>,
}

/// Holds an insertion-ordered list of records with unique ids.
///
pub struct Slice<T: Record> {
    items: Vec<T>,
    mirror: Option<Mirror>,
}

impl<T: Record> Default for Slice<T> {
    fn default() -> Self {
        Slice::new(vec![])
    }
}

impl<T: Record> Slice<T> {
    /// Return an in-memory slice holding the given records.
    ///
    pub fn new(items: Vec<T>) -> Self {
        Slice {
            items,
            mirror: None,
        }
    }

    /// Return a slice mirrored into storage under the given key. The slice
    /// seeds from the stored value, falling back to the defaults when the
    /// value is missing or cannot be parsed.
    ///
    pub fn mirrored(key: &str, storage: Arc<dyn Storage>, defaults: Vec<T>) -> Self {
        let items = match storage.read(key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<T>>(&raw) {
                Ok(items) => {
                    debug!("Loaded {} {} records from storage.", items.len(), T::KIND);
                    items
                }
                Err(e) => {
                    warn!(
                        "Stored value for '{}' is malformed, using defaults: {}",
                        key, e
                    );
                    defaults
                }
            },
            Ok(None) => {
                debug!("Nothing stored under '{}', using defaults.", key);
                defaults
            }
            Err(e) => {
                error!("{}", e);
                defaults
            }
        };
        Slice {
            items,
            mirror: Some(Mirror {
                key: key.to_string(),
                storage,
            }),
        }
    }

    /// Whether mutations are mirrored into storage.
    ///
    pub fn is_mirrored(&self) -> bool {
        self.mirror.is_some()
    }

    /// Return all records in insertion order.
    ///
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Return the record with the given id.
    ///
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a record. A record whose id is already present is rejected.
    ///
    pub fn add(&mut self, item: T) -> Result<&T, StoreError> {
        if self.contains(item.id()) {
            return Err(StoreError::DuplicateId {
                kind: T::KIND,
                id: item.id().to_string(),
            });
        }
        debug!("Adding {} '{}'.", T::KIND, item.id());
        self.items.push(item);
        self.persist();
        let last = self.items.len() - 1;
        Ok(&self.items[last])
    }

    /// Merge the patch into the record with the given id and stamp its
    /// updated-at timestamp with the current time.
    ///
    pub fn update(&mut self, id: &str, patch: Patch) -> Result<&T, StoreError> {
        self.update_at(id, patch, &timestamp())
    }

    /// Merge the patch into the record with the given id and stamp its
    /// updated-at timestamp with `now`. Fields not named in the patch are
    /// left as they were. On error the record is untouched.
    ///
    pub fn update_at(&mut self, id: &str, patch: Patch, now: &str) -> Result<&T, StoreError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| StoreError::NotFound {
                kind: T::KIND,
                id: id.to_string(),
            })?;

        let invalid = |message: String| StoreError::InvalidPatch {
            kind: T::KIND,
            message,
        };
        let mut value = serde_json::to_value(&self.items[index]).map_err(|e| invalid(e.to_string()))?;
        let object = value
            .as_object_mut()
            .ok_or_else(|| invalid("record is not an object".to_string()))?;
        for (field, new_value) in patch {
            if !object.contains_key(&field) {
                return Err(StoreError::UnknownField {
                    kind: T::KIND,
                    field,
                });
            }
            if field == "id" && object.get("id") != Some(&new_value) {
                return Err(StoreError::ImmutableField { field });
            }
            object.insert(field, new_value);
        }
        let mut updated: T = serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;
        updated.touch(now);

        debug!("Updating {} '{}'.", T::KIND, id);
        self.items[index] = updated;
        self.persist();
        Ok(&self.items[index])
    }

    /// Remove the record with the given id, returning it. Unknown ids are
    /// ignored.
    ///
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        debug!("Removing {} '{}'.", T::KIND, id);
        let removed = self.items.remove(index);
        self.persist();
        Some(removed)
    }

    /// Remove every record whose id is listed, returning the removed
    /// records in their original order.
    ///
    pub fn remove_many(&mut self, ids: &[String]) -> Vec<T> {
        let (removed, kept): (Vec<T>, Vec<T>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| ids.iter().any(|id| id == item.id()));
        self.items = kept;
        if !removed.is_empty() {
            debug!("Removing {} {} records.", removed.len(), T::KIND);
            self.persist();
        }
        removed
    }

    /// Rewrite the whole list into storage if the slice is mirrored.
    /// Failures are logged; the in-memory list stays authoritative.
    ///
    fn persist(&self) {
        let mirror = match &self.mirror {
            Some(mirror) => mirror,
            None => return,
        };
        let result = serde_json::to_string(&self.items)
            .map_err(|e| StoreError::SerializationFailed {
                key: mirror.key.clone(),
                message: e.to_string(),
            })
            .and_then(|raw| mirror.storage.write(&mirror.key, &raw));
        if let Err(e) = result {
            error!("{}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crm::{Campaign, CampaignStatus, ContentBlock, Email, EmailStatus, Task};
    use crate::store::MemoryStorage;
    use fake::{Fake, Faker};
    use serde_json::json;

    fn campaign(id: &str) -> Campaign {
        let mut campaign: Campaign = Faker.fake();
        campaign.id = id.to_string();
        campaign.updated_at = "2020-01-01T00:00:00.000Z".to_string();
        campaign
    }

    fn email(id: &str) -> Email {
        let mut email: Email = Faker.fake();
        email.id = id.to_string();
        email
    }

    fn patch(value: Value) -> Patch {
        value.as_object().cloned().unwrap()
    }

    /// Storage that reads nothing and refuses every write.
    struct ReadOnlyStorage;

    impl Storage for ReadOnlyStorage {
        fn read(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn write(&self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::WriteFailed {
                key: key.to_string(),
                message: "disk full".to_string(),
            })
        }
    }

    #[test]
    fn add_then_remove_restores_list() {
        let mut slice = Slice::new(vec![campaign("1"), campaign("2")]);
        let before = slice.items().to_vec();
        slice.add(campaign("3")).unwrap();
        assert_eq!(slice.len(), 3);
        let removed = slice.remove("3").unwrap();
        assert_eq!(removed.id, "3");
        assert_eq!(slice.items(), before.as_slice());
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let mut slice = Slice::new(vec![campaign("1")]);
        let result = slice.add(campaign("1"));
        assert!(matches!(result, Err(StoreError::DuplicateId { .. })));
        assert_eq!(slice.len(), 1);
    }

    #[test]
    fn add_campaign_then_query_and_delete() {
        let mut slice: Slice<Campaign> = Slice::default();
        let id = crate::crm::generate_id();
        let mut launch = campaign(&id);
        launch.name = "Q4 Launch".to_string();
        slice.add(launch).unwrap();

        let found: Vec<&Campaign> = slice.items().iter().filter(|c| c.id == id).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Q4 Launch");
        assert!(!found[0].id.is_empty());

        slice.remove(&id);
        assert!(slice.is_empty());
    }

    #[test]
    fn update_changes_only_named_fields() {
        let mut slice = Slice::new(vec![campaign("1"), campaign("2")]);
        let before = slice.get("1").unwrap().clone();
        let untouched = slice.get("2").unwrap().clone();

        let now = "2030-06-01T12:00:00.000Z";
        let updated = slice
            .update_at(
                "1",
                patch(json!({ "name": "Renamed", "status": "paused" })),
                now,
            )
            .unwrap()
            .clone();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.status, CampaignStatus::Paused);
        assert_eq!(updated.updated_at, now);

        let expected = Campaign {
            name: "Renamed".to_string(),
            status: CampaignStatus::Paused,
            updated_at: now.to_string(),
            ..before
        };
        assert_eq!(updated, expected);
        assert_eq!(slice.get("2").unwrap(), &untouched);
    }

    #[test]
    fn update_refreshes_timestamp() {
        let mut slice = Slice::new(vec![campaign("1")]);
        slice.update("1", patch(json!({ "notes": "hello" }))).unwrap();
        let record = slice.get("1").unwrap();
        assert_eq!(record.notes, "hello");
        assert_ne!(record.updated_at, "2020-01-01T00:00:00.000Z");
    }

    #[test]
    fn update_rejects_unknown_field() {
        let mut slice = Slice::new(vec![campaign("1")]);
        let before = slice.get("1").unwrap().clone();
        let result = slice.update("1", patch(json!({ "name": "x", "colour": "red" })));
        assert!(matches!(result, Err(StoreError::UnknownField { .. })));
        assert_eq!(slice.get("1").unwrap(), &before);
    }

    #[test]
    fn update_rejects_id_change() {
        let mut slice = Slice::new(vec![campaign("1")]);
        let result = slice.update("1", patch(json!({ "id": "9" })));
        assert!(matches!(result, Err(StoreError::ImmutableField { .. })));
        assert!(slice.contains("1"));
    }

    #[test]
    fn update_rejects_mistyped_value() {
        let mut slice = Slice::new(vec![campaign("1")]);
        let before = slice.get("1").unwrap().clone();
        let result = slice.update("1", patch(json!({ "budget": "lots" })));
        assert!(matches!(result, Err(StoreError::InvalidPatch { .. })));
        assert_eq!(slice.get("1").unwrap(), &before);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut slice: Slice<Task> = Slice::default();
        let result = slice.update("missing", Patch::new());
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let mut slice = Slice::new(vec![campaign("1")]);
        assert!(slice.remove("2").is_none());
        assert_eq!(slice.len(), 1);
    }

    #[test]
    fn remove_many_keeps_order_of_rest() {
        let mut slice = Slice::new(vec![
            campaign("1"),
            campaign("2"),
            campaign("3"),
            campaign("4"),
        ]);
        let removed = slice.remove_many(&["3".to_string(), "1".to_string(), "9".to_string()]);
        let removed_ids: Vec<&str> = removed.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(removed_ids, vec!["1", "3"]);
        let kept: Vec<&str> = slice.items().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(kept, vec!["2", "4"]);
    }

    #[test]
    fn mirrored_slice_round_trips_through_storage() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut first = email("1");
        first.status = EmailStatus::Sent;
        first.content = vec![
            ContentBlock::Text {
                content: "Hello".to_string(),
            },
            ContentBlock::Divider,
        ];
        let emails = vec![first, email("2"), email("3")];

        let mut slice = Slice::mirrored("emails", Arc::clone(&storage), vec![]);
        assert!(slice.is_empty());
        for email in emails.clone() {
            slice.add(email).unwrap();
        }

        let reloaded: Slice<Email> = Slice::mirrored("emails", storage, vec![]);
        assert!(reloaded.is_mirrored());
        assert_eq!(reloaded.items(), emails.as_slice());
    }

    #[test]
    fn mirrored_slice_rewrites_after_every_mutation() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut slice = Slice::mirrored("emails", Arc::clone(&storage), vec![email("1")]);
        assert_eq!(storage.read("emails").unwrap(), None);

        slice.add(email("2")).unwrap();
        slice.update("1", patch(json!({ "name": "Renamed" }))).unwrap();
        slice.remove("2");

        let stored: Vec<Email> =
            serde_json::from_str(&storage.read("emails").unwrap().unwrap()).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "Renamed");
    }

    #[test]
    fn mirrored_slice_falls_back_on_malformed_value() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        storage.write("emails", "{not json").unwrap();
        let slice = Slice::mirrored("emails", storage, vec![email("default")]);
        assert_eq!(slice.len(), 1);
        assert!(slice.contains("default"));
    }

    #[test]
    fn write_failure_keeps_in_memory_changes() {
        let storage: Arc<dyn Storage> = Arc::new(ReadOnlyStorage);
        let mut slice = Slice::mirrored("emails", storage, vec![email("1")]);

        assert!(slice.add(email("2")).is_ok());
        assert_eq!(slice.len(), 2);

        let renamed = slice
            .update("1", patch(json!({ "name": "Renamed" })))
            .map(|e| e.name.clone());
        assert_eq!(renamed.unwrap(), "Renamed");
        assert_eq!(slice.get("1").unwrap().name, "Renamed");

        assert!(slice.remove("2").is_some());
        assert_eq!(slice.remove_many(&["1".to_string()]).len(), 1);
        assert!(slice.is_empty());
    }
}
