use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::AppError;
use crate::storage::KeyValueStore;

/// A record that lives in a [`PersistedCollection`].
pub trait Record: Clone + Serialize + DeserializeOwned {
    fn id(&self) -> i64;
}

/// Records with boolean fields that can be flipped in place.
pub trait Toggle: Record {
    type Field: Copy;

    fn toggle(&mut self, field: Self::Field);
}

/// The single in-memory copy of a named collection, mirrored to storage after
/// every accepted mutation. Writes always replace the whole collection.
pub struct PersistedCollection<T> {
    key: String,
    items: Vec<T>,
}

impl<T: Record> PersistedCollection<T> {
    /// Restores the collection stored under `key`, or falls back to `seed`
    /// (writing it back) when the key is absent, does not parse, or repeats
    /// an id.
    pub async fn load<S: KeyValueStore>(
        store: &S,
        key: &str,
        seed: Vec<T>,
    ) -> Result<Self, AppError> {
        if let Some(raw) = store.get(key).await? {
            match serde_json::from_str::<Vec<T>>(&raw) {
                Ok(items) if has_duplicate_ids(&items) => {
                    tracing::warn!(key, "stored collection repeats an id; using seed");
                }
                Ok(items) => {
                    tracing::debug!(key, count = items.len(), "restored collection");
                    return Ok(Self {
                        key: key.to_string(),
                        items,
                    });
                }
                Err(err) => {
                    tracing::warn!(key, error = %err, "stored collection is malformed; using seed");
                }
            }
        }

        let collection = Self {
            key: key.to_string(),
            items: seed,
        };
        collection.save(store).await?;
        Ok(collection)
    }

    pub async fn save<S: KeyValueStore>(&self, store: &S) -> Result<(), AppError> {
        let payload = serde_json::to_string(&self.items)?;
        store.set(&self.key, payload).await?;
        tracing::debug!(key = %self.key, count = self.items.len(), "saved collection");
        Ok(())
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub async fn create<S: KeyValueStore>(&mut self, store: &S, record: T) -> Result<(), AppError> {
        self.items.push(record);
        self.save(store).await
    }

    /// Applies `patch` to the record with `id`. Returns `false` without
    /// writing when no such record exists.
    pub async fn update<S, F>(&mut self, store: &S, id: i64, patch: F) -> Result<bool, AppError>
    where
        S: KeyValueStore,
        F: FnOnce(&mut T),
    {
        if !update_record(&mut self.items, id, patch) {
            return Ok(false);
        }
        self.save(store).await?;
        Ok(true)
    }

    pub async fn delete<S: KeyValueStore>(&mut self, store: &S, id: i64) -> Result<bool, AppError> {
        if !remove_record(&mut self.items, id) {
            return Ok(false);
        }
        self.save(store).await?;
        Ok(true)
    }

    pub async fn replace<S: KeyValueStore>(
        &mut self,
        store: &S,
        items: Vec<T>,
    ) -> Result<(), AppError> {
        self.items = items;
        self.save(store).await
    }
}

impl<T: Toggle> PersistedCollection<T> {
    pub async fn toggle<S: KeyValueStore>(
        &mut self,
        store: &S,
        id: i64,
        field: T::Field,
    ) -> Result<bool, AppError> {
        self.update(store, id, |record| record.toggle(field)).await
    }
}

pub fn update_record<T: Record>(items: &mut [T], id: i64, patch: impl FnOnce(&mut T)) -> bool {
    match items.iter_mut().find(|item| item.id() == id) {
        Some(item) => {
            patch(item);
            true
        }
        None => false,
    }
}

pub fn remove_record<T: Record>(items: &mut Vec<T>, id: i64) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}

fn has_duplicate_ids<T: Record>(items: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(items.len());
    !items.iter().all(|item| seen.insert(item.id()))
}
