//! In-memory entity store.
//!
//! [`EntityStore`] owns one [`Collection`] per resource. A collection is an
//! ordered `Vec` behind a `tokio::sync::RwLock`: lookups are linear scans
//! by id, inserts append, deletes splice. Nothing survives a restart.

mod clock;
mod seed;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use taskboard_types::{Entity, Project, Task};
use thiserror::Error;
use tokio::sync::RwLock;

pub use clock::Clock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} not found")]
    NotFound { kind: &'static str },

    /// The merged record no longer deserializes.
    #[error("Invalid {kind}: {source}")]
    Invalid {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Both collections plus the clock that stamps them.
#[derive(Debug)]
pub struct EntityStore {
    pub tasks: Collection<Task>,
    pub projects: Collection<Project>,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    /// An empty store.
    pub fn new() -> Self {
        let clock = Arc::new(Clock::new());
        Self {
            tasks: Collection::new(Arc::clone(&clock)),
            projects: Collection::new(clock),
        }
    }

    /// A store holding the sample tasks and projects.
    pub async fn seeded() -> Self {
        let store = Self::new();
        let now = store.tasks.clock.tick();
        store.tasks.extend(seed::tasks(now)).await;
        store.projects.extend(seed::projects(now)).await;
        store
    }
}

/// One ordered collection of records.
#[derive(Debug)]
pub struct Collection<E> {
    records: RwLock<Vec<E>>,
    clock: Arc<Clock>,
}

impl<E: Entity> Collection<E> {
    pub fn new(clock: Arc<Clock>) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            clock,
        }
    }

    /// Snapshot of every record in insertion order.
    pub async fn list(&self) -> Vec<E> {
        self.records.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Result<E, StoreError> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or(StoreError::NotFound { kind: E::KIND })
    }

    /// `Ok` when a record with `id` exists.
    pub async fn require(&self, id: &str) -> Result<(), StoreError> {
        if self.records.read().await.iter().any(|r| r.id() == id) {
            Ok(())
        } else {
            Err(StoreError::NotFound { kind: E::KIND })
        }
    }

    /// Append a record built by `build` from a fresh id and the creation time.
    ///
    /// Ids are `ID_PREFIX` followed by the creation time in milliseconds. If
    /// that id is already taken (an update may have overwritten some record's
    /// `_id`), the numeric part is bumped until it is free.
    pub async fn insert_with<F>(&self, build: F) -> E
    where
        F: FnOnce(String, DateTime<Utc>) -> E,
    {
        let mut records = self.records.write().await;
        let now = self.clock.tick();
        let id = unused_id(&records, now.timestamp_millis());
        let record = build(id, now);
        records.push(record.clone());
        record
    }

    /// Shallow-merge `patch` over the record with `id`, in place.
    ///
    /// `updatedAt` is always restamped after the merge, so a value supplied
    /// in `patch` never survives.
    pub async fn update(&self, id: &str, patch: &Map<String, Value>) -> Result<E, StoreError> {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(StoreError::NotFound { kind: E::KIND })?;
        let mut merged = slot
            .merged(patch)
            .map_err(|source| StoreError::Invalid { kind: E::KIND, source })?;
        merged.set_updated_at(self.clock.tick());
        *slot = merged.clone();
        Ok(merged)
    }

    /// Remove and return the record with `id`.
    pub async fn remove(&self, id: &str) -> Result<E, StoreError> {
        let mut records = self.records.write().await;
        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or(StoreError::NotFound { kind: E::KIND })?;
        Ok(records.remove(index))
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn extend(&self, items: impl IntoIterator<Item = E>) {
        self.records.write().await.extend(items);
    }
}

fn unused_id<E: Entity>(records: &[E], mut stamp: i64) -> String {
    loop {
        let id = format!("{}{stamp}", E::ID_PREFIX);
        if !records.iter().any(|r| r.id() == id) {
            return id;
        }
        stamp += 1;
    }
}
