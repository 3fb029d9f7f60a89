//! Client-side caches mirroring one server collection each.

use serde::Serialize;
use taskboard_types::{Entity, Project, Task};
use tracing::warn;

use crate::api::ApiClient;
use crate::error::ClientError;

pub type TaskContext = DataContext<Task>;
pub type ProjectContext = DataContext<Project>;

/// Lifecycle of a [`DataContext`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContextState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// At least one request has finished; see [`DataContext::error`] for
    /// how the last one went.
    Ready,
}

/// Cached copy of one collection plus the outcome of the last request.
///
/// Writes go to the server first; only a successful response touches the
/// cache. There is no rollback, retry or reconciliation: if another client
/// changes the collection, this cache is stale until the next
/// [`fetch`](DataContext::fetch).
#[derive(Debug)]
pub struct DataContext<E> {
    client: ApiClient,
    items: Vec<E>,
    state: ContextState,
    error: Option<String>,
}

/// Marks the context as loading until dropped.
///
/// Dropping also covers a request future that is cancelled mid-flight.
struct Loading<'a>(&'a mut ContextState);

impl<'a> Loading<'a> {
    fn enter(state: &'a mut ContextState) -> Self {
        *state = ContextState::Loading;
        Self(state)
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        *self.0 = ContextState::Ready;
    }
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Fetch,
    Add,
    Update,
    Delete,
}

impl<E: Entity> DataContext<E> {
    /// An empty, idle context. Call [`fetch`](Self::fetch) to load it.
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            items: Vec::new(),
            state: ContextState::Idle,
            error: None,
        }
    }

    /// Create a context and load the collection.
    ///
    /// A failed load is recorded in [`error`](Self::error) and leaves the
    /// cache empty; it is not returned.
    pub async fn init(client: ApiClient) -> Self {
        let mut ctx = Self::new(client);
        ctx.fetch().await;
        ctx
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn find(&self, id: &str) -> Option<&E> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == ContextState::Loading
    }

    /// Message describing the last failed request, cleared by the next
    /// successful one.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Reload the whole collection.
    ///
    /// On failure the previous cache stays in place and the error is only
    /// recorded, so a view keeps showing stale-but-present data.
    pub async fn fetch(&mut self) {
        let Self { client, items, state, error } = self;
        let _loading = Loading::enter(state);
        match client.list::<E>().await {
            Ok(fresh) => {
                *items = fresh;
                *error = None;
            }
            Err(e) => {
                warn!(collection = E::COLLECTION, error = %e, "failed to fetch collection");
                *error = Some(describe::<E>(&e, Op::Fetch));
            }
        }
    }

    /// Create a record and append the server's copy to the cache.
    pub async fn add<B>(&mut self, draft: &B) -> Result<E, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let Self { client, items, state, error } = self;
        let _loading = Loading::enter(state);
        *error = None;
        match client.create::<E>(draft).await {
            Ok(record) => {
                items.push(record.clone());
                Ok(record)
            }
            Err(e) => Err(record_failure::<E>(error, e, Op::Add)),
        }
    }

    /// Update a record and replace the cached entry for `id` with the
    /// server's merged copy.
    pub async fn update<B>(&mut self, id: &str, patch: &B) -> Result<E, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let Self { client, items, state, error } = self;
        let _loading = Loading::enter(state);
        *error = None;
        match client.update::<E>(id, patch).await {
            Ok(record) => {
                for item in items.iter_mut().filter(|item| item.id() == id) {
                    *item = record.clone();
                }
                Ok(record)
            }
            Err(e) => Err(record_failure::<E>(error, e, Op::Update)),
        }
    }

    /// Delete a record and drop it from the cache.
    pub async fn remove(&mut self, id: &str) -> Result<E, ClientError> {
        let Self { client, items, state, error } = self;
        let _loading = Loading::enter(state);
        *error = None;
        match client.remove::<E>(id).await {
            Ok(record) => {
                items.retain(|item| item.id() != id);
                Ok(record)
            }
            Err(e) => Err(record_failure::<E>(error, e, Op::Delete)),
        }
    }
}

fn record_failure<E: Entity>(slot: &mut Option<String>, e: ClientError, op: Op) -> ClientError {
    warn!(collection = E::COLLECTION, ?op, error = %e, "write failed");
    *slot = Some(describe::<E>(&e, op));
    e
}

/// The server's message when it sent one, else a generic line per operation.
fn describe<E: Entity>(e: &ClientError, op: Op) -> String {
    if let Some(message) = e.server_message() {
        return message.to_owned();
    }
    let kind = E::KIND.to_lowercase();
    match op {
        Op::Fetch => format!("Failed to fetch {}", E::COLLECTION),
        Op::Add => format!("Failed to add {kind}"),
        Op::Update => format!("Failed to update {kind}"),
        Op::Delete => format!("Failed to delete {kind}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_prefers_server_message() {
        let e = ClientError::Api {
            status: 400,
            message: Some("Title is required".into()),
        };
        assert_eq!(describe::<Task>(&e, Op::Add), "Title is required");
    }

    #[test]
    fn describe_falls_back_per_operation() {
        let e = ClientError::Api { status: 502, message: None };
        assert_eq!(describe::<Task>(&e, Op::Fetch), "Failed to fetch tasks");
        assert_eq!(describe::<Task>(&e, Op::Add), "Failed to add task");
        assert_eq!(describe::<Project>(&e, Op::Update), "Failed to update project");
        assert_eq!(describe::<Project>(&e, Op::Delete), "Failed to delete project");
    }

    #[test]
    fn new_context_is_idle_and_empty() {
        let ctx = TaskContext::new(ApiClient::new("http://localhost:5000").unwrap());
        assert_eq!(ctx.state(), ContextState::Idle);
        assert!(ctx.items().is_empty());
        assert!(ctx.error().is_none());
    }

    #[test]
    fn loading_guard_settles_on_drop() {
        let mut state = ContextState::Idle;
        {
            let guard = Loading::enter(&mut state);
            assert_eq!(*guard.0, ContextState::Loading);
        }
        assert_eq!(state, ContextState::Ready);
    }
}
