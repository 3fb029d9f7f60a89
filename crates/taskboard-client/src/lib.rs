//! Typed client for the taskboard REST API.
//!
//! [`ApiClient`] is a thin `reqwest` wrapper speaking the server's JSON.
//! [`DataContext`] layers a local cache on top of it: it loads a whole
//! collection once and then applies each successful write to the cache, so
//! callers can render from memory without re-fetching. [`views`] holds the
//! selectors the dashboard and list screens compute from a cache.

pub mod api;
pub mod context;
pub mod error;
pub mod views;

pub use api::{ApiClient, Health, HealthCounts};
pub use context::{ContextState, DataContext, ProjectContext, TaskContext};
pub use error::ClientError;
