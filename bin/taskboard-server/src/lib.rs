//! taskboard-server: an in-memory task and project REST API.
//!
//! The binary in `main.rs` wires configuration and tracing around
//! [`routes::build`]; tests and embedders can call it directly.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;

pub use config::Config;
pub use routes::build;
pub use state::AppState;
