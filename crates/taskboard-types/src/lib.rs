//! Shared wire model for taskboard.
//!
//! Both the server and the client speak the same JSON: camelCase keys, the
//! record identifier under `_id`, and millisecond-precision UTC timestamps.
//! Everything that crosses the wire lives here so the two sides cannot drift.

pub mod entity;
pub mod project;
pub mod task;
pub mod timestamp;

pub use entity::Entity;
pub use project::{NewProject, Project, ProjectPatch};
pub use task::{NewTask, Priority, Task, TaskPatch, TaskStatus};

/// Uniform error body returned by every failing server route.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
    /// Always `"error"`.
    pub status: String,
    pub message: String,
    /// Failure detail, only present when the server runs in development mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_owned(),
            message: message.into(),
            stack: None,
        }
    }
}
