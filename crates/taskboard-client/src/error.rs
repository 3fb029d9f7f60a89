use thiserror::Error;

/// Errors returned by [`crate::ApiClient`] and the data contexts.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure, or a success response whose body did not decode.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("server returned {status}: {}", message.as_deref().unwrap_or("<no message>"))]
    Api { status: u16, message: Option<String> },

    /// The configured base URL cannot carry path segments.
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// The `message` field of the server's error body, when there was one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            ClientError::InvalidUrl(_) => None,
        }
    }
}
