//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are converted to the uniform
//! `{"status": "error", "message": ...}` body with a matching status code.
//!
//! Internal errors are logged with full detail but only a generic message
//! is returned. The detail rides along as a response extension so that
//! [`expose_error_detail`] can surface it when the server runs in
//! development mode.

use std::any::Any;
use std::sync::Arc;

use axum::extract::rejection::{BytesRejection, JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, OriginalUri, Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use taskboard_types::ErrorBody;
use thiserror::Error;
use tracing::error;

use crate::state::AppState;
use crate::store::StoreError;

/// All errors that can occur in the request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The caller referenced a resource or route that does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The caller sent an invalid or malformed request.
    #[error("{0}")]
    BadRequest(String),

    /// An unclassified internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Failure detail attached to 500 responses.
#[derive(Debug, Clone)]
pub struct ErrorDetail {
    pub message: String,
    pub detail: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::NotFound(m) => (StatusCode::NOT_FOUND, Json(ErrorBody::new(m))).into_response(),
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, Json(ErrorBody::new(m))).into_response(),
            ServerError::Internal(detail) => {
                error!(detail = %detail, "internal server error");
                let message = "Internal server error".to_owned();
                let mut response =
                    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::new(message.clone()))).into_response();
                response.extensions_mut().insert(ErrorDetail { message, detail });
                response
            }
        }
    }
}

impl From<StoreError> for ServerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { .. } => ServerError::NotFound(e.to_string()),
            StoreError::Invalid { .. } => ServerError::BadRequest(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ServerError {
    fn from(rejection: PathRejection) -> Self {
        if rejection.status().is_server_error() {
            ServerError::Internal(rejection.body_text())
        } else {
            ServerError::BadRequest(rejection.body_text())
        }
    }
}

impl From<BytesRejection> for ServerError {
    fn from(rejection: BytesRejection) -> Self {
        ServerError::BadRequest(rejection.body_text())
    }
}

/// JSON body extractor whose rejections use the uniform error body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub struct JsonBody<T>(pub T);

/// Path parameter extractor whose rejections use the uniform error body.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ServerError))]
pub struct PathParam<T>(pub T);

/// Catch-all for unmatched routes and methods.
///
/// Reads [`OriginalUri`] so routes under a nested router report their full
/// path.
pub async fn route_not_found(method: Method, OriginalUri(uri): OriginalUri) -> ServerError {
    ServerError::NotFound(format!("Route {method} {} not found", uri.path()))
}

/// Turns a handler panic into the uniform 500 response.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        "unknown panic payload".to_owned()
    };
    ServerError::Internal(format!("handler panicked: {detail}")).into_response()
}

/// In development mode, rewrite 500 bodies to include the failure detail.
pub async fn expose_error_detail(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    if !state.config.development {
        return response;
    }
    match response.extensions().get::<ErrorDetail>().cloned() {
        Some(ErrorDetail { message, detail }) => {
            let body = ErrorBody {
                stack: Some(detail),
                ..ErrorBody::new(message)
            };
            (response.status(), Json(body)).into_response()
        }
        None => response,
    }
}
