//! Axum router construction.
//!
//! [`build`] assembles the complete application router, including:
//! - Middleware layers (trace-ID span, CORS, error detail, panic catcher)
//! - `/tasks` and `/projects` resource routes
//! - Health / heartbeat route
//! - Optional OpenAPI document (disable with `TASKBOARD_ENABLE_DOCS=false`)
//! - A catch-all that answers unknown routes with the uniform 404 body

pub mod doc;
mod health;
mod projects;
mod tasks;

use axum::routing::get;
use axum::{middleware, Json, Router};
use serde_json::{Map, Value};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;

use crate::error::{self, route_not_found, ServerError};
use crate::middleware::{cors, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .merge(health::router())
        .nest("/tasks", tasks::router())
        .nest("/projects", projects::router());

    if state.config.enable_docs {
        app = app.route("/api-docs/openapi.json", get(|| async { Json(doc::get_docs()) }));
    }

    app.fallback(route_not_found)
        // Innermost first: panics become 500s before the detail rewrite sees them.
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            error::expose_error_detail,
        ))
        .layer(cors::cors_layer(state.clone()))
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}

/// Update bodies are merged key by key, so they must be JSON objects.
fn object_body(raw: &[u8]) -> Result<Map<String, Value>, ServerError> {
    let body: Value = serde_json::from_slice(raw)
        .map_err(|e| ServerError::BadRequest(format!("Failed to parse the request body as JSON: {e}")))?;
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err(ServerError::BadRequest(
            "Request body must be a JSON object".to_owned(),
        )),
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::routing::get;
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn unknown_route_uses_uniform_404() {
        let app = seeded_app().await;
        let (status, body) = send(&app, Method::GET, "/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "status": "error", "message": "Route GET /nope not found" }));
    }

    #[tokio::test]
    async fn unsupported_method_is_a_missing_route() {
        let app = seeded_app().await;
        let (status, body) = send(&app, Method::PATCH, "/tasks/task1", Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Route PATCH /tasks/task1 not found");
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let app = seeded_app().await;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/tasks")
            .header("content-type", "application/json")
            .body(Body::from("{\"title\": "))
            .unwrap();
        let (status, body) = send_raw(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    }

    #[tokio::test]
    async fn cors_allows_configured_origin_with_credentials() {
        let app = seeded_app().await;
        let request = Request::builder()
            .method(Method::GET)
            .uri("/tasks")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost:5173");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[tokio::test]
    async fn cors_ignores_unlisted_origin() {
        let app = seeded_app().await;
        let request = Request::builder()
            .method(Method::GET)
            .uri("/tasks")
            .header(header::ORIGIN, "http://evil.test")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn trace_id_is_echoed_or_generated() {
        let app = seeded_app().await;
        let id = "6f1c2f0e-7d0a-4a43-9a52-0d8d7d1f5c11";
        let request = Request::builder()
            .uri("/health")
            .header(crate::middleware::trace::X_TRACE_ID, id)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.headers()[crate::middleware::trace::X_TRACE_ID], id);

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let generated = response.headers()[crate::middleware::trace::X_TRACE_ID].to_str().unwrap();
        assert!(uuid::Uuid::parse_str(generated).is_ok());
    }

    #[tokio::test]
    async fn openapi_document_lists_resource_paths() {
        let app = seeded_app().await;
        let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"].get("/tasks/{id}").is_some());
        assert!(body["paths"].get("/projects").is_some());
    }

    #[tokio::test]
    async fn docs_can_be_disabled() {
        let app = app_with(Config {
            enable_docs: false,
            ..Config::default()
        })
        .await;
        let (status, _) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    async fn boom() -> &'static str {
        panic!("kaboom")
    }

    /// The production error layers around a route that always panics.
    async fn panicking_router(development: bool) -> axum::Router {
        let state = std::sync::Arc::new(
            crate::state::AppState::new(Config {
                development,
                ..Config::default()
            })
            .await,
        );
        axum::Router::new()
            .route("/boom", get(boom))
            .layer(tower_http::catch_panic::CatchPanicLayer::custom(crate::error::panic_response))
            .layer(axum::middleware::from_fn_with_state(
                state.clone(),
                crate::error::expose_error_detail,
            ))
            .with_state(state)
    }

    #[tokio::test]
    async fn panics_become_generic_500() {
        let app = panicking_router(false).await;
        let (status, body) = send(&app, Method::GET, "/boom", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "status": "error", "message": "Internal server error" }));
    }

    #[tokio::test]
    async fn development_mode_adds_stack_detail() {
        let app = panicking_router(true).await;
        let (status, body) = send(&app, Method::GET, "/boom", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
        assert!(body["stack"].as_str().unwrap().contains("kaboom"));
    }
}
