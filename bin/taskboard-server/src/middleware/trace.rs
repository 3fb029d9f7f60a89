use axum::{
    body::{Body, HttpBody},
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use http_body_util::BodyExt;
use std::time::Instant;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

pub static X_TRACE_ID: &str = "x-trace-id";

/// Bodies larger than this are summarised instead of logged.
const MAX_LOGGED_BODY: usize = 1024;

/// Wraps each request in an `http_request` span carrying a trace id.
///
/// The id is taken from an incoming `x-trace-id` header when it parses as a
/// UUID, otherwise a new v4 id is generated. It is echoed in the response.
pub async fn trace_middleware(req: Request, next: Next) -> Response {
    let start_time = Instant::now();

    let trace_id = req
        .headers()
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %method,
        path = %path,
    );

    async move {
        info!("→ request started");
        let header_value = HeaderValue::from_str(&trace_id.to_string()).ok();

        let (parts, body) = req.into_parts();
        let body = log_body("request", &parts.headers, body).await;
        let mut req = Request::from_parts(parts, body);
        if let Some(value) = &header_value {
            req.headers_mut().insert(X_TRACE_ID, value.clone());
        }

        let response = next.run(req).await;

        let (parts, body) = response.into_parts();
        let body = log_body("response", &parts.headers, body).await;
        let mut response = Response::from_parts(parts, body);
        if let Some(value) = header_value {
            response.headers_mut().insert(X_TRACE_ID, value);
        }

        info!(
            status = response.status().as_u16(),
            latency_ms = start_time.elapsed().as_millis(),
            "← response finished"
        );

        response
    }
    .instrument(span)
    .await
}

/// Log a small JSON body at debug level.
///
/// Only bodies of known length below [`MAX_LOGGED_BODY`] are buffered; any
/// other body is passed through untouched.
async fn log_body(direction: &str, headers: &header::HeaderMap, body: Body) -> Body {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let is_json = content_type.contains("application/json");
    let size = body.size_hint().exact();

    match size {
        Some(0) => body,
        Some(len) if is_json && len < MAX_LOGGED_BODY as u64 => {
            let bytes = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(_) => return Body::empty(),
            };
            if let Ok(text) = std::str::from_utf8(&bytes) {
                debug!("{direction} body: {text}");
            }
            Body::from(bytes)
        }
        _ => {
            let size = size.map_or_else(|| "unknown".to_owned(), |len| len.to_string());
            debug!("{direction} body: [skipped: type={content_type}, size={size}]");
            body
        }
    }
}
