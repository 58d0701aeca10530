//! Per-request tracing middleware.
//!
//! Every request gets an `x-trace-id` (taken from the incoming header when it
//! is a valid UUID, generated otherwise). The handler runs inside an
//! `http_request` span carrying that ID, and the ID is echoed on the response.

use std::time::Instant;

use axum::body::{Body, Bytes};
use axum::extract::Request;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use http_body_util::BodyExt;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

pub static X_TRACE_ID: &str = "x-trace-id";

/// JSON bodies at or above this size are not written to the log.
const MAX_LOGGED_BODY: usize = 1024;

pub async fn trace_middleware(req: Request<Body>, next: Next) -> Response {
    let start_time = Instant::now();

    let trace_id = req
        .headers()
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        info!("→ request started");
        let trace_header = HeaderValue::from_str(&trace_id.to_string()).ok();

        let (parts, body) = req.into_parts();
        let req_bytes = buffer_and_log("request", &parts.headers, body).await;
        let mut req = Request::from_parts(parts, Body::from(req_bytes));
        if let Some(value) = trace_header.clone() {
            req.headers_mut().insert(X_TRACE_ID, value);
        }

        let mut response = next.run(req).await;
        if let Some(value) = trace_header {
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

/// Collect the body and log it when it is small JSON.
///
/// Form bodies are never logged: the login and registration forms carry
/// passwords.
async fn buffer_and_log(direction: &str, headers: &HeaderMap, body: Body) -> Bytes {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(error = %e, "failed to buffer {direction} body");
            return Bytes::new();
        }
    };

    if content_type.contains("application/json") && bytes.len() < MAX_LOGGED_BODY {
        if let Ok(text) = std::str::from_utf8(&bytes) {
            info!("{direction} body: {text}");
        }
    } else if !bytes.is_empty() {
        info!("{direction} body: [skipped: type={content_type}, size={}]", bytes.len());
    }

    bytes
}

// ── Tests ──────────────────────────────────────────────────────────────────────
