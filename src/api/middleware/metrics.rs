use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use std::time::Instant;
use tracing::info;

use super::request_id::REQUEST_ID_HEADER;
use crate::utils::hash::StorageKey;

/// Coarse result of a request, as reported in the `metrics` log target.
pub fn outcome(status: StatusCode) -> &'static str {
    if status.is_success() {
        "ok"
    } else if status.is_client_error() {
        "rejected"
    } else {
        "failed"
    }
}

/// One `metrics` line per request. Stored uploads also report their key.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let route = format!("{} {}", req.method(), req.uri().path());
    let request_id = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let response = next.run(req).await;
    let status = response.status();

    match response.extensions().get::<StorageKey>() {
        Some(key) => info!(
            target: "metrics",
            route = %route,
            status = status.as_u16(),
            outcome = "stored",
            key = %key,
            latency_ms = start.elapsed().as_millis() as u64,
            request_id = %request_id,
            "upload_completed"
        ),
        None => info!(
            target: "metrics",
            route = %route,
            status = status.as_u16(),
            outcome = outcome(status),
            latency_ms = start.elapsed().as_millis() as u64,
            request_id = %request_id,
            "request_completed"
        ),
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome() {
        assert_eq!(outcome(StatusCode::OK), "ok");
        assert_eq!(outcome(StatusCode::BAD_REQUEST), "rejected");
        assert_eq!(outcome(StatusCode::NOT_FOUND), "rejected");
        assert_eq!(outcome(StatusCode::INTERNAL_SERVER_ERROR), "failed");
    }
}
