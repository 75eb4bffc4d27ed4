use std::sync::Arc;
use std::time::Instant;

use axum::{
    Extension,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

use crate::app::services::AppServices;

/// One log line per request: method, path, status and latency.
pub async fn request_logging(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request"
    );

    response
}

/// Count the request and time it, labelled by route template.
pub async fn track_metrics(
    Extension(services): Extension<Arc<AppServices>>,
    req: Request,
    next: Next,
) -> Response {
    let Some(metrics) = services.metrics() else {
        return next.run(req).await;
    };

    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let started = Instant::now();

    let response = next.run(req).await;

    metrics.record(&method, &route, response.status().as_u16(), started.elapsed());
    response
}
