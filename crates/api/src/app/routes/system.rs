use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::app::services::AppServices;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Prometheus scrape endpoint.
pub async fn metrics(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.metrics() {
        Some(metrics) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            metrics.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
