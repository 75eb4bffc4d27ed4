//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: repository wiring for the configured backend
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs and validation
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Prefix under which the movie routes are mounted.
pub const MOVIES_PATH: &str = "/api/v1/movies";

/// Collection path with the trailing slash, served as an alias of `MOVIES_PATH`.
pub const MOVIES_PATH_SLASH: &str = "/api/v1/movies/";

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: Arc<services::AppServices>) -> Router {
    let mut router = Router::new()
        .route("/health", get(routes::system::health))
        .route(
            MOVIES_PATH_SLASH,
            post(routes::movies::create_movie).get(routes::movies::list_movies),
        )
        .nest(MOVIES_PATH, routes::movies::router());

    if services.metrics().is_some() {
        router = router.route("/metrics", get(routes::system::metrics));
    }

    router.layer(
        ServiceBuilder::new()
            .layer(Extension(services))
            .layer(CorsLayer::very_permissive())
            .layer(axum::middleware::from_fn(middleware::request_logging))
            .layer(axum::middleware::from_fn(middleware::track_metrics)),
    )
}
