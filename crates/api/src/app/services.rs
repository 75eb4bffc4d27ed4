use std::sync::Arc;

use movietrack_infra::{
    AppConfig, BackendKind, InMemoryMovieRepository, MongoMovieRepository, MovieRepository,
    RepositoryError,
};
use movietrack_observability::HttpMetrics;

/// Shared handles used by the request handlers.
///
/// Built once at startup and injected as an axum `Extension`.
#[derive(Clone)]
pub struct AppServices {
    movies: Arc<dyn MovieRepository>,
    metrics: Option<Arc<HttpMetrics>>,
}

impl AppServices {
    pub fn new(movies: Arc<dyn MovieRepository>) -> Self {
        Self {
            movies,
            metrics: None,
        }
    }

    /// Services backed by a fresh in-memory repository.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryMovieRepository::new()))
    }

    /// Turn on request metrics (and the `/metrics` route).
    pub fn with_metrics(mut self, metrics: Arc<HttpMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn movies(&self) -> &dyn MovieRepository {
        self.movies.as_ref()
    }

    pub fn metrics(&self) -> Option<&HttpMetrics> {
        self.metrics.as_deref()
    }
}

/// Wire the repository selected by `config.backend`.
pub async fn build_services(config: &AppConfig) -> Result<AppServices, RepositoryError> {
    let services = match config.backend {
        BackendKind::Memory => {
            tracing::warn!("using in-memory movie repository; data is lost on restart");
            AppServices::in_memory()
        }
        BackendKind::Mongo => {
            let repo = MongoMovieRepository::connect(&config.mongo).await?;
            AppServices::new(Arc::new(repo))
        }
    };

    if config.enable_metrics {
        return Ok(services.with_metrics(Arc::new(HttpMetrics::new())));
    }
    Ok(services)
}
