use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use movietrack_core::{Movie, MovieId};

use super::query::Pagination;
use super::update::MovieUpdate;

/// Repository operation error.
///
/// `NotFound`, `IdentityChange` and `InvalidField` are rejections of the
/// request itself; the HTTP layer maps them to 400. `Backend` and
/// `LockPoisoned` are storage failures and are never swallowed.
///
/// A missing movie on the read path is *not* an error: `get_by_id` returns
/// `Ok(None)`.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Movie: {0} not found")]
    NotFound(MovieId),

    #[error("Can't update Movie ID.")]
    IdentityChange,

    #[error("invalid value for `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("backend failure: {0}")]
    Backend(String),

    #[error("repository lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

impl RepositoryError {
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True for failures caused by the request rather than by the backend.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::IdentityChange | Self::InvalidField { .. }
        )
    }
}

/// Storage contract for movies, uniform across backends.
///
/// Every operation is an independent unit of work. There is no locking across
/// calls: concurrent writers to the same id race and the last write wins.
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Insert a movie, overwriting any existing movie with the same id (upsert).
    async fn create(&self, movie: Movie) -> Result<(), RepositoryError>;

    /// Exact lookup by id. `Ok(None)` when absent.
    async fn get_by_id(&self, id: &MovieId) -> Result<Option<Movie>, RepositoryError>;

    /// Movies whose title equals `title` exactly, windowed by `page`.
    ///
    /// `page.limit == 0` means "everything after `skip`".
    async fn get_by_title(
        &self,
        title: &str,
        page: Pagination,
    ) -> Result<Vec<Movie>, RepositoryError>;

    /// Apply a partial update.
    ///
    /// Fails with `IdentityChange` if `params` touches `id`, and with `NotFound`
    /// if no movie has this id.
    async fn update(&self, id: &MovieId, params: MovieUpdate) -> Result<(), RepositoryError>;

    /// Remove a movie. Deleting an absent id is a no-op.
    async fn delete(&self, id: &MovieId) -> Result<(), RepositoryError>;
}

#[async_trait]
impl<S> MovieRepository for Arc<S>
where
    S: MovieRepository + ?Sized,
{
    async fn create(&self, movie: Movie) -> Result<(), RepositoryError> {
        (**self).create(movie).await
    }

    async fn get_by_id(&self, id: &MovieId) -> Result<Option<Movie>, RepositoryError> {
        (**self).get_by_id(id).await
    }

    async fn get_by_title(
        &self,
        title: &str,
        page: Pagination,
    ) -> Result<Vec<Movie>, RepositoryError> {
        (**self).get_by_title(title, page).await
    }

    async fn update(&self, id: &MovieId, params: MovieUpdate) -> Result<(), RepositoryError> {
        (**self).update(id, params).await
    }

    async fn delete(&self, id: &MovieId) -> Result<(), RepositoryError> {
        (**self).delete(id).await
    }
}
