//! Movie entity.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::MovieId;

/// A tracked film.
///
/// The identity is fixed at construction. Attributes only change through
/// [`Movie::apply_patch`], which the repositories call from `update`; every
/// instance handed out by a repository is an independent snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    id: MovieId,
    title: String,
    description: String,
    release_year: i32,
    #[serde(default)]
    watched: bool,
}

impl Movie {
    pub fn new(
        id: MovieId,
        title: impl Into<String>,
        description: impl Into<String>,
        release_year: i32,
        watched: bool,
    ) -> DomainResult<Self> {
        let title = title.into();
        if title.is_empty() {
            return Err(DomainError::validation("title must not be empty"));
        }

        Ok(Self {
            id,
            title,
            description: description.into(),
            release_year,
            watched,
        })
    }

    pub fn id(&self) -> &MovieId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn release_year(&self) -> i32 {
        self.release_year
    }

    pub fn watched(&self) -> bool {
        self.watched
    }

    /// Overwrite the attributes present in `patch`; absent ones are untouched.
    pub fn apply_patch(&mut self, patch: &MoviePatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(release_year) = patch.release_year {
            self.release_year = release_year;
        }
        if let Some(watched) = patch.watched {
            self.watched = watched;
        }
    }
}

/// Typed partial update of a movie's mutable attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoviePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watched: Option<bool>,
}

impl MoviePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.release_year.is_none()
            && self.watched.is_none()
    }
}
