//! MongoDB-backed movie repository.
//!
//! One document per movie in the `movies` collection:
//!
//! ```text
//! { id, title, description, release_year, watched }
//! ```
//!
//! keyed by the `id` field (unique index), with the server-assigned `_id`
//! ignored on read. Filtering and pagination are pushed down to the server.
//!
//! ## Error Mapping
//!
//! | Situation | RepositoryError |
//! |-----------|-----------------|
//! | `params` contains `id` | `IdentityChange` (no write is issued) |
//! | `create` on an existing id | document replaced whole (extra keys dropped) |
//! | update matched no document | `NotFound` |
//! | update matched but changed nothing | success (no-op) |
//! | driver / network / decoding failure | `Backend` |
//!
//! ## Thread Safety
//!
//! `mongodb::Client` is internally pooled and cheap to clone; one client is
//! created at startup and shared by every request.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, Bson, Document, doc};
use mongodb::options::{FindOptions, IndexOptions, ReplaceOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use movietrack_core::{Movie, MovieId, MoviePatch};

use super::query::Pagination;
use super::r#trait::{MovieRepository, RepositoryError};
use super::update::{
    FIELD_DESCRIPTION, FIELD_ID, FIELD_RELEASE_YEAR, FIELD_TITLE, FIELD_WATCHED, MovieUpdate,
};
use crate::config::MongoConfig;

/// Collection holding one document per movie.
pub const MOVIES_COLLECTION: &str = "movies";

/// Stored document shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MovieDocument {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    release_year: i32,
    #[serde(default)]
    watched: bool,
}

impl From<&Movie> for MovieDocument {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id().to_string(),
            title: movie.title().to_string(),
            description: movie.description().to_string(),
            release_year: movie.release_year(),
            watched: movie.watched(),
        }
    }
}

impl TryFrom<MovieDocument> for Movie {
    type Error = RepositoryError;

    fn try_from(document: MovieDocument) -> Result<Self, Self::Error> {
        let id = document.id.clone();
        Movie::new(
            MovieId::from(document.id),
            document.title,
            document.description,
            document.release_year,
            document.watched,
        )
        .map_err(|e| RepositoryError::Backend(format!("corrupt movie document {id}: {e}")))
    }
}

fn map_mongo_error(operation: &'static str, err: mongodb::error::Error) -> RepositoryError {
    RepositoryError::Backend(format!("{operation}: {err}"))
}

fn id_filter(id: &MovieId) -> Document {
    doc! { FIELD_ID: id.as_str() }
}

/// Build the `$set` body: typed known fields first, then any extra keys verbatim.
fn set_document(
    patch: &MoviePatch,
    extra: serde_json::Map<String, serde_json::Value>,
) -> Result<Document, RepositoryError> {
    let mut set = Document::new();
    if let Some(title) = &patch.title {
        set.insert(FIELD_TITLE, title.as_str());
    }
    if let Some(description) = &patch.description {
        set.insert(FIELD_DESCRIPTION, description.as_str());
    }
    if let Some(release_year) = patch.release_year {
        set.insert(FIELD_RELEASE_YEAR, Bson::Int32(release_year));
    }
    if let Some(watched) = patch.watched {
        set.insert(FIELD_WATCHED, watched);
    }
    for (field, value) in extra {
        let value = bson::to_bson(&value)
            .map_err(|e| RepositoryError::invalid_field(field.as_str(), e.to_string()))?;
        set.insert(field, value);
    }
    Ok(set)
}

/// Interpret an `update_one` result. Nothing matched means the movie is absent;
/// a match that changed nothing is a successful no-op.
fn update_outcome(id: &MovieId, matched: u64, modified: u64) -> Result<(), RepositoryError> {
    if matched == 0 {
        return Err(RepositoryError::NotFound(id.clone()));
    }
    if modified == 0 {
        debug!("update matched but changed nothing");
    }
    Ok(())
}

/// MongoDB movie repository.
#[derive(Debug, Clone)]
pub struct MongoMovieRepository {
    database: Database,
    movies: Collection<MovieDocument>,
}

impl MongoMovieRepository {
    /// Connect using `config`, and make sure the `id` index exists.
    pub async fn connect(config: &MongoConfig) -> Result<Self, RepositoryError> {
        let client = Client::with_uri_str(&config.connection_string)
            .await
            .map_err(|e| map_mongo_error("connect", e))?;
        let repo = Self::from_client(&client, &config.database_name);
        repo.ensure_indexes().await?;

        info!(database = %config.database_name, "connected to mongodb");
        Ok(repo)
    }

    /// Build on top of an existing client (no I/O).
    pub fn from_client(client: &Client, database_name: &str) -> Self {
        let database = client.database(database_name);
        let movies = database.collection::<MovieDocument>(MOVIES_COLLECTION);
        Self { database, movies }
    }

    /// Create the unique index on `id` (idempotent).
    pub async fn ensure_indexes(&self) -> Result<(), RepositoryError> {
        let mut options = IndexOptions::default();
        options.unique = Some(true);
        let index = IndexModel::builder()
            .keys(doc! { FIELD_ID: 1 })
            .options(options)
            .build();

        self.movies
            .create_index(index, None)
            .await
            .map_err(|e| map_mongo_error("create_index", e))?;
        Ok(())
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    async fn exists(&self, id: &MovieId) -> Result<bool, RepositoryError> {
        let count = self
            .movies
            .count_documents(id_filter(id), None)
            .await
            .map_err(|e| map_mongo_error("count_documents", e))?;
        Ok(count > 0)
    }
}

#[async_trait]
impl MovieRepository for MongoMovieRepository {
    #[instrument(skip(self, movie), fields(movie_id = %movie.id()))]
    async fn create(&self, movie: Movie) -> Result<(), RepositoryError> {
        let mut options = ReplaceOptions::default();
        options.upsert = Some(true);

        let result = self
            .movies
            .replace_one(id_filter(movie.id()), MovieDocument::from(&movie), options)
            .await
            .map_err(|e| map_mongo_error("create", e))?;

        debug!(upserted = result.upserted_id.is_some(), "movie stored");
        Ok(())
    }

    #[instrument(skip(self), fields(movie_id = %id))]
    async fn get_by_id(&self, id: &MovieId) -> Result<Option<Movie>, RepositoryError> {
        let document = self
            .movies
            .find_one(id_filter(id), None)
            .await
            .map_err(|e| map_mongo_error("get_by_id", e))?;

        document.map(Movie::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn get_by_title(
        &self,
        title: &str,
        page: Pagination,
    ) -> Result<Vec<Movie>, RepositoryError> {
        let mut options = FindOptions::default();
        if page.skip > 0 {
            options.skip = Some(page.skip);
        }
        if !page.is_unlimited() {
            options.limit = Some(i64::try_from(page.limit).unwrap_or(i64::MAX));
        }

        let cursor = self
            .movies
            .find(doc! { FIELD_TITLE: title }, options)
            .await
            .map_err(|e| map_mongo_error("get_by_title", e))?;

        let documents: Vec<MovieDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| map_mongo_error("get_by_title", e))?;

        debug!(count = documents.len(), "title lookup");
        documents.into_iter().map(Movie::try_from).collect()
    }

    #[instrument(skip(self, params), fields(movie_id = %id))]
    async fn update(&self, id: &MovieId, params: MovieUpdate) -> Result<(), RepositoryError> {
        let validated = params.validate()?;
        let set = set_document(&validated.patch, validated.extra)?;

        // The server rejects an empty `$set`; an empty update only has to prove existence.
        if set.is_empty() {
            return if self.exists(id).await? {
                Ok(())
            } else {
                Err(RepositoryError::NotFound(id.clone()))
            };
        }

        let result = self
            .movies
            .update_one(id_filter(id), doc! { "$set": set }, None)
            .await
            .map_err(|e| map_mongo_error("update", e))?;

        update_outcome(id, result.matched_count, result.modified_count)
    }

    #[instrument(skip(self), fields(movie_id = %id))]
    async fn delete(&self, id: &MovieId) -> Result<(), RepositoryError> {
        let result = self
            .movies
            .delete_one(id_filter(id), None)
            .await
            .map_err(|e| map_mongo_error("delete", e))?;

        debug!(deleted = result.deleted_count, "movie delete");
        Ok(())
    }
}
