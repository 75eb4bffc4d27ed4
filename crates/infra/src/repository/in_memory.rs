use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::{debug, instrument};

use movietrack_core::{Movie, MovieId};

use super::query::Pagination;
use super::r#trait::{MovieRepository, RepositoryError};
use super::update::MovieUpdate;

#[derive(Debug, Default)]
struct Storage {
    next_seq: u64,
    /// Insertion sequence -> movie. Iteration order is insertion order.
    movies: BTreeMap<u64, Movie>,
    index: HashMap<MovieId, u64>,
}

/// In-memory movie repository for tests/dev.
///
/// Never suspends, but exposes the same async contract as the MongoDB backend.
/// Overwriting an existing id keeps the movie's original position, so title
/// queries always return matches in first-insertion order.
#[derive(Debug, Default)]
pub struct InMemoryMovieRepository {
    inner: RwLock<Storage>,
}

impl InMemoryMovieRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored movies.
    pub fn len(&self) -> Result<usize, RepositoryError> {
        let storage = self
            .inner
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("len"))?;
        Ok(storage.movies.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepository {
    #[instrument(skip(self, movie), fields(movie_id = %movie.id()))]
    async fn create(&self, movie: Movie) -> Result<(), RepositoryError> {
        let mut storage = self
            .inner
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("create"))?;

        match storage.index.get(movie.id()).copied() {
            Some(seq) => {
                debug!("overwriting existing movie");
                storage.movies.insert(seq, movie);
            }
            None => {
                let seq = storage.next_seq;
                storage.next_seq += 1;
                storage.index.insert(movie.id().clone(), seq);
                storage.movies.insert(seq, movie);
            }
        }

        Ok(())
    }

    #[instrument(skip(self), fields(movie_id = %id))]
    async fn get_by_id(&self, id: &MovieId) -> Result<Option<Movie>, RepositoryError> {
        let storage = self
            .inner
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("get_by_id"))?;

        Ok(storage
            .index
            .get(id)
            .and_then(|seq| storage.movies.get(seq))
            .cloned())
    }

    #[instrument(skip(self))]
    async fn get_by_title(
        &self,
        title: &str,
        page: Pagination,
    ) -> Result<Vec<Movie>, RepositoryError> {
        let storage = self
            .inner
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("get_by_title"))?;

        let matches = storage.movies.values().filter(|m| m.title() == title);
        let movies: Vec<Movie> = page.window(matches).cloned().collect();

        debug!(count = movies.len(), "title lookup");
        Ok(movies)
    }

    #[instrument(skip(self, params), fields(movie_id = %id))]
    async fn update(&self, id: &MovieId, params: MovieUpdate) -> Result<(), RepositoryError> {
        let validated = params.validate()?;

        let mut storage = self
            .inner
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("update"))?;

        let seq = storage
            .index
            .get(id)
            .copied()
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        let movie = storage
            .movies
            .get_mut(&seq)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;

        movie.apply_patch(&validated.patch);

        if !validated.extra.is_empty() {
            let ignored: Vec<&str> = validated.extra.keys().map(String::as_str).collect();
            debug!(?ignored, "dropping unknown update fields");
        }

        Ok(())
    }

    #[instrument(skip(self), fields(movie_id = %id))]
    async fn delete(&self, id: &MovieId) -> Result<(), RepositoryError> {
        let mut storage = self
            .inner
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("delete"))?;

        if let Some(seq) = storage.index.remove(id) {
            storage.movies.remove(&seq);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: &str, title: &str) -> Movie {
        Movie::new(MovieId::new(id), title, "My Description", 1990, false).unwrap()
    }

    #[tokio::test]
    async fn new_is_empty() {
        let repo = InMemoryMovieRepository::new();
        assert!(repo.is_empty().unwrap());
    }

    #[tokio::test]
    async fn overwrite_keeps_first_insertion_position() {
        let repo = InMemoryMovieRepository::new();
        repo.create(movie("a", "Same")).await.unwrap();
        repo.create(movie("b", "Same")).await.unwrap();
        repo.create(
            Movie::new(MovieId::new("a"), "Same", "Rewritten", 2001, true).unwrap(),
        )
        .await
        .unwrap();

        let found = repo.get_by_title("Same", Pagination::default()).await.unwrap();
        let ids: Vec<&str> = found.iter().map(|m| m.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(found[0].description(), "Rewritten");
        assert_eq!(repo.len().unwrap(), 2);
    }

    #[tokio::test]
    async fn returned_movies_are_snapshots() {
        let repo = InMemoryMovieRepository::new();
        repo.create(movie("a", "My Movie")).await.unwrap();

        let before = repo.get_by_id(&MovieId::new("a")).await.unwrap().unwrap();
        repo.update(&MovieId::new("a"), MovieUpdate::new().set("watched", true))
            .await
            .unwrap();

        assert!(!before.watched());
        let after = repo.get_by_id(&MovieId::new("a")).await.unwrap().unwrap();
        assert!(after.watched());
    }

    #[tokio::test]
    async fn unknown_update_fields_are_dropped() {
        let repo = InMemoryMovieRepository::new();
        repo.create(movie("a", "My Movie")).await.unwrap();

        repo.update(&MovieId::new("a"), MovieUpdate::new().set("rating", 5))
            .await
            .unwrap();

        assert_eq!(
            repo.get_by_id(&MovieId::new("a")).await.unwrap().unwrap(),
            movie("a", "My Movie")
        );
    }

    #[tokio::test]
    async fn delete_then_recreate_moves_to_end() {
        let repo = InMemoryMovieRepository::new();
        repo.create(movie("a", "T")).await.unwrap();
        repo.create(movie("b", "T")).await.unwrap();
        repo.delete(&MovieId::new("a")).await.unwrap();
        repo.create(movie("a", "T")).await.unwrap();

        let ids: Vec<String> = repo
            .get_by_title("T", Pagination::unlimited())
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id().to_string())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
