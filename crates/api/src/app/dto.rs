use serde::{Deserialize, Serialize};

use movietrack_core::{Movie, MoviePatch};
use movietrack_infra::Pagination;

pub const MIN_TITLE_LEN: usize = 4;
pub const MIN_DESCRIPTION_LEN: usize = 4;
pub const MIN_RELEASE_YEAR: i32 = 1900;
pub const MIN_QUERY_TITLE_LEN: usize = 3;
pub const MAX_PAGE_LIMIT: u64 = 1000;
/// Largest `skip` every backend can honour (the document store takes an i64).
pub const MAX_SKIP: u64 = i64::MAX as u64;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub title: String,
    pub description: String,
    pub release_year: i32,
    #[serde(default)]
    pub watched: bool,
}

impl CreateMovieRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.chars().count() < MIN_TITLE_LEN {
            return Err("Title must be longer than 3 characters.".to_string());
        }
        if self.description.chars().count() < MIN_DESCRIPTION_LEN {
            return Err("Description must be longer than 3 characters.".to_string());
        }
        if self.release_year < MIN_RELEASE_YEAR {
            return Err("Release Year must be greater than 1900.".to_string());
        }
        Ok(())
    }
}

/// PATCH body. Absent and `null` fields are both left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub release_year: Option<i32>,
    pub watched: Option<bool>,
}

impl From<UpdateMovieRequest> for MoviePatch {
    fn from(body: UpdateMovieRequest) -> Self {
        MoviePatch {
            title: body.title,
            description: body.description,
            release_year: body.release_year,
            watched: body.watched,
        }
    }
}

/// `GET /movies?title=&skip=&limit=`. `limit = 0` (the default) returns every match.
#[derive(Debug, Deserialize)]
pub struct ListMoviesQuery {
    pub title: String,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
}

impl ListMoviesQuery {
    pub fn validate(&self) -> Result<Pagination, String> {
        if self.title.chars().count() < MIN_QUERY_TITLE_LEN {
            return Err(format!(
                "title must be at least {MIN_QUERY_TITLE_LEN} characters"
            ));
        }
        if self.skip > MAX_SKIP {
            return Err(format!("skip must be at most {MAX_SKIP}"));
        }
        if self.limit > MAX_PAGE_LIMIT {
            return Err(format!("limit must be at most {MAX_PAGE_LIMIT}"));
        }
        Ok(Pagination::new(self.skip, self.limit))
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct MovieCreatedResponse {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub release_year: i32,
    pub watched: bool,
}

impl From<Movie> for MovieResponse {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id().to_string(),
            title: movie.title().to_string(),
            description: movie.description().to_string(),
            release_year: movie.release_year(),
            watched: movie.watched(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(title: &str, description: &str, release_year: i32) -> CreateMovieRequest {
        CreateMovieRequest {
            title: title.into(),
            description: description.into(),
            release_year,
            watched: false,
        }
    }

    #[test]
    fn create_validation_bounds() {
        assert!(create("My Movie", "Test", 2000).validate().is_ok());
        assert!(create("Abcd", "Abcd", 1900).validate().is_ok());
        assert!(create("My", "Test", 2000).validate().is_err());
        assert!(create("My Movie", "Tes", 2000).validate().is_err());
        assert!(create("My Movie", "Test", 1899).validate().is_err());
    }

    #[test]
    fn title_length_counts_characters_not_bytes() {
        assert!(create("Amélie", "Test", 2001).validate().is_ok());
        assert!(create("日本語", "Test", 2001).validate().is_err());
    }

    #[test]
    fn list_query_bounds() {
        let q = |title: &str, skip, limit| ListMoviesQuery {
            title: title.into(),
            skip,
            limit,
        };
        assert_eq!(q("My Movie", 2, 0).validate().unwrap(), Pagination::new(2, 0));
        assert!(q("My", 0, 0).validate().is_err());
        assert!(q("My Movie", 0, 1001).validate().is_err());
        assert!(q("My Movie", 0, 1000).validate().is_ok());
        assert!(q("My Movie", MAX_SKIP, 0).validate().is_ok());
        assert!(q("My Movie", MAX_SKIP + 1, 0).validate().is_err());
    }

    #[test]
    fn update_request_maps_to_patch() {
        let body: UpdateMovieRequest =
            serde_json::from_value(serde_json::json!({ "watched": true, "title": null })).unwrap();
        let patch = MoviePatch::from(body);
        assert_eq!(patch.watched, Some(true));
        assert_eq!(patch.title, None);
    }
}
