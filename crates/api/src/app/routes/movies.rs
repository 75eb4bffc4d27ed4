use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Extension, Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use movietrack_core::{Movie, MovieId, MoviePatch};
use movietrack_infra::MovieUpdate;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_movie).get(list_movies))
        .route("/:id", get(get_movie).patch(update_movie).delete(delete_movie))
}

pub async fn create_movie(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateMovieRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_error(e.status(), "invalid_body", e.body_text()),
    };
    if let Err(msg) = body.validate() {
        return errors::validation_error(msg);
    }

    let id = MovieId::generate();
    let movie = match Movie::new(
        id.clone(),
        body.title,
        body.description,
        body.release_year,
        body.watched,
    ) {
        Ok(m) => m,
        Err(e) => return errors::validation_error(e.to_string()),
    };

    if let Err(e) = services.movies().create(movie).await {
        return errors::repository_error_to_response(e);
    }

    (
        StatusCode::CREATED,
        Json(dto::MovieCreatedResponse { id: id.into_inner() }),
    )
        .into_response()
}

pub async fn get_movie(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let movie_id = match errors::parse_movie_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.movies().get_by_id(&movie_id).await {
        Ok(Some(movie)) => (StatusCode::OK, Json(dto::MovieResponse::from(movie))).into_response(),
        Ok(None) => errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("Movie: {movie_id} not found"),
        ),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn list_movies(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::ListMoviesQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => return errors::validation_error(e.body_text()),
    };
    let page = match query.validate() {
        Ok(p) => p,
        Err(msg) => return errors::validation_error(msg),
    };

    match services.movies().get_by_title(&query.title, page).await {
        Ok(movies) => {
            let items = movies
                .into_iter()
                .map(dto::MovieResponse::from)
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn update_movie(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateMovieRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_error(e.status(), "invalid_body", e.body_text()),
    };

    let movie_id = match errors::parse_movie_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let params = MovieUpdate::from(MoviePatch::from(body));

    match services.movies().update(&movie_id, params).await {
        Ok(()) => (
            StatusCode::OK,
            Json(dto::DetailResponse {
                message: format!("Movie: {movie_id} updated successfully"),
            }),
        )
            .into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn delete_movie(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let movie_id = match errors::parse_movie_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.movies().delete(&movie_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}
