use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use movietrack_core::MovieId;
use movietrack_infra::RepositoryError;

pub fn repository_error_to_response(err: RepositoryError) -> axum::response::Response {
    if err.is_rejection() {
        let code = match err {
            RepositoryError::NotFound(_) => "not_found",
            RepositoryError::IdentityChange => "identity_change",
            _ => "invalid_field",
        };
        return json_error(StatusCode::BAD_REQUEST, code, err.to_string());
    }

    tracing::error!(error = %err, "repository failure");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "repository_error",
        "internal storage error",
    )
}

pub fn parse_movie_id(s: &str) -> Result<MovieId, axum::response::Response> {
    s.parse::<MovieId>()
        .map_err(|e| validation_error(e.to_string()))
}

pub fn validation_error(message: impl Into<String>) -> axum::response::Response {
    json_error(StatusCode::UNPROCESSABLE_ENTITY, "validation_error", message)
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
