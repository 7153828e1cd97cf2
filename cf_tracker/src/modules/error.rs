use crate::modules::bookmarks::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cf_tracker_libs::CodeforcesError;
use serde_json::json;
use thiserror::Error;

/// Errors as seen by API clients.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("{0}")]
    NotFound(String),
    #[error("Codeforces API error: {0}")]
    Upstream(String),
    #[error("Codeforces API is unreachable: {0}")]
    Transport(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Internal(String),
}

impl TrackerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TrackerError::NotFound(_) => StatusCode::NOT_FOUND,
            TrackerError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TrackerError::Upstream(_) | TrackerError::Transport(_) | TrackerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<CodeforcesError> for TrackerError {
    fn from(value: CodeforcesError) -> Self {
        match value {
            CodeforcesError::NotFoundError(comment) => TrackerError::NotFound(comment),
            CodeforcesError::UpstreamError(comment) => TrackerError::Upstream(comment),
            CodeforcesError::RequestError(e) => TrackerError::Transport(e.to_string()),
            CodeforcesError::DeserializeError(e) => TrackerError::Upstream(e.to_string()),
            CodeforcesError::InvalidUrlError(e) => TrackerError::Internal(e.to_string()),
        }
    }
}

impl From<StoreError> for TrackerError {
    fn from(value: StoreError) -> Self {
        TrackerError::Internal(value.to_string())
    }
}

impl IntoResponse for TrackerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed cause: {}", self);
        }

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
