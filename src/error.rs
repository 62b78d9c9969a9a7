use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::database::DatabaseError;

/// Route-boundary error. Every handler failure funnels through here and
/// leaves the process as `{ "error": message }` with a matching status.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error")]
    Database(#[from] DatabaseError),

    #[error("Internal error")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {self:?}");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl ApiError {
    /// Database lookups that miss become 404s instead of 500s.
    pub fn from_lookup(err: DatabaseError, what: &str) -> Self {
        match err {
            DatabaseError::Sqlx(sqlx::Error::RowNotFound) => ApiError::NotFound(what.to_string()),
            other => ApiError::Database(other),
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
