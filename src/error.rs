use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    InvalidRequest(String),
    #[error("cache unavailable: {0}")]
    Cache(#[from] redis::RedisError),
    #[error("search index unavailable: {0}")]
    Index(#[from] reqwest::Error),
    #[error("malformed index document: {0}")]
    Document(#[from] serde_json::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Cache(_) | AppError::Index(_) => StatusCode::BAD_GATEWAY,
            AppError::Document(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
