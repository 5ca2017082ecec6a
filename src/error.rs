//! Upload and ingestion failures surfaced to HTTP clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

/// Reasons an uploaded statement is rejected outright. Anything recoverable
/// (an odd row, an unmatched description) is skipped and reported instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("no file uploaded")]
    MissingFile,

    #[error("not a .csv file: {0:?}")]
    InvalidExtension(String),

    #[error("statement header missing column(s): {0}")]
    SchemaMismatch(String),

    #[error("could not parse statement: {0}")]
    ParseFailure(String),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, UploadError>;
