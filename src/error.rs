//! Error types for request handling.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::io;
use thiserror::Error;
use tracing::error;

/// Failures a request can end in, each mapped to one HTTP status.
///
/// Messages of `Io` and `Parse` stay in the logs; clients only see a generic
/// text so host paths never leak.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing, unknown or expired session token
    #[error("Authentication required")]
    Unauthorized,

    /// Login with an unknown user or wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Resolved path lies outside the library root
    #[error("Access denied: path outside base directory")]
    PathEscape,

    /// Directory or file does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Missing or malformed request input
    #[error("{0}")]
    BadRequest(String),

    /// Byte range starts past the end of the file
    #[error("Requested range not satisfiable")]
    RangeNotSatisfiable { size: u64 },

    /// Unexpected filesystem failure
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),

    /// Sidecar file is not valid JSON
    #[error("Invalid transcript JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Classify an I/O error, turning a missing path into a 404 for `what`.
    pub fn from_io(err: io::Error, what: &'static str) -> Self {
        if is_missing(&err) {
            Self::NotFound(what)
        } else {
            Self::Io(err)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::PathEscape => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::RangeNotSatisfiable { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
            Self::Io(_) | Self::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Io(_) => "Failed to read from the library".to_string(),
            Self::Parse(_) => "Failed to read transcript file".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = Json(ErrorResponse {
            error: self.public_message(),
        });

        match self {
            Self::RangeNotSatisfiable { size } => (
                status,
                [(header::CONTENT_RANGE, format!("bytes */{}", size))],
                body,
            )
                .into_response(),
            _ => (status, body).into_response(),
        }
    }
}

/// True when `err` means the path does not exist, including a path that
/// walks through a regular file (`take1.flac/x`).
pub fn is_missing(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}
