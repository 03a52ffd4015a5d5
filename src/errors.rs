use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{repositories::RepositoryError, response::ErrorResponse};

pub const MSG_TITLE_IN_USE: &str = "title is already in use";
pub const MSG_FETCH_FAILED: &str = "failed to get page content";
pub const MSG_NOTHING_SCRAPED: &str = "failed to scrape any article content";
pub const MSG_NOT_FOUND: &str = "no article found with given id";
pub const MSG_FORBIDDEN: &str = "forbidden access";
pub const MSG_DELETE_FAILED: &str = "failed to delete article";
pub const MSG_TIMEOUT: &str = "timed out fetching page content";
pub const MSG_SERVER_ERROR: &str = "internal server error";

/// The closed set of failures the bookmark service hands back to callers.
///
/// Messages are user-facing. Lower-level errors are logged where they are
/// translated and never copied into these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Timeout(String),

    #[error("{0}")]
    ServerError(String),
}

impl ServiceError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn server_error() -> Self {
        Self::ServerError(MSG_SERVER_ERROR.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateTitle => Self::BadRequest(MSG_TITLE_IN_USE.to_string()),
            RepositoryError::NotFound => Self::NotFound(MSG_NOT_FOUND.to_string()),
            RepositoryError::Forbidden => Self::Forbidden(MSG_FORBIDDEN.to_string()),
            RepositoryError::NothingDeleted => Self::BadRequest(MSG_DELETE_FAILED.to_string()),
            RepositoryError::Database(_) => Self::server_error(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
