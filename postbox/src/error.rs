use crate::service::ServiceError;
use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

/// Errors returned to HTTP clients. The message is the whole response body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Please submit a post request")]
    MethodNotAllowed,
    #[error("{0}")]
    BadRequest(&'static str),
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        error!(error = %err, "request failed");
        match err {
            ServiceError::InvalidPayload(_) => ApiError::BadRequest("Invalid post payload"),
            ServiceError::Store(StoreError::Write { .. } | StoreError::Serialize(_)) => {
                ApiError::Internal("Error saving posts")
            }
            ServiceError::Store(_) => ApiError::Internal("Error reading posts"),
        }
    }
}
