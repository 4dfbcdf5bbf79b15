use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{cast::CastResolutionError, token::AuthError};

/// Rejected request input. Always detected before anything is written.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("`{0}` is required")]
    Missing(&'static str),

    #[error("`{0}` must not be empty")]
    Empty(&'static str),

    #[error("`{0}` must be a positive integer")]
    NotPositive(&'static str),

    #[error("`imdb_rating` must be between 0 and 10, got {0}")]
    RatingOutOfRange(f64),

    #[error("`date_of_birth` is not a recognised date: {0:?}")]
    InvalidDate(String),

    #[error("request does not contain any updatable field")]
    NoChanges,

    #[error("malformed field: {0}")]
    Malformed(String),

    #[error(transparent)]
    Cast(#[from] CastResolutionError),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("authentication failed: {0}")]
    Unauthenticated(#[from] AuthError),

    #[error("missing permission `{0}`")]
    Forbidden(&'static str),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("resource not found")]
    NotFound,

    #[error("method not allowed")]
    MethodNotSupported,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("storage fault: {0}")]
    Storage(#[from] sea_orm::DbErr),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            // A verified token that carries no permission claim is malformed, not anonymous.
            AppError::Unauthenticated(AuthError::MissingPermissions) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotSupported => StatusCode::METHOD_NOT_ALLOWED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self.status() {
            StatusCode::BAD_REQUEST => "bad request",
            StatusCode::UNAUTHORIZED => "unauthorized",
            StatusCode::FORBIDDEN => "forbidden",
            StatusCode::NOT_FOUND => "resource not found",
            StatusCode::METHOD_NOT_ALLOWED => "method not allowed",
            StatusCode::UNPROCESSABLE_ENTITY => "unprocessable",
            _ => "internal server error",
        }
    }

    /// Client-facing explanation. Storage faults never expose one.
    fn detail(&self) -> Option<String> {
        match self {
            AppError::Unauthenticated(err) => Some(err.to_string()),
            AppError::Validation(err) => Some(err.to_string()),
            AppError::BadRequest(reason) => Some(reason.clone()),
            _ => None,
        }
    }
}

impl From<CastResolutionError> for AppError {
    fn from(err: CastResolutionError) -> Self {
        AppError::Validation(ValidationError::Cast(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                AppError::Validation(ValidationError::Malformed(err.body_text()))
            },
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(_: PathRejection) -> Self {
        AppError::NotFound
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }

        let mut body = json!({
            "success": false,
            "error": status.as_u16(),
            "message": self.message(),
        });
        if let Some(detail) = self.detail() {
            body["detail"] = json!(detail);
        }

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
