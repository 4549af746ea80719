use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed for {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email already exists")]
    EmailAlreadyExists,

    #[error("invalid token")]
    InvalidToken,

    /// Signature verified but the token is past `exp`. Collapsed with
    /// `InvalidToken` on the wire.
    #[error("token has expired")]
    ExpiredToken,

    /// Ownership mismatch or missing resource. Rendered as 404 so callers
    /// cannot probe for other users' resources.
    #[error("access denied")]
    AccessDenied,

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("password hashing error: {0}")]
    PasswordHash(#[from] argon2::password_hash::Error),

    #[error("token signing error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken | AppError::ExpiredToken => {
                StatusCode::UNAUTHORIZED
            }
            AppError::EmailAlreadyExists => StatusCode::CONFLICT,
            AppError::AccessDenied => StatusCode::NOT_FOUND,
            AppError::Storage(_)
            | AppError::PasswordHash(_)
            | AppError::Jwt(_)
            | AppError::Task(_)
            | AppError::Metrics(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client. Never carries collaborator details.
    fn public_message(&self) -> String {
        match self {
            AppError::Validation { .. } => self.to_string(),
            AppError::InvalidCredentials => "Invalid email or password".to_string(),
            AppError::EmailAlreadyExists => "Email already exists".to_string(),
            AppError::InvalidToken | AppError::ExpiredToken => {
                "Invalid or expired token".to_string()
            }
            AppError::AccessDenied => "Resource not found".to_string(),
            AppError::Storage(_)
            | AppError::PasswordHash(_)
            | AppError::Jwt(_)
            | AppError::Task(_)
            | AppError::Metrics(_) => "Internal server error".to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::validation("body", rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::validation("path", rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Storage(_)
            | AppError::PasswordHash(_)
            | AppError::Jwt(_)
            | AppError::Task(_)
            | AppError::Metrics(_) => tracing::error!(error = %self, "request failed"),
            AppError::InvalidToken | AppError::ExpiredToken => {
                tracing::debug!(reason = %self, "rejected bearer token")
            }
            _ => {}
        }

        let body = Json(json!({
            "error": self.public_message(),
        }));

        (status, body).into_response()
    }
}
