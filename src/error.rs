use axum::http::StatusCode;

use crate::services::validation::ValidationErrors;

/// Non-standard "Page Expired" status for a rejected anti-forgery token.
pub const TOKEN_MISMATCH_STATUS: u16 = 419;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    TokenMismatch(String),
    Validation(ValidationErrors),
    /// Any other status, e.g. a framework rejection passed through unchanged.
    Http {
        status: StatusCode,
        message: String,
    },
    Internal(String),
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            StatusCode::BAD_REQUEST => Self::BadRequest(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::INTERNAL_SERVER_ERROR => Self::Internal(message),
            status if status.as_u16() == TOKEN_MISMATCH_STATUS => Self::TokenMismatch(message),
            status => Self::Http { status, message },
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn token_mismatch() -> Self {
        Self::TokenMismatch("CSRF token mismatch".to_string())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Logs `source` and keeps only `message` for the client.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl std::error::Error,
    ) -> Self {
        let message = message.into();
        tracing::error!(error = %source, "{message}");
        Self::Internal(message)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::TokenMismatch(_) => {
                StatusCode::from_u16(TOKEN_MISMATCH_STATUS).unwrap_or(StatusCode::FORBIDDEN)
            }
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Http { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::BadRequest(message)
            | Self::NotFound(message)
            | Self::TokenMismatch(message)
            | Self::Http { message, .. }
            | Self::Internal(message) => message.clone(),
            Self::Validation(errors) => errors.summary(),
        }
    }

    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}
