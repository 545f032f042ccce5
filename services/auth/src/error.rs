use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use portfolio_core::error::{error_response, log_server_error};

/// Auth service domain error variants.
///
/// Display strings are shown verbatim by the admin login UI.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("Unauthorized email address")]
    UnauthorizedIdentity,
    #[error("Failed to send verification code")]
    DeliveryFailed(#[source] anyhow::Error),
    #[error("No verification code found")]
    CodeNotFound,
    #[error("Verification code expired")]
    CodeExpired,
    #[error("Invalid verification code")]
    CodeMismatch,
    #[error("invalid session")]
    InvalidSession,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnauthorizedIdentity => "UNAUTHORIZED_IDENTITY",
            Self::DeliveryFailed(_) => "DELIVERY_FAILED",
            Self::CodeNotFound => "CODE_NOT_FOUND",
            Self::CodeExpired => "CODE_EXPIRED",
            Self::CodeMismatch => "CODE_MISMATCH",
            Self::InvalidSession => "INVALID_SESSION",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::UnauthorizedIdentity
            | Self::CodeNotFound
            | Self::CodeExpired
            | Self::CodeMismatch => StatusCode::BAD_REQUEST,
            Self::InvalidSession => StatusCode::UNAUTHORIZED,
            Self::DeliveryFailed(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        // 4xx are recorded by the trace layer; 500s need the cause chain.
        if let Self::DeliveryFailed(ref e) | Self::Internal(ref e) = self {
            log_server_error(self.kind(), &format_args!("{e:#}"));
        }
        error_response(self.status(), self.kind(), self.to_string())
    }
}
