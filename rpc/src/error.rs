//! RPC error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use linkgate_verification::VerificationError;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("server error: {0}")]
    Server(String),
}

impl RpcError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Verification(e) => match e {
                VerificationError::CryptoUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                VerificationError::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
                VerificationError::NotFound(_) => StatusCode::NOT_FOUND,
                VerificationError::NotVerified(_) => StatusCode::FORBIDDEN,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            // Lookups of unknown domains answer with a status document, not an error.
            Self::Verification(VerificationError::NotFound(domain)) => json!({
                "domain": domain,
                "verified": false,
            }),
            Self::Verification(e) => json!({
                "error": e.to_string(),
                "code": e.code(),
            }),
            other => json!({ "error": other.to_string() }),
        };
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        }
        (status, Json(body)).into_response()
    }
}
