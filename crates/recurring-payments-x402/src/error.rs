//! HTTP-facing error surface. Every failure maps to exactly one status:
//! 401 for bad credentials, 402 for anything the client can fix by paying
//! (or paying correctly), 500 for our own faults.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum X402Error {
    #[error("{0}")]
    Config(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{error}")]
    PaymentRequired {
        error: String,
        details: Option<Value>,
    },
    #[error("{0}")]
    Internal(String),
}

impl X402Error {
    pub fn payment_required(error: impl Into<String>) -> Self {
        X402Error::PaymentRequired {
            error: error.into(),
            details: None,
        }
    }
}

impl IntoResponse for X402Error {
    fn into_response(self) -> Response {
        match self {
            X402Error::Unauthorized(error) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": error }))).into_response()
            }
            X402Error::PaymentRequired { error, details } => {
                let mut body = json!({ "error": error });
                if let Some(details) = details {
                    body["details"] = details;
                }
                (StatusCode::PAYMENT_REQUIRED, Json(body)).into_response()
            }
            X402Error::Config(error) | X402Error::Internal(error) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": error })),
            )
                .into_response(),
        }
    }
}
