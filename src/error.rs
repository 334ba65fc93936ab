// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::ledger::LedgerError;
use crate::relay::RelayError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "not found")
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, message)
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::Attestation(e) => ApiError::bad_request(e.to_string()),
            RelayError::Remote(e @ LedgerError::Rejected { .. }) => {
                ApiError::bad_gateway(e.to_string())
            }
            RelayError::Remote(e) => {
                tracing::error!(error = %e, "Ledger unavailable");
                ApiError::bad_gateway(e.to_string())
            }
            e @ RelayError::RemoteTimeout { .. } => ApiError::gateway_timeout(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        ApiError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attestation::{AttestationError, CanonicalMessage};
    use axum::body::to_bytes;
    use std::time::Duration;

    #[test]
    fn relay_errors_map_to_statuses() {
        let canonical = CanonicalMessage::trading("", "tx").unwrap_err();
        let err = ApiError::from(RelayError::Attestation(AttestationError::from(canonical)));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = ApiError::from(RelayError::Remote(LedgerError::Rejected {
            code: None,
            message: "Invalid signature".into(),
        }));
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(err.message, "Invalid signature");

        let err = ApiError::from(RelayError::Remote(LedgerError::Transport("refused".into())));
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);

        let err = ApiError::from(RelayError::RemoteTimeout {
            operation: "initialize",
            after: Duration::from_secs(30),
        });
        assert_eq!(err.status, StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::not_found().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"not found"}"#);
    }
}
