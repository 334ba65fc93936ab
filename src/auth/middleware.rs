// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer authentication middleware for Axum.
//!
//! ```rust,ignore
//! let gate = AuthGate::bearer("secret");
//! let app = Router::new()
//!     .route("/protected", post(handler))
//!     .route_layer(axum::middleware::from_fn_with_state(gate, require_bearer));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use super::AuthError;
use crate::config::AuthSetting;

const BEARER_PREFIX: &str = "bearer ";

/// Immutable gate shared by all requests. `None` lets everything through.
#[derive(Clone, Default)]
pub struct AuthGate {
    token: Option<Arc<str>>,
}

impl AuthGate {
    pub fn disabled() -> Self {
        Self { token: None }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(Arc::from(token.into())),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.token.is_some()
    }

    /// Check the `Authorization` header against the configured token.
    pub fn check(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let Some(expected) = self.token.as_deref() else {
            return Ok(());
        };

        let presented = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or(AuthError::MissingToken)?;

        if bool::from(presented.as_bytes().ct_eq(expected.as_bytes())) {
            Ok(())
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}

impl From<&AuthSetting> for AuthGate {
    fn from(setting: &AuthSetting) -> Self {
        match setting {
            AuthSetting::Disabled => AuthGate::disabled(),
            AuthSetting::Bearer(token) => AuthGate::bearer(token.clone()),
        }
    }
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// Token after a case-insensitive `Bearer ` scheme, trimmed.
fn bearer_token(header: &str) -> Option<&str> {
    let scheme = header.get(..BEARER_PREFIX.len())?;
    if !scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
        return None;
    }
    Some(header[BEARER_PREFIX.len()..].trim())
}

/// Rejects the request with 401 unless the gate accepts it.
pub async fn require_bearer(
    State(gate): State<AuthGate>,
    request: Request,
    next: Next,
) -> Response {
    match gate.check(request.headers()) {
        Ok(()) => next.run(request).await,
        Err(e) => {
            tracing::warn!(
                path = %request.uri().path(),
                error_code = e.error_code(),
                "Rejected unauthenticated request"
            );
            e.into_response()
        }
    }
}
