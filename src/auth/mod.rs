// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Optional static bearer gate in front of the escrow endpoints.
//!
//! ## Auth Flow
//!
//! 1. Caller sends `Authorization: Bearer <token>` (scheme is case-insensitive)
//! 2. The token is trimmed and compared in constant time with `AUTH_TOKEN`
//! 3. On mismatch the request is answered with 401 before any handler runs,
//!    so no ledger call is made
//!
//! `/health` and `/docs` are mounted outside the gate.

pub mod error;
pub mod middleware;

pub use error::AuthError;
pub use middleware::{require_bearer, AuthGate};
