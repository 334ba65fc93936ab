// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Escrow Relay - attestation relay for an external escrow ledger
//!
//! The relay sits between HTTP clients and the ledger that owns every escrow
//! transaction. It builds the canonical message for each lifecycle step,
//! signs it with the verifier or arbitrator identity and forwards exactly one
//! ledger call per request.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `attestation` - canonical messages, identities and signing policy
//! - `auth` - optional static bearer gate
//! - `ledger` - ledger RPC contract and JSON-RPC client
//! - `relay` - one ledger call per operation, with a bounded timeout

pub mod api;
pub mod attestation;
pub mod auth;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod relay;
pub mod state;
