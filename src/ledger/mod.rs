// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Escrow ledger RPC contract.
//!
//! The ledger owns all escrow state: it enforces timeouts, moves balances and
//! verifies every attestation. This module only describes the calls the relay
//! makes. Implementations hold no state beyond a connection handle, never
//! retry and never cache; results and rejections are passed through as-is.

pub mod client;
pub mod types;

#[cfg(test)]
pub mod testing;

use async_trait::async_trait;
use serde_json::Value;

pub use client::HttpLedger;
pub use types::*;

/// Errors from a single ledger round trip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The ledger answered and refused the call. The message is the ledger's own.
    #[error("{message}")]
    Rejected { code: Option<i64>, message: String },

    #[error("ledger unreachable: {0}")]
    Transport(String),

    #[error("ledger call timed out")]
    Timeout,

    #[error("unexpected ledger response: {0}")]
    Decode(String),
}

/// One method per ledger operation.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Create an escrow transaction and return its identifier.
    async fn initialize(&self, args: &InitializeArgs) -> Result<String, LedgerError>;

    async fn confirm_staking_complete(
        &self,
        args: &VaultConfirmation,
    ) -> Result<Value, LedgerError>;

    async fn confirm_trading_complete(
        &self,
        args: &TradeConfirmation,
    ) -> Result<Value, LedgerError>;

    async fn confirm_settling_complete(
        &self,
        args: &VaultConfirmation,
    ) -> Result<Value, LedgerError>;

    async fn initiate_dispute(&self, args: &DisputeInitiation) -> Result<Value, LedgerError>;

    async fn resolve_dispute(&self, args: &DisputeResolution) -> Result<Value, LedgerError>;

    /// Ask the ledger to threshold-sign the settlement payload of a transaction.
    async fn sign_with_schnorr(&self, tx_id: &str) -> Result<Value, LedgerError>;

    async fn get_transaction_details(&self, tx_id: &str) -> Result<Value, LedgerError>;

    /// Proof payload as a JSON string; empty when the transaction has none.
    async fn get_proof_details(&self, tx_id: &str) -> Result<String, LedgerError>;

    async fn get_sign_with_schnorr_content(&self, tx_id: &str) -> Result<Value, LedgerError>;

    /// The ledger's own principal, embedded in every canonical message.
    async fn get_principal(&self) -> Result<String, LedgerError>;

    /// Public key of the ledger's threshold Schnorr signer.
    async fn get_public_key(&self) -> Result<Value, LedgerError>;
}
