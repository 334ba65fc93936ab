// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the HTTP surface. Field names are the
//! camelCase names clients already send, e.g. `participantSolanaAddress`.
//!
//! ## Numeric Inputs
//!
//! USDC amounts (micro units) and durations (seconds) accept either a JSON
//! number or a base-10 string, see [`Amount`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::attestation::SignatureSlot;
use crate::ledger::EscrowMode;

pub const DEFAULT_COMMENTS: &str = "normal transaction";
pub const DEFAULT_STAKE_DURATION: u64 = 86_400;
pub const DEFAULT_TRADE_DURATION: u64 = 604_800;

// =============================================================================
// Numeric Input
// =============================================================================

/// Unsigned integer sent as a number or as a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Amount {
    Number(u64),
    Text(String),
}

impl Amount {
    pub fn value(&self) -> Result<u64, std::num::ParseIntError> {
        match self {
            Amount::Number(n) => Ok(*n),
            Amount::Text(s) => s.trim().parse(),
        }
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount::Number(value)
    }
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InitializeRequest {
    #[serde(rename = "participantASolanaAddress")]
    pub participant_a_address: String,
    #[serde(rename = "participantBSolanaAddress")]
    pub participant_b_address: String,
    #[serde(rename = "participantAShouldStakeUSDCAmount")]
    pub participant_a_stake_amount: Amount,
    #[serde(rename = "participantBShouldStakeUSDCAmount")]
    pub participant_b_stake_amount: Amount,
    /// `Mutual` or `Settlement`; anything else means `Settlement`.
    #[serde(default)]
    pub escrow_mode: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub stake_duration: Option<Amount>,
    #[serde(default)]
    pub trade_duration: Option<Amount>,
}

impl InitializeRequest {
    pub fn escrow_mode(&self) -> EscrowMode {
        match self.escrow_mode.as_deref() {
            Some("Mutual") => EscrowMode::Mutual,
            _ => EscrowMode::Settlement,
        }
    }

    pub fn comments(&self) -> String {
        match self.comments.as_deref() {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => DEFAULT_COMMENTS.to_string(),
        }
    }
}

/// Body of `/confirmStaking` and `/confirmSettling`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VaultConfirmationRequest {
    pub transaction_id: String,
    #[serde(rename = "participantSolanaAddress")]
    pub participant_address: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmTradingRequest {
    pub transaction_id: String,
    #[serde(default, rename = "participantASignature")]
    pub participant_a_signature: Option<String>,
    #[serde(default, rename = "participantBSignature")]
    pub participant_b_signature: Option<String>,
}

impl ConfirmTradingRequest {
    pub fn signatures(&self) -> (SignatureSlot, SignatureSlot) {
        (
            self.participant_a_signature.clone().into(),
            self.participant_b_signature.clone().into(),
        )
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InitiateDisputeRequest {
    pub transaction_id: String,
    #[serde(rename = "participantSolanaAddress")]
    pub participant_address: String,
    #[serde(default)]
    pub participant_signature: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveDisputeRequest {
    pub transaction_id: String,
    pub comments: String,
    #[serde(rename = "participantAWithdrawableUSDCAmount")]
    pub participant_a_withdrawable_amount: Amount,
    #[serde(rename = "participantBWithdrawableUSDCAmount")]
    pub participant_b_withdrawable_amount: Amount,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionIdRequest {
    pub transaction_id: String,
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TxIdResponse {
    pub tx_id: String,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PrincipalResponse {
    pub principal: String,
}

/// Schnorr public key as returned by the ledger.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublicKeyResponse {
    #[schema(value_type = Object)]
    pub key: Value,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SignatureResponse {
    #[schema(value_type = Object)]
    pub signature: Value,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ContentResponse {
    #[schema(value_type = Object)]
    pub content: Value,
}
