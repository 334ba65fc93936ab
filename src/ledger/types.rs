// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ledger call arguments.

use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::attestation::SignatureSlot;

/// Method names exposed by the ledger.
pub mod methods {
    pub const INITIALIZE: &str = "initialize";
    pub const CONFIRM_STAKING_COMPLETE: &str = "confirmStakingComplete";
    pub const CONFIRM_TRADING_COMPLETE: &str = "confirmTradingComplete";
    pub const CONFIRM_SETTLING_COMPLETE: &str = "confirmSettlingComplete";
    pub const INITIATE_DISPUTE: &str = "initiateDispute";
    pub const RESOLVE_DISPUTE: &str = "resolveDispute";
    pub const SIGN_WITH_SCHNORR: &str = "signWithSchnorr";
    pub const GET_TRANSACTION_DETAILS: &str = "getTransactionDetails";
    pub const GET_PROOF_DETAILS: &str = "getProofDetails";
    pub const GET_SIGN_WITH_SCHNORR_CONTENT: &str = "getSignWithSchnorrContent";
    pub const GET_PRINCIPAL: &str = "getThisCanisterPrincipalText";
    pub const GET_SCHNORR_PUBLIC_KEY: &str = "getSchnorrPublicKey";
}

/// How staked funds are distributed once the escrow settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscrowMode {
    /// Party A's stake is transferred to party B.
    #[default]
    Settlement,
    /// Each party's stake returns to its owner.
    Mutual,
}

impl EscrowMode {
    pub fn as_str(self) -> &'static str {
        match self {
            EscrowMode::Settlement => "Settlement",
            EscrowMode::Mutual => "Mutual",
        }
    }
}

/// Variants go over the wire as single-key objects, e.g. `{"Mutual": null}`.
impl Serialize for EscrowMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.as_str(), &())?;
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeArgs {
    pub escrow_mode: EscrowMode,
    pub comments: String,
    pub participant_a_address: String,
    pub participant_b_address: String,
    pub participant_a_stake_amount: u64,
    pub participant_b_stake_amount: u64,
    pub verifier_public_key: String,
    pub arbitrator_public_key: String,
    /// Seconds before the staking phase times out.
    pub stake_duration: u64,
    /// Seconds before the trading phase times out.
    pub trade_duration: u64,
}

/// Verifier-signed staking or settling confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultConfirmation {
    pub transaction_id: String,
    pub vault_address: String,
    pub participant_address: String,
    pub timestamp: u64,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeConfirmation {
    pub transaction_id: String,
    pub participant_a_signature: SignatureSlot,
    pub participant_b_signature: SignatureSlot,
    pub verifier_signature: SignatureSlot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeInitiation {
    pub transaction_id: String,
    pub participant_address: String,
    pub timestamp: u64,
    pub participant_signature: SignatureSlot,
    pub verifier_signature: SignatureSlot,
}

/// Arbitrator-signed withdrawable split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeResolution {
    pub transaction_id: String,
    pub comments: String,
    pub participant_a_withdrawable_amount: u64,
    pub participant_b_withdrawable_amount: u64,
    pub timestamp: u64,
    pub signature: String,
}

/// Single transaction-id argument used by the query methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRef<'a> {
    pub transaction_id: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn escrow_mode_serializes_as_variant_object() {
        assert_eq!(
            serde_json::to_value(EscrowMode::Mutual).unwrap(),
            json!({"Mutual": null})
        );
        assert_eq!(
            serde_json::to_value(EscrowMode::default()).unwrap(),
            json!({"Settlement": null})
        );
    }

    #[test]
    fn trade_confirmation_uses_optional_arrays() {
        let args = TradeConfirmation {
            transaction_id: "tx1".into(),
            participant_a_signature: SignatureSlot::Absent,
            participant_b_signature: SignatureSlot::Absent,
            verifier_signature: SignatureSlot::Supplied("sig".into()),
        };
        assert_eq!(
            serde_json::to_value(&args).unwrap(),
            json!({
                "transactionId": "tx1",
                "participantASignature": [],
                "participantBSignature": [],
                "verifierSignature": ["sig"],
            })
        );
    }
}
