// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Canonical attestation messages.
//!
//! The ledger re-derives these strings when it verifies a signature, so every
//! byte matters. Fields are joined with `-` in a fixed order per operation:
//!
//! | Operation | Message |
//! |-----------|---------|
//! | Staking   | `{principal}-{txId}-Staking-{vault}-{participant}-{timestamp}` |
//! | Trading   | `{principal}-{txId}-Trading` |
//! | Settling  | `{principal}-{txId}-Settling-{vault}-{participant}-{timestamp}` |
//! | Disputing | `{principal}-{txId}-Disputing-{participant}-{timestamp}` |
//! | Resolving | `{principal}-{txId}-Resolving-{amountA}-{amountB}-{timestamp}` |
//!
//! Amounts and timestamps are plain base-10 integers with no separators.
//! Timestamps are unix seconds.

use std::fmt;

/// Field delimiter expected by the ledger.
pub const DELIMITER: &str = "-";

/// A required field was empty when composing a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot build {operation} message: field `{field}` is empty")]
pub struct CanonicalizationError {
    pub operation: OperationKind,
    pub field: &'static str,
}

/// Lifecycle transitions that carry an attestation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Staking,
    Trading,
    Settling,
    Disputing,
    Resolving,
}

impl OperationKind {
    /// Tag embedded in the message.
    pub fn tag(self) -> &'static str {
        match self {
            OperationKind::Staking => "Staking",
            OperationKind::Trading => "Trading",
            OperationKind::Settling => "Settling",
            OperationKind::Disputing => "Disputing",
            OperationKind::Resolving => "Resolving",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Operation-specific fields, all mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation<'a> {
    Staking {
        vault_address: &'a str,
        participant_address: &'a str,
        timestamp: u64,
    },
    Trading,
    Settling {
        vault_address: &'a str,
        participant_address: &'a str,
        timestamp: u64,
    },
    Disputing {
        participant_address: &'a str,
        timestamp: u64,
    },
    Resolving {
        amount_a: u64,
        amount_b: u64,
        timestamp: u64,
    },
}

impl Operation<'_> {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Staking { .. } => OperationKind::Staking,
            Operation::Trading => OperationKind::Trading,
            Operation::Settling { .. } => OperationKind::Settling,
            Operation::Disputing { .. } => OperationKind::Disputing,
            Operation::Resolving { .. } => OperationKind::Resolving,
        }
    }
}

/// The exact string a signature is produced over.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalMessage {
    kind: OperationKind,
    text: String,
}

impl CanonicalMessage {
    /// Compose the message for `operation` on transaction `tx_id`.
    pub fn build(
        principal: &str,
        tx_id: &str,
        operation: Operation<'_>,
    ) -> Result<Self, CanonicalizationError> {
        let kind = operation.kind();
        let mut fields = Fields::new(kind);
        fields.text("principal", principal)?;
        fields.text("transactionId", tx_id)?;
        fields.tag();

        match operation {
            Operation::Staking {
                vault_address,
                participant_address,
                timestamp,
            }
            | Operation::Settling {
                vault_address,
                participant_address,
                timestamp,
            } => {
                fields.text("vaultAddress", vault_address)?;
                fields.text("participantAddress", participant_address)?;
                fields.integer(timestamp);
            }
            Operation::Trading => {}
            Operation::Disputing {
                participant_address,
                timestamp,
            } => {
                fields.text("participantAddress", participant_address)?;
                fields.integer(timestamp);
            }
            Operation::Resolving {
                amount_a,
                amount_b,
                timestamp,
            } => {
                fields.integer(amount_a);
                fields.integer(amount_b);
                fields.integer(timestamp);
            }
        }

        Ok(Self {
            kind,
            text: fields.finish(),
        })
    }

    pub fn staking(
        principal: &str,
        tx_id: &str,
        vault_address: &str,
        participant_address: &str,
        timestamp: u64,
    ) -> Result<Self, CanonicalizationError> {
        Self::build(
            principal,
            tx_id,
            Operation::Staking {
                vault_address,
                participant_address,
                timestamp,
            },
        )
    }

    pub fn trading(principal: &str, tx_id: &str) -> Result<Self, CanonicalizationError> {
        Self::build(principal, tx_id, Operation::Trading)
    }

    pub fn settling(
        principal: &str,
        tx_id: &str,
        vault_address: &str,
        participant_address: &str,
        timestamp: u64,
    ) -> Result<Self, CanonicalizationError> {
        Self::build(
            principal,
            tx_id,
            Operation::Settling {
                vault_address,
                participant_address,
                timestamp,
            },
        )
    }

    pub fn disputing(
        principal: &str,
        tx_id: &str,
        participant_address: &str,
        timestamp: u64,
    ) -> Result<Self, CanonicalizationError> {
        Self::build(
            principal,
            tx_id,
            Operation::Disputing {
                participant_address,
                timestamp,
            },
        )
    }

    pub fn resolving(
        principal: &str,
        tx_id: &str,
        amount_a: u64,
        amount_b: u64,
        timestamp: u64,
    ) -> Result<Self, CanonicalizationError> {
        Self::build(
            principal,
            tx_id,
            Operation::Resolving {
                amount_a,
                amount_b,
                timestamp,
            },
        )
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

impl fmt::Display for CanonicalMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for CanonicalMessage {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Accumulates delimited fields in order.
struct Fields {
    kind: OperationKind,
    parts: Vec<String>,
}

impl Fields {
    fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            parts: Vec::with_capacity(6),
        }
    }

    fn text(&mut self, field: &'static str, value: &str) -> Result<(), CanonicalizationError> {
        if value.trim().is_empty() {
            return Err(CanonicalizationError {
                operation: self.kind,
                field,
            });
        }
        self.parts.push(value.to_string());
        Ok(())
    }

    fn integer(&mut self, value: u64) {
        self.parts.push(value.to_string());
    }

    fn tag(&mut self) {
        self.parts.push(self.kind.tag().to_string());
    }

    fn finish(self) -> String {
        self.parts.join(DELIMITER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRINCIPAL: &str = "bkyz2-fmaaa-aaaaa-qaaaq-cai";
    const TX: &str = "tx-42";
    const VAULT: &str = "StakeVault_SolanaAddress";
    const PARTY_A: &str = "ParticipantA_SolanaAddress";
    const TS: u64 = 1_735_689_600;

    #[test]
    fn staking_golden() {
        let msg = CanonicalMessage::staking(PRINCIPAL, TX, VAULT, PARTY_A, TS).unwrap();
        assert_eq!(
            msg.as_str(),
            "bkyz2-fmaaa-aaaaa-qaaaq-cai-tx-42-Staking-StakeVault_SolanaAddress-ParticipantA_SolanaAddress-1735689600"
        );
        assert_eq!(msg.kind(), OperationKind::Staking);
    }

    #[test]
    fn trading_golden() {
        let msg = CanonicalMessage::trading(PRINCIPAL, TX).unwrap();
        assert_eq!(msg.as_str(), "bkyz2-fmaaa-aaaaa-qaaaq-cai-tx-42-Trading");
    }

    #[test]
    fn settling_golden() {
        let msg = CanonicalMessage::settling(PRINCIPAL, TX, VAULT, PARTY_A, TS).unwrap();
        assert_eq!(
            msg.as_str(),
            "bkyz2-fmaaa-aaaaa-qaaaq-cai-tx-42-Settling-StakeVault_SolanaAddress-ParticipantA_SolanaAddress-1735689600"
        );
    }

    #[test]
    fn disputing_golden() {
        let msg = CanonicalMessage::disputing(PRINCIPAL, TX, PARTY_A, TS).unwrap();
        assert_eq!(
            msg.as_str(),
            "bkyz2-fmaaa-aaaaa-qaaaq-cai-tx-42-Disputing-ParticipantA_SolanaAddress-1735689600"
        );
    }

    #[test]
    fn resolving_golden_has_no_grouping() {
        let msg =
            CanonicalMessage::resolving(PRINCIPAL, TX, 600_000_000, 400_000_000, TS).unwrap();
        assert_eq!(
            msg.as_str(),
            "bkyz2-fmaaa-aaaaa-qaaaq-cai-tx-42-Resolving-600000000-400000000-1735689600"
        );
        assert!(msg.as_str().ends_with("-600000000-400000000-1735689600"));
    }

    #[test]
    fn build_is_deterministic() {
        let op = Operation::Settling {
            vault_address: VAULT,
            participant_address: PARTY_A,
            timestamp: TS,
        };
        let first = CanonicalMessage::build(PRINCIPAL, TX, op).unwrap();
        for _ in 0..10 {
            let again = CanonicalMessage::build(PRINCIPAL, TX, op).unwrap();
            assert_eq!(again.as_bytes(), first.as_bytes());
        }
    }

    #[test]
    fn zero_values_render_as_plain_zero() {
        let msg = CanonicalMessage::resolving(PRINCIPAL, TX, 0, 0, 0).unwrap();
        assert!(msg.as_str().ends_with("-Resolving-0-0-0"));
    }

    #[test]
    fn empty_fields_are_rejected_before_signing() {
        let err = CanonicalMessage::trading(PRINCIPAL, "").unwrap_err();
        assert_eq!(
            err,
            CanonicalizationError {
                operation: OperationKind::Trading,
                field: "transactionId",
            }
        );

        let err = CanonicalMessage::staking(PRINCIPAL, TX, VAULT, "  ", TS).unwrap_err();
        assert_eq!(err.field, "participantAddress");
        assert_eq!(err.operation, OperationKind::Staking);

        let err = CanonicalMessage::settling(PRINCIPAL, TX, "", PARTY_A, TS).unwrap_err();
        assert_eq!(err.field, "vaultAddress");

        let err = CanonicalMessage::disputing("", TX, PARTY_A, TS).unwrap_err();
        assert_eq!(err.field, "principal");
    }

    #[test]
    fn error_message_names_operation_and_field() {
        let err = CanonicalMessage::disputing(PRINCIPAL, TX, "", TS).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot build Disputing message: field `participantAddress` is empty"
        );
    }
}
