// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Which party attests to each lifecycle transition.
//!
//! - Staking and settling are always signed by the verifier.
//! - Trading completion and dispute initiation are dual-path: participant
//!   signatures are forwarded only when every required one is supplied;
//!   otherwise the verifier signs alone and all participant slots are sent
//!   empty. A mix of participant and verifier signatures is never produced.
//! - Dispute resolution is always signed by the arbitrator. Caller-supplied
//!   signatures are not accepted for it.

use std::sync::Arc;

use serde::{ser::SerializeSeq, Serialize, Serializer};

use super::canonical::{CanonicalMessage, CanonicalizationError};
use super::keystore::Identity;
use super::signer::{self, SignerError};

/// Who produced an attestation signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerRole {
    Verifier,
    Arbitrator,
    Participant,
}

impl std::fmt::Display for SignerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SignerRole::Verifier => "verifier",
            SignerRole::Arbitrator => "arbitrator",
            SignerRole::Participant => "participant",
        })
    }
}

/// A signature together with the message it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attestation {
    pub message: CanonicalMessage,
    pub signature: String,
    pub signer: SignerRole,
}

/// An optional signature argument.
///
/// Serializes with the ledger's optional-value convention: `[]` when absent,
/// `["<signature>"]` when supplied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SignatureSlot {
    Supplied(String),
    #[default]
    Absent,
}

impl SignatureSlot {
    pub fn is_supplied(&self) -> bool {
        matches!(self, SignatureSlot::Supplied(_))
    }

    pub fn as_deref(&self) -> Option<&str> {
        match self {
            SignatureSlot::Supplied(signature) => Some(signature),
            SignatureSlot::Absent => None,
        }
    }
}

/// Empty and whitespace-only strings count as absent.
impl From<Option<String>> for SignatureSlot {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(signature) if !signature.trim().is_empty() => SignatureSlot::Supplied(signature),
            _ => SignatureSlot::Absent,
        }
    }
}

impl Serialize for SignatureSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SignatureSlot::Supplied(signature) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(signature)?;
                seq.end()
            }
            SignatureSlot::Absent => serializer.serialize_seq(Some(0))?.end(),
        }
    }
}

/// Outcome of a dual-path attestation over `N` participant slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endorsement<const N: usize> {
    /// Every participant signed; forwarded verbatim.
    Participants([String; N]),
    /// At least one participant signature was missing; the verifier signs.
    Verifier(Attestation),
}

impl<const N: usize> Endorsement<N> {
    /// Participant slots as sent to the ledger.
    pub fn participant_slots(&self) -> [SignatureSlot; N] {
        match self {
            Endorsement::Participants(signatures) => {
                signatures.clone().map(SignatureSlot::Supplied)
            }
            Endorsement::Verifier(_) => std::array::from_fn(|_| SignatureSlot::Absent),
        }
    }

    /// Verifier slot as sent to the ledger.
    pub fn verifier_slot(&self) -> SignatureSlot {
        match self {
            Endorsement::Participants(_) => SignatureSlot::Absent,
            Endorsement::Verifier(attestation) => {
                SignatureSlot::Supplied(attestation.signature.clone())
            }
        }
    }

    pub fn signer(&self) -> SignerRole {
        match self {
            Endorsement::Participants(_) => SignerRole::Participant,
            Endorsement::Verifier(attestation) => attestation.signer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttestationError {
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),

    #[error(transparent)]
    Signer(#[from] SignerError),
}

/// Produces attestations with the relay-held identities.
#[derive(Debug, Clone)]
pub struct AttestationPolicy {
    principal: String,
    vault_address: String,
    verifier: Arc<Identity>,
    arbitrator: Arc<Identity>,
}

impl AttestationPolicy {
    pub fn new(
        principal: impl Into<String>,
        vault_address: impl Into<String>,
        verifier: Arc<Identity>,
        arbitrator: Arc<Identity>,
    ) -> Self {
        Self {
            principal: principal.into(),
            vault_address: vault_address.into(),
            verifier,
            arbitrator,
        }
    }

    pub fn principal(&self) -> &str {
        &self.principal
    }

    pub fn vault_address(&self) -> &str {
        &self.vault_address
    }

    pub fn verifier_public_key(&self) -> &str {
        self.verifier.public_key()
    }

    pub fn arbitrator_public_key(&self) -> &str {
        self.arbitrator.public_key()
    }

    /// Verifier attestation that a participant's stake reached the vault.
    pub fn staking(
        &self,
        tx_id: &str,
        participant_address: &str,
        timestamp: u64,
    ) -> Result<Attestation, AttestationError> {
        let message = CanonicalMessage::staking(
            &self.principal,
            tx_id,
            &self.vault_address,
            participant_address,
            timestamp,
        )?;
        self.attest(message, &self.verifier, SignerRole::Verifier)
    }

    /// Verifier attestation that a participant has been paid out.
    pub fn settling(
        &self,
        tx_id: &str,
        participant_address: &str,
        timestamp: u64,
    ) -> Result<Attestation, AttestationError> {
        let message = CanonicalMessage::settling(
            &self.principal,
            tx_id,
            &self.vault_address,
            participant_address,
            timestamp,
        )?;
        self.attest(message, &self.verifier, SignerRole::Verifier)
    }

    /// Dual-path attestation of trade completion (participant A, participant B).
    pub fn trading(
        &self,
        tx_id: &str,
        participants: [SignatureSlot; 2],
    ) -> Result<Endorsement<2>, AttestationError> {
        let message = CanonicalMessage::trading(&self.principal, tx_id)?;
        self.endorse(message, participants)
    }

    /// Dual-path attestation that `participant_address` opens a dispute.
    pub fn dispute(
        &self,
        tx_id: &str,
        participant_address: &str,
        timestamp: u64,
        participant: SignatureSlot,
    ) -> Result<Endorsement<1>, AttestationError> {
        let message =
            CanonicalMessage::disputing(&self.principal, tx_id, participant_address, timestamp)?;
        self.endorse(message, [participant])
    }

    /// Arbitrator attestation of the withdrawable split after a dispute.
    pub fn resolution(
        &self,
        tx_id: &str,
        amount_a: u64,
        amount_b: u64,
        timestamp: u64,
    ) -> Result<Attestation, AttestationError> {
        let message =
            CanonicalMessage::resolving(&self.principal, tx_id, amount_a, amount_b, timestamp)?;
        self.attest(message, &self.arbitrator, SignerRole::Arbitrator)
    }

    // The message is always built first so malformed fields are rejected on
    // both paths.
    fn endorse<const N: usize>(
        &self,
        message: CanonicalMessage,
        participants: [SignatureSlot; N],
    ) -> Result<Endorsement<N>, AttestationError> {
        match all_supplied(participants) {
            Some(signatures) => Ok(Endorsement::Participants(signatures)),
            None => Ok(Endorsement::Verifier(
                self.attest(message, &self.verifier, SignerRole::Verifier)?,
            )),
        }
    }

    fn attest(
        &self,
        message: CanonicalMessage,
        identity: &Identity,
        role: SignerRole,
    ) -> Result<Attestation, AttestationError> {
        let signature = signer::sign(&message, identity)?;
        tracing::debug!(
            operation = %message.kind(),
            signer = %role,
            "Produced attestation"
        );
        Ok(Attestation {
            message,
            signature,
            signer: role,
        })
    }
}

fn all_supplied<const N: usize>(slots: [SignatureSlot; N]) -> Option<[String; N]> {
    let mut signatures = Vec::with_capacity(N);
    for slot in slots {
        match slot {
            SignatureSlot::Supplied(signature) => signatures.push(signature),
            SignatureSlot::Absent => return None,
        }
    }
    signatures.try_into().ok()
}
