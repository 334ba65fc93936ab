// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Attestation Layer
//!
//! Builds the byte-exact messages the ledger verifies, signs them with the
//! relay-held identities and decides, per request, whose signatures are sent.
//!
//! - `keystore` - persistent verifier/arbitrator identities
//! - `canonical` - canonical message builders, one per operation
//! - `signer` - deterministic Ed25519 detached signatures
//! - `policy` - verifier, arbitrator and dual-path attestation rules

pub mod canonical;
pub mod keystore;
pub mod policy;
pub mod signer;

pub use canonical::{CanonicalMessage, CanonicalizationError, Operation, OperationKind};
pub use keystore::{load_or_create, Identity, KeyStoreError};
pub use policy::{
    Attestation, AttestationError, AttestationPolicy, Endorsement, SignatureSlot, SignerRole,
};
pub use signer::{sign, verify, SignerError};
