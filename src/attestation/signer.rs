// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Detached Ed25519 signatures over canonical messages.
//!
//! Ed25519 signing is deterministic: the same message and key always produce
//! the same signature. Signatures are base58-encoded for the ledger.

use ed25519_dalek::{Signature, Signer, Verifier, VerifyingKey, PUBLIC_KEY_LENGTH};

use super::keystore::Identity;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignerError {
    #[error("refusing to sign an empty message")]
    EmptyMessage,
}

/// Sign `message` with `identity`, returning the base58 signature.
pub fn sign(message: impl AsRef<str>, identity: &Identity) -> Result<String, SignerError> {
    let message = message.as_ref();
    if message.is_empty() {
        return Err(SignerError::EmptyMessage);
    }
    let signature: Signature = identity.signing_key().sign(message.as_bytes());
    Ok(bs58::encode(signature.to_bytes()).into_string())
}

/// Check a base58 signature against a base58 public key.
///
/// Only used in tests and diagnostics; the ledger performs the authoritative
/// check. Any decoding failure yields `false`.
pub fn verify(message: impl AsRef<str>, signature: &str, public_key: &str) -> bool {
    let Ok(key_bytes) = bs58::decode(public_key).into_vec() else {
        return false;
    };
    let Ok(key_bytes) = <[u8; PUBLIC_KEY_LENGTH]>::try_from(key_bytes.as_slice()) else {
        return false;
    };
    let Ok(verifying_key) = VerifyingKey::from_bytes(&key_bytes) else {
        return false;
    };
    let Ok(sig_bytes) = bs58::decode(signature).into_vec() else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(&sig_bytes) else {
        return false;
    };
    verifying_key
        .verify(message.as_ref().as_bytes(), &signature)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_round_trip() {
        let identity = Identity::generate();
        for message in ["a", "principal-tx-Trading", "ünïcode-✓"] {
            let signature = sign(message, &identity).expect("sign");
            assert!(verify(message, &signature, identity.public_key()));
        }
    }

    #[test]
    fn signing_is_deterministic() {
        let identity = Identity::generate();
        let first = sign("principal-tx-Trading", &identity).unwrap();
        let second = sign("principal-tx-Trading", &identity).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn known_seed_produces_stable_signature() {
        let identity = Identity::from_secret_bytes(&[7u8; 32]).unwrap();
        let again = Identity::from_secret_bytes(&identity.secret_key_bytes()).unwrap();
        assert_eq!(
            sign("m", &identity).unwrap(),
            sign("m", &again).unwrap()
        );
    }

    #[test]
    fn empty_message_is_rejected() {
        let identity = Identity::generate();
        assert_eq!(sign("", &identity), Err(SignerError::EmptyMessage));
    }

    #[test]
    fn verify_rejects_wrong_key_or_message() {
        let signer = Identity::generate();
        let other = Identity::generate();
        let signature = sign("msg", &signer).unwrap();

        assert!(!verify("msg", &signature, other.public_key()));
        assert!(!verify("msg2", &signature, signer.public_key()));
    }

    #[test]
    fn verify_rejects_garbage_encodings() {
        let signer = Identity::generate();
        let signature = sign("msg", &signer).unwrap();

        assert!(!verify("msg", "not base58 0OIl", signer.public_key()));
        assert!(!verify("msg", &signature, "0OIl"));
        assert!(!verify("msg", "2g", signer.public_key()));
        assert!(!verify("msg", &signature, "2g"));
    }
}
