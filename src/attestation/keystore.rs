// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Persistent signing identities for the verifier and arbitrator roles.
//!
//! Each identity lives in its own JSON file:
//!
//! ```text
//! {"publicKey": "<base58 public key>", "secretKey": "<base58 secret key>"}
//! ```
//!
//! The secret key is the 64-byte Ed25519 keypair encoding (seed followed by
//! the public key). A bare 32-byte seed is accepted on load as well.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use ed25519_dalek::{SigningKey, KEYPAIR_LENGTH, SECRET_KEY_LENGTH};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

/// Errors raised while loading or persisting an identity.
#[derive(Debug, thiserror::Error)]
pub enum KeyStoreError {
    #[error("key storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt key file at {path}: {reason}")]
    CorruptKey { path: PathBuf, reason: String },
}

/// A long-lived Ed25519 signing identity.
#[derive(Clone)]
pub struct Identity {
    public_key: String,
    signing_key: SigningKey,
}

impl Identity {
    /// Generate a fresh identity from the OS random number generator.
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::generate(&mut OsRng))
    }

    /// Rebuild an identity from raw secret key bytes (64-byte keypair or
    /// 32-byte seed).
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, String> {
        let signing_key = match bytes.len() {
            KEYPAIR_LENGTH => {
                let mut keypair = [0u8; KEYPAIR_LENGTH];
                keypair.copy_from_slice(bytes);
                SigningKey::from_keypair_bytes(&keypair).map_err(|e| e.to_string())?
            }
            SECRET_KEY_LENGTH => {
                let mut seed = [0u8; SECRET_KEY_LENGTH];
                seed.copy_from_slice(bytes);
                SigningKey::from_bytes(&seed)
            }
            other => {
                return Err(format!(
                    "secret key must be {KEYPAIR_LENGTH} or {SECRET_KEY_LENGTH} bytes, got {other}"
                ))
            }
        };
        Ok(Self::from_signing_key(signing_key))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let public_key = bs58::encode(signing_key.verifying_key().as_bytes()).into_string();
        Self {
            public_key,
            signing_key,
        }
    }

    /// Base58-encoded public key, as registered with the ledger.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Raw secret key in the 64-byte keypair encoding.
    pub fn secret_key_bytes(&self) -> [u8; KEYPAIR_LENGTH] {
        self.signing_key.to_keypair_bytes()
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredKeyPair {
    public_key: String,
    secret_key: String,
}

/// Load the identity stored at `path`, or generate and persist a new one.
///
/// Repeated calls against the same path return the same keys.
pub fn load_or_create(path: impl AsRef<Path>) -> Result<Identity, KeyStoreError> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(json) => parse(path, &json),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let identity = Identity::generate();
            persist(path, &identity)?;
            tracing::info!(
                path = %path.display(),
                public_key = identity.public_key(),
                "Generated new signing identity"
            );
            Ok(identity)
        }
        Err(source) => Err(KeyStoreError::Storage {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse(path: &Path, json: &str) -> Result<Identity, KeyStoreError> {
    let corrupt = |reason: String| KeyStoreError::CorruptKey {
        path: path.to_path_buf(),
        reason,
    };

    let stored: StoredKeyPair =
        serde_json::from_str(json).map_err(|e| corrupt(format!("invalid JSON: {e}")))?;
    let secret = bs58::decode(stored.secret_key.trim())
        .into_vec()
        .map_err(|e| corrupt(format!("secretKey is not base58: {e}")))?;
    let identity = Identity::from_secret_bytes(&secret).map_err(corrupt)?;

    if identity.public_key() != stored.public_key.trim() {
        return Err(corrupt(
            "publicKey does not match the key derived from secretKey".to_string(),
        ));
    }
    Ok(identity)
}

/// Write the identity atomically: temp file in the same directory, then rename.
fn persist(path: &Path, identity: &Identity) -> Result<(), KeyStoreError> {
    let storage = |source: io::Error| KeyStoreError::Storage {
        path: path.to_path_buf(),
        source,
    };

    let stored = StoredKeyPair {
        public_key: identity.public_key().to_string(),
        secret_key: bs58::encode(identity.secret_key_bytes()).into_string(),
    };
    let json = serde_json::to_vec(&stored).map_err(|e| storage(io::Error::other(e)))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(storage)?;
    }

    let temp_path = path.with_extension("tmp");
    let written = write_private(&temp_path, &json).and_then(|_| fs::rename(&temp_path, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(storage(e));
    }
    Ok(())
}

fn write_private(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file: File = options.open(path)?;
    file.write_all(data)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_or_create_is_idempotent() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("verifier.json");

        let first = load_or_create(&path).expect("create");
        let second = load_or_create(&path).expect("load");

        assert_eq!(first.public_key(), second.public_key());
        assert_eq!(first.secret_key_bytes(), second.secret_key_bytes());
    }

    #[test]
    fn persisted_file_round_trips_through_base58() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("arbitrator.json");

        let identity = load_or_create(&path).expect("create");
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("json");

        assert_eq!(raw["publicKey"], identity.public_key());
        let secret = bs58::decode(raw["secretKey"].as_str().expect("secretKey"))
            .into_vec()
            .expect("base58");
        assert_eq!(secret.as_slice(), identity.secret_key_bytes().as_slice());
        assert!(!path.with_extension("tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn persisted_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("verifier.json");
        load_or_create(&path).expect("create");

        let mode = fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn accepts_seed_only_secret() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("seed.json");
        let identity = Identity::generate();
        let seed = &identity.secret_key_bytes()[..SECRET_KEY_LENGTH];
        let json = serde_json::json!({
            "publicKey": identity.public_key(),
            "secretKey": bs58::encode(seed).into_string(),
        });
        fs::write(&path, json.to_string()).expect("write");

        let loaded = load_or_create(&path).expect("load");
        assert_eq!(loaded.public_key(), identity.public_key());
    }

    #[test]
    fn rejects_unparseable_json() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").expect("write");

        let err = load_or_create(&path).unwrap_err();
        assert!(matches!(err, KeyStoreError::CorruptKey { .. }));
        // The corrupt file must be left alone, not regenerated.
        assert_eq!(fs::read_to_string(&path).expect("read"), "{not json");
    }

    #[test]
    fn rejects_malformed_fields() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("bad.json");

        fs::write(&path, r#"{"publicKey":"abc","secretKey":"0OIl"}"#).expect("write");
        assert!(matches!(
            load_or_create(&path).unwrap_err(),
            KeyStoreError::CorruptKey { .. }
        ));

        fs::write(&path, r#"{"publicKey":"abc","secretKey":"2g"}"#).expect("write");
        assert!(matches!(
            load_or_create(&path).unwrap_err(),
            KeyStoreError::CorruptKey { .. }
        ));
    }

    #[test]
    fn rejects_mismatched_public_key() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("mismatch.json");
        let real = Identity::generate();
        let other = Identity::generate();
        let json = serde_json::json!({
            "publicKey": other.public_key(),
            "secretKey": bs58::encode(real.secret_key_bytes()).into_string(),
        });
        fs::write(&path, json.to_string()).expect("write");

        let err = load_or_create(&path).unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn unwritable_location_is_a_storage_error() {
        let dir = tempdir().expect("tempdir");
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").expect("write");

        let err = load_or_create(blocker.join("verifier.json")).unwrap_err();
        assert!(matches!(err, KeyStoreError::Storage { .. }));
    }

    #[test]
    fn debug_output_hides_secret() {
        let identity = Identity::generate();
        let rendered = format!("{identity:?}");
        assert!(rendered.contains(identity.public_key()));
        assert!(!rendered.contains("signing_key"));
    }
}
