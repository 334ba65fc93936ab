// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Escrow Relay
//!
//! One method per HTTP operation. Each method prepares the signed arguments
//! with the [`AttestationPolicy`] and issues exactly one ledger call, bounded
//! by the configured timeout. Nothing is retried, cached or rolled back; the
//! ledger's answer is returned unchanged.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::attestation::{AttestationError, AttestationPolicy, Identity, SignatureSlot};
use crate::ledger::{
    methods, DisputeInitiation, DisputeResolution, EscrowMode, InitializeArgs, Ledger,
    LedgerError, TradeConfirmation, VaultConfirmation,
};

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Malformed operation fields or signing failure; nothing was sent.
    #[error(transparent)]
    Attestation(#[from] AttestationError),

    /// The ledger rejected the call or could not be reached.
    #[error(transparent)]
    Remote(LedgerError),

    #[error("ledger call {operation} timed out after {}s", .after.as_secs())]
    RemoteTimeout {
        operation: &'static str,
        after: Duration,
    },
}

/// Parameters of a new escrow transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEscrow {
    pub escrow_mode: EscrowMode,
    pub comments: String,
    pub participant_a_address: String,
    pub participant_b_address: String,
    pub participant_a_stake_amount: u64,
    pub participant_b_stake_amount: u64,
    pub stake_duration: u64,
    pub trade_duration: u64,
}

/// Request-scoped operations against the ledger. Shared read-only across
/// concurrent requests.
pub struct EscrowRelay {
    ledger: Arc<dyn Ledger>,
    policy: AttestationPolicy,
    call_timeout: Duration,
}

impl EscrowRelay {
    pub fn new(ledger: Arc<dyn Ledger>, policy: AttestationPolicy, call_timeout: Duration) -> Self {
        Self {
            ledger,
            policy,
            call_timeout,
        }
    }

    /// Resolve the ledger principal once and build the relay around it.
    pub async fn connect(
        ledger: Arc<dyn Ledger>,
        verifier: Arc<Identity>,
        arbitrator: Arc<Identity>,
        vault_address: impl Into<String>,
        call_timeout: Duration,
    ) -> Result<Self, RelayError> {
        let principal = bounded(
            methods::GET_PRINCIPAL,
            call_timeout,
            ledger.get_principal(),
        )
        .await?;
        tracing::info!(%principal, "Resolved ledger principal");

        let policy = AttestationPolicy::new(principal, vault_address, verifier, arbitrator);
        Ok(Self::new(ledger, policy, call_timeout))
    }

    pub fn policy(&self) -> &AttestationPolicy {
        &self.policy
    }

    pub async fn initialize(&self, escrow: NewEscrow) -> Result<String, RelayError> {
        let args = InitializeArgs {
            escrow_mode: escrow.escrow_mode,
            comments: escrow.comments,
            participant_a_address: escrow.participant_a_address,
            participant_b_address: escrow.participant_b_address,
            participant_a_stake_amount: escrow.participant_a_stake_amount,
            participant_b_stake_amount: escrow.participant_b_stake_amount,
            verifier_public_key: self.policy.verifier_public_key().to_string(),
            arbitrator_public_key: self.policy.arbitrator_public_key().to_string(),
            stake_duration: escrow.stake_duration,
            trade_duration: escrow.trade_duration,
        };
        let tx_id = self
            .dispatch(methods::INITIALIZE, self.ledger.initialize(&args))
            .await?;
        tracing::info!(
            tx_id = %tx_id,
            mode = args.escrow_mode.as_str(),
            "Initialized escrow transaction"
        );
        Ok(tx_id)
    }

    pub async fn confirm_staking(
        &self,
        tx_id: &str,
        participant_address: &str,
    ) -> Result<Value, RelayError> {
        let timestamp = unix_now();
        let attestation = self.policy.staking(tx_id, participant_address, timestamp)?;
        let args = VaultConfirmation {
            transaction_id: tx_id.to_string(),
            vault_address: self.policy.vault_address().to_string(),
            participant_address: participant_address.to_string(),
            timestamp,
            signature: attestation.signature,
        };
        let result = self
            .dispatch(
                methods::CONFIRM_STAKING_COMPLETE,
                self.ledger.confirm_staking_complete(&args),
            )
            .await?;
        tracing::info!(tx_id, signer = %attestation.signer, "Confirmed staking");
        Ok(result)
    }

    pub async fn confirm_trading(
        &self,
        tx_id: &str,
        participant_a: SignatureSlot,
        participant_b: SignatureSlot,
    ) -> Result<Value, RelayError> {
        let endorsement = self.policy.trading(tx_id, [participant_a, participant_b])?;
        let [participant_a_signature, participant_b_signature] = endorsement.participant_slots();
        let args = TradeConfirmation {
            transaction_id: tx_id.to_string(),
            participant_a_signature,
            participant_b_signature,
            verifier_signature: endorsement.verifier_slot(),
        };
        let result = self
            .dispatch(
                methods::CONFIRM_TRADING_COMPLETE,
                self.ledger.confirm_trading_complete(&args),
            )
            .await?;
        tracing::info!(tx_id, signer = %endorsement.signer(), "Confirmed trading");
        Ok(result)
    }

    pub async fn confirm_settling(
        &self,
        tx_id: &str,
        participant_address: &str,
    ) -> Result<Value, RelayError> {
        let timestamp = unix_now();
        let attestation = self.policy.settling(tx_id, participant_address, timestamp)?;
        let args = VaultConfirmation {
            transaction_id: tx_id.to_string(),
            vault_address: self.policy.vault_address().to_string(),
            participant_address: participant_address.to_string(),
            timestamp,
            signature: attestation.signature,
        };
        let result = self
            .dispatch(
                methods::CONFIRM_SETTLING_COMPLETE,
                self.ledger.confirm_settling_complete(&args),
            )
            .await?;
        tracing::info!(tx_id, signer = %attestation.signer, "Confirmed settling");
        Ok(result)
    }

    pub async fn initiate_dispute(
        &self,
        tx_id: &str,
        participant_address: &str,
        participant_signature: SignatureSlot,
    ) -> Result<Value, RelayError> {
        let timestamp = unix_now();
        let endorsement =
            self.policy
                .dispute(tx_id, participant_address, timestamp, participant_signature)?;
        let [participant_signature] = endorsement.participant_slots();
        let args = DisputeInitiation {
            transaction_id: tx_id.to_string(),
            participant_address: participant_address.to_string(),
            timestamp,
            participant_signature,
            verifier_signature: endorsement.verifier_slot(),
        };
        let result = self
            .dispatch(methods::INITIATE_DISPUTE, self.ledger.initiate_dispute(&args))
            .await?;
        tracing::info!(tx_id, signer = %endorsement.signer(), "Initiated dispute");
        Ok(result)
    }

    pub async fn resolve_dispute(
        &self,
        tx_id: &str,
        comments: &str,
        amount_a: u64,
        amount_b: u64,
    ) -> Result<Value, RelayError> {
        let timestamp = unix_now();
        let attestation = self
            .policy
            .resolution(tx_id, amount_a, amount_b, timestamp)?;
        let args = DisputeResolution {
            transaction_id: tx_id.to_string(),
            comments: comments.to_string(),
            participant_a_withdrawable_amount: amount_a,
            participant_b_withdrawable_amount: amount_b,
            timestamp,
            signature: attestation.signature,
        };
        let result = self
            .dispatch(methods::RESOLVE_DISPUTE, self.ledger.resolve_dispute(&args))
            .await?;
        tracing::info!(tx_id, signer = %attestation.signer, "Resolved dispute");
        Ok(result)
    }

    pub async fn sign_with_schnorr(&self, tx_id: &str) -> Result<Value, RelayError> {
        self.dispatch(methods::SIGN_WITH_SCHNORR, self.ledger.sign_with_schnorr(tx_id))
            .await
    }

    pub async fn transaction_details(&self, tx_id: &str) -> Result<Value, RelayError> {
        self.dispatch(
            methods::GET_TRANSACTION_DETAILS,
            self.ledger.get_transaction_details(tx_id),
        )
        .await
    }

    pub async fn proof_details(&self, tx_id: &str) -> Result<String, RelayError> {
        self.dispatch(methods::GET_PROOF_DETAILS, self.ledger.get_proof_details(tx_id))
            .await
    }

    pub async fn sign_with_schnorr_content(&self, tx_id: &str) -> Result<Value, RelayError> {
        self.dispatch(
            methods::GET_SIGN_WITH_SCHNORR_CONTENT,
            self.ledger.get_sign_with_schnorr_content(tx_id),
        )
        .await
    }

    pub async fn principal(&self) -> Result<String, RelayError> {
        self.dispatch(methods::GET_PRINCIPAL, self.ledger.get_principal())
            .await
    }

    pub async fn public_key(&self) -> Result<Value, RelayError> {
        self.dispatch(methods::GET_SCHNORR_PUBLIC_KEY, self.ledger.get_public_key())
            .await
    }

    async fn dispatch<T, F>(&self, operation: &'static str, call: F) -> Result<T, RelayError>
    where
        F: Future<Output = Result<T, LedgerError>>,
    {
        bounded(operation, self.call_timeout, call).await
    }
}

async fn bounded<T, F>(
    operation: &'static str,
    timeout: Duration,
    call: F,
) -> Result<T, RelayError>
where
    F: Future<Output = Result<T, LedgerError>>,
{
    let started = Instant::now();
    let outcome = tokio::time::timeout(timeout, call).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(Ok(value)) => {
            tracing::debug!(operation, elapsed_ms, "Ledger call completed");
            Ok(value)
        }
        Ok(Err(LedgerError::Timeout)) | Err(_) => {
            tracing::warn!(operation, elapsed_ms, "Ledger call timed out");
            Err(RelayError::RemoteTimeout {
                operation,
                after: timeout,
            })
        }
        Ok(Err(e)) => {
            tracing::warn!(operation, elapsed_ms, error = %e, "Ledger call failed");
            Err(RelayError::Remote(e))
        }
    }
}

/// Current unix time in seconds.
pub fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
}
