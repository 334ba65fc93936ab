// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Recording in-memory ledger for tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

use super::types::*;
use super::{Ledger, LedgerError};

pub const MOCK_PRINCIPAL: &str = "bkyz2-fmaaa-aaaaa-qaaaq-cai";
pub const MOCK_TX_ID: &str = "tx-1";

/// One call as seen by the ledger.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: &'static str,
    pub args: Value,
}

/// Counts calls, captures arguments and returns canned answers.
#[derive(Default)]
pub struct MockLedger {
    calls: Mutex<Vec<RecordedCall>>,
    rejection: Mutex<Option<String>>,
    delay: Option<Duration>,
    transaction: Mutex<Value>,
    proof: Mutex<String>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps for `delay` before answering.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Make every subsequent call fail with a ledger rejection.
    pub fn reject_with(&self, message: &str) {
        *self.rejection.lock().unwrap() = Some(message.to_string());
    }

    pub fn set_transaction(&self, details: Value) {
        *self.transaction.lock().unwrap() = details;
    }

    pub fn set_proof(&self, proof: &str) {
        *self.proof.lock().unwrap() = proof.to_string();
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn methods(&self) -> Vec<&'static str> {
        self.calls().into_iter().map(|c| c.method).collect()
    }

    async fn record<A: Serialize + ?Sized>(
        &self,
        method: &'static str,
        args: &A,
    ) -> Result<(), LedgerError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            args: serde_json::to_value(args).unwrap(),
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.rejection.lock().unwrap().clone() {
            Some(message) => Err(LedgerError::Rejected {
                code: None,
                message,
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn initialize(&self, args: &InitializeArgs) -> Result<String, LedgerError> {
        self.record(methods::INITIALIZE, args).await?;
        Ok(MOCK_TX_ID.to_string())
    }

    async fn confirm_staking_complete(
        &self,
        args: &VaultConfirmation,
    ) -> Result<Value, LedgerError> {
        self.record(methods::CONFIRM_STAKING_COMPLETE, args).await?;
        Ok(Value::Null)
    }

    async fn confirm_trading_complete(
        &self,
        args: &TradeConfirmation,
    ) -> Result<Value, LedgerError> {
        self.record(methods::CONFIRM_TRADING_COMPLETE, args).await?;
        Ok(Value::Null)
    }

    async fn confirm_settling_complete(
        &self,
        args: &VaultConfirmation,
    ) -> Result<Value, LedgerError> {
        self.record(methods::CONFIRM_SETTLING_COMPLETE, args).await?;
        Ok(Value::Null)
    }

    async fn initiate_dispute(&self, args: &DisputeInitiation) -> Result<Value, LedgerError> {
        self.record(methods::INITIATE_DISPUTE, args).await?;
        Ok(Value::Null)
    }

    async fn resolve_dispute(&self, args: &DisputeResolution) -> Result<Value, LedgerError> {
        self.record(methods::RESOLVE_DISPUTE, args).await?;
        Ok(Value::Null)
    }

    async fn sign_with_schnorr(&self, tx_id: &str) -> Result<Value, LedgerError> {
        self.record(methods::SIGN_WITH_SCHNORR, tx_id).await?;
        Ok(json!("schnorr-signature"))
    }

    async fn get_transaction_details(&self, tx_id: &str) -> Result<Value, LedgerError> {
        self.record(methods::GET_TRANSACTION_DETAILS, tx_id).await?;
        Ok(self.transaction.lock().unwrap().clone())
    }

    async fn get_proof_details(&self, tx_id: &str) -> Result<String, LedgerError> {
        self.record(methods::GET_PROOF_DETAILS, tx_id).await?;
        Ok(self.proof.lock().unwrap().clone())
    }

    async fn get_sign_with_schnorr_content(&self, tx_id: &str) -> Result<Value, LedgerError> {
        self.record(methods::GET_SIGN_WITH_SCHNORR_CONTENT, tx_id)
            .await?;
        Ok(json!("content-bytes"))
    }

    async fn get_principal(&self) -> Result<String, LedgerError> {
        self.record(methods::GET_PRINCIPAL, &()).await?;
        Ok(MOCK_PRINCIPAL.to_string())
    }

    async fn get_public_key(&self) -> Result<Value, LedgerError> {
        self.record(methods::GET_SCHNORR_PUBLIC_KEY, &()).await?;
        Ok(json!("schnorr-public-key"))
    }
}
