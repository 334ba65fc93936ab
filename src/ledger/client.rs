// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON-RPC client for the escrow ledger gateway.
//!
//! Each call is one `POST` to the gateway:
//!
//! ```text
//! {"jsonrpc":"2.0","id":"<uuid>","method":"confirmStakingComplete",
//!  "params":{"canisterId":"<ledger id>","args":{...}}}
//! ```
//!
//! A JSON-RPC `error` object is a ledger rejection and is returned verbatim
//! as [`LedgerError::Rejected`].

use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::types::*;
use super::{Ledger, LedgerError};

/// Ledger client over HTTP. Cheap to clone; holds only the connection pool.
#[derive(Debug, Clone)]
pub struct HttpLedger {
    http: reqwest::Client,
    endpoint: Url,
    canister_id: String,
}

#[derive(Serialize)]
struct RpcRequest<'a, P: Serialize + ?Sized> {
    jsonrpc: &'static str,
    id: String,
    method: &'a str,
    params: RpcParams<'a, P>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RpcParams<'a, P: Serialize + ?Sized> {
    canister_id: &'a str,
    args: &'a P,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    #[serde(default)]
    code: Option<i64>,
    message: String,
}

impl HttpLedger {
    /// Build a client. `timeout` bounds every round trip.
    pub fn new(
        endpoint: Url,
        canister_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LedgerError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            endpoint,
            canister_id: canister_id.into(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn call<P, R>(&self, method: &str, args: &P) -> Result<R, LedgerError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: uuid::Uuid::new_v4().to_string(),
            method,
            params: RpcParams {
                canister_id: &self.canister_id,
                args,
            },
        };

        tracing::debug!(method, request_id = %request.id, "Calling ledger");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;
        decode_response(status, &body)
    }
}

fn transport_error(e: reqwest::Error) -> LedgerError {
    if e.is_timeout() {
        LedgerError::Timeout
    } else {
        LedgerError::Transport(e.to_string())
    }
}

fn decode_response<R: DeserializeOwned>(
    status: reqwest::StatusCode,
    body: &[u8],
) -> Result<R, LedgerError> {
    let parsed = match serde_json::from_slice::<RpcResponse>(body) {
        Ok(parsed) => parsed,
        Err(e) if status.is_success() => return Err(LedgerError::Decode(e.to_string())),
        Err(_) => {
            return Err(LedgerError::Transport(format!(
                "HTTP {status}: {}",
                String::from_utf8_lossy(body)
            )))
        }
    };

    if let Some(error) = parsed.error {
        return Err(LedgerError::Rejected {
            code: error.code,
            message: error.message,
        });
    }
    if !status.is_success() {
        return Err(LedgerError::Transport(format!("HTTP {status}")));
    }
    serde_json::from_value(parsed.result).map_err(|e| LedgerError::Decode(e.to_string()))
}

#[async_trait]
impl Ledger for HttpLedger {
    async fn initialize(&self, args: &InitializeArgs) -> Result<String, LedgerError> {
        self.call(methods::INITIALIZE, args).await
    }

    async fn confirm_staking_complete(
        &self,
        args: &VaultConfirmation,
    ) -> Result<Value, LedgerError> {
        self.call(methods::CONFIRM_STAKING_COMPLETE, args).await
    }

    async fn confirm_trading_complete(
        &self,
        args: &TradeConfirmation,
    ) -> Result<Value, LedgerError> {
        self.call(methods::CONFIRM_TRADING_COMPLETE, args).await
    }

    async fn confirm_settling_complete(
        &self,
        args: &VaultConfirmation,
    ) -> Result<Value, LedgerError> {
        self.call(methods::CONFIRM_SETTLING_COMPLETE, args).await
    }

    async fn initiate_dispute(&self, args: &DisputeInitiation) -> Result<Value, LedgerError> {
        self.call(methods::INITIATE_DISPUTE, args).await
    }

    async fn resolve_dispute(&self, args: &DisputeResolution) -> Result<Value, LedgerError> {
        self.call(methods::RESOLVE_DISPUTE, args).await
    }

    async fn sign_with_schnorr(&self, tx_id: &str) -> Result<Value, LedgerError> {
        self.call(
            methods::SIGN_WITH_SCHNORR,
            &TransactionRef {
                transaction_id: tx_id,
            },
        )
        .await
    }

    async fn get_transaction_details(&self, tx_id: &str) -> Result<Value, LedgerError> {
        self.call(
            methods::GET_TRANSACTION_DETAILS,
            &TransactionRef {
                transaction_id: tx_id,
            },
        )
        .await
    }

    async fn get_proof_details(&self, tx_id: &str) -> Result<String, LedgerError> {
        self.call(
            methods::GET_PROOF_DETAILS,
            &TransactionRef {
                transaction_id: tx_id,
            },
        )
        .await
    }

    async fn get_sign_with_schnorr_content(&self, tx_id: &str) -> Result<Value, LedgerError> {
        self.call(
            methods::GET_SIGN_WITH_SCHNORR_CONTENT,
            &TransactionRef {
                transaction_id: tx_id,
            },
        )
        .await
    }

    async fn get_principal(&self) -> Result<String, LedgerError> {
        self.call(methods::GET_PRINCIPAL, &()).await
    }

    async fn get_public_key(&self) -> Result<Value, LedgerError> {
        self.call(methods::GET_SCHNORR_PUBLIC_KEY, &()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn decodes_result() {
        let txid: String =
            decode_response(StatusCode::OK, br#"{"jsonrpc":"2.0","id":"1","result":"tx-7"}"#)
                .unwrap();
        assert_eq!(txid, "tx-7");
    }

    #[test]
    fn missing_result_decodes_as_null() {
        let value: Value = decode_response(StatusCode::OK, br#"{"jsonrpc":"2.0","id":"1"}"#).unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn error_object_is_a_rejection_passed_verbatim() {
        let body = br#"{"jsonrpc":"2.0","id":"1","error":{"code":-32000,"message":"Invalid signature"}}"#;
        let err = decode_response::<Value>(StatusCode::OK, body).unwrap_err();
        assert_eq!(
            err,
            LedgerError::Rejected {
                code: Some(-32000),
                message: "Invalid signature".to_string(),
            }
        );
        assert_eq!(err.to_string(), "Invalid signature");

        let err = decode_response::<Value>(StatusCode::BAD_REQUEST, body).unwrap_err();
        assert!(matches!(err, LedgerError::Rejected { .. }));
    }

    #[test]
    fn non_json_error_status_is_transport() {
        let err = decode_response::<Value>(StatusCode::BAD_GATEWAY, b"upstream down").unwrap_err();
        assert_eq!(
            err,
            LedgerError::Transport("HTTP 502 Bad Gateway: upstream down".to_string())
        );
    }

    #[test]
    fn wrong_result_type_is_decode_error() {
        let err =
            decode_response::<String>(StatusCode::OK, br#"{"result":{"unexpected":true}}"#)
                .unwrap_err();
        assert!(matches!(err, LedgerError::Decode(_)));
    }

    #[test]
    fn request_envelope_shape() {
        let args = TransactionRef {
            transaction_id: "tx1",
        };
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: "req-1".to_string(),
            method: methods::GET_PROOF_DETAILS,
            params: RpcParams {
                canister_id: "ledger-1",
                args: &args,
            },
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "jsonrpc": "2.0",
                "id": "req-1",
                "method": "getProofDetails",
                "params": {"canisterId": "ledger-1", "args": {"transactionId": "tx1"}},
            })
        );
    }

    #[tokio::test]
    async fn unreachable_ledger_is_transport_error() {
        let ledger = HttpLedger::new(
            Url::parse("http://127.0.0.1:9").unwrap(),
            "ledger-1",
            Duration::from_secs(2),
        )
        .unwrap();
        let err = ledger.get_principal().await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Transport(_) | LedgerError::Timeout
        ));
    }
}
