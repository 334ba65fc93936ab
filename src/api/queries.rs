// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Read-only pass-through queries.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::{
    config::ProtocolVersion,
    error::ApiError,
    models::{ContentResponse, PrincipalResponse, PublicKeyResponse},
    state::AppState,
};

/// Fields of the transaction record that carry single-key variant objects.
const VARIANT_FIELDS: [&str; 2] = ["status", "escrowMode"];

/// Shape a `getTransactionDetails` result for the client.
///
/// Returns `None` when the ledger has no such transaction.
pub fn shape_transaction(details: Value, protocol: ProtocolVersion) -> Option<Value> {
    if protocol == ProtocolVersion::V1 {
        return Some(details);
    }

    // Optional records come wrapped as `[]` or `[record]`.
    let record = match details {
        Value::Array(items) => items.into_iter().next()?,
        Value::Null => return None,
        other => other,
    };

    match record {
        Value::Object(mut fields) => {
            for key in VARIANT_FIELDS {
                if let Some(tag) = fields.get(key).and_then(variant_tag) {
                    fields.insert(key.to_string(), Value::String(tag));
                }
            }
            Some(Value::Object(fields))
        }
        other => Some(other),
    }
}

fn variant_tag(value: &Value) -> Option<String> {
    value.as_object()?.keys().next().cloned()
}

#[utoipa::path(
    get,
    path = "/transaction/{id}",
    params(("id" = String, Path, description = "Escrow transaction id")),
    tag = "Queries",
    responses(
        (status = 200, description = "Transaction record", body = Object),
        (status = 404, description = "No such transaction")
    )
)]
pub async fn transaction_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let details = state.relay.transaction_details(&id).await?;
    shape_transaction(details, state.protocol)
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

#[utoipa::path(
    get,
    path = "/proof/{id}",
    params(("id" = String, Path, description = "Escrow transaction id")),
    tag = "Queries",
    responses(
        (status = 200, description = "Proof payload", body = Object),
        (status = 404, description = "Transaction has no proof")
    )
)]
pub async fn proof_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let proof = state.relay.proof_details(&id).await?;
    if proof.is_empty() {
        return Err(ApiError::not_found());
    }
    serde_json::from_str(&proof)
        .map(Json)
        .map_err(|e| ApiError::bad_gateway(format!("unexpected ledger response: {e}")))
}

#[utoipa::path(
    get,
    path = "/signWithSchnorrContent/{id}",
    params(("id" = String, Path, description = "Escrow transaction id")),
    tag = "Ledger",
    responses((status = 200, body = ContentResponse))
)]
pub async fn sign_with_schnorr_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ContentResponse>, ApiError> {
    let content = state.relay.sign_with_schnorr_content(&id).await?;
    Ok(Json(ContentResponse { content }))
}

#[utoipa::path(
    get,
    path = "/canisterPrincipal",
    tag = "Ledger",
    responses((status = 200, body = PrincipalResponse))
)]
pub async fn canister_principal(
    State(state): State<AppState>,
) -> Result<Json<PrincipalResponse>, ApiError> {
    let principal = state.relay.principal().await?;
    Ok(Json(PrincipalResponse { principal }))
}

#[utoipa::path(
    get,
    path = "/schnorrPublicKey",
    tag = "Ledger",
    responses((status = 200, body = PublicKeyResponse))
)]
pub async fn schnorr_public_key(
    State(state): State<AppState>,
) -> Result<Json<PublicKeyResponse>, ApiError> {
    let key = state.relay.public_key().await?;
    Ok(Json(PublicKeyResponse { key }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> Value {
        json!([{
            "id": "tx-1",
            "status": {"Staked": null},
            "escrowMode": {"Mutual": null},
            "participantAStakeAmount": 100,
        }])
    }

    #[test]
    fn v2_unwraps_envelope_and_flattens_variants() {
        let shaped = shape_transaction(record(), ProtocolVersion::V2).unwrap();
        assert_eq!(
            shaped,
            json!({
                "id": "tx-1",
                "status": "Staked",
                "escrowMode": "Mutual",
                "participantAStakeAmount": 100,
            })
        );
    }

    #[test]
    fn v2_empty_envelope_is_absent() {
        assert!(shape_transaction(json!([]), ProtocolVersion::V2).is_none());
        assert!(shape_transaction(Value::Null, ProtocolVersion::V2).is_none());
    }

    #[test]
    fn v2_leaves_plain_fields_alone() {
        let shaped =
            shape_transaction(json!({"id": "tx", "status": "Created"}), ProtocolVersion::V2)
                .unwrap();
        assert_eq!(shaped, json!({"id": "tx", "status": "Created"}));
    }

    #[test]
    fn v1_passes_through() {
        assert_eq!(
            shape_transaction(record(), ProtocolVersion::V1).unwrap(),
            record()
        );
    }
}
