// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Escrow lifecycle endpoints. Each handler makes exactly one ledger call.

use axum::{extract::State, Json};

use super::extract::JsonBody;
use crate::{
    error::ApiError,
    models::{
        Amount, ConfirmTradingRequest, InitializeRequest, InitiateDisputeRequest,
        ResolveDisputeRequest, SignatureResponse, SuccessResponse, TransactionIdRequest,
        TxIdResponse, VaultConfirmationRequest, DEFAULT_STAKE_DURATION, DEFAULT_TRADE_DURATION,
    },
    relay::NewEscrow,
    state::AppState,
};

fn amount(value: &Amount, field: &str) -> Result<u64, ApiError> {
    value
        .value()
        .map_err(|_| ApiError::bad_request(format!("invalid {field}: expected an unsigned integer")))
}

fn amount_or(value: Option<&Amount>, field: &str, default: u64) -> Result<u64, ApiError> {
    value.map_or(Ok(default), |v| amount(v, field))
}

#[utoipa::path(
    post,
    path = "/initialize",
    request_body = InitializeRequest,
    tag = "Escrow",
    responses(
        (status = 200, body = TxIdResponse),
        (status = 400, description = "Invalid amount or duration"),
        (status = 502, description = "Ledger rejected the call"),
        (status = 504, description = "Ledger call timed out")
    )
)]
pub async fn initialize(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<InitializeRequest>,
) -> Result<Json<TxIdResponse>, ApiError> {
    let escrow_mode = request.escrow_mode();
    let comments = request.comments();
    let participant_a_stake_amount = amount(
        &request.participant_a_stake_amount,
        "participantAShouldStakeUSDCAmount",
    )?;
    let participant_b_stake_amount = amount(
        &request.participant_b_stake_amount,
        "participantBShouldStakeUSDCAmount",
    )?;
    let stake_duration = amount_or(
        request.stake_duration.as_ref(),
        "stakeDuration",
        DEFAULT_STAKE_DURATION,
    )?;
    let trade_duration = amount_or(
        request.trade_duration.as_ref(),
        "tradeDuration",
        DEFAULT_TRADE_DURATION,
    )?;

    let tx_id = state
        .relay
        .initialize(NewEscrow {
            escrow_mode,
            comments,
            participant_a_address: request.participant_a_address,
            participant_b_address: request.participant_b_address,
            participant_a_stake_amount,
            participant_b_stake_amount,
            stake_duration,
            trade_duration,
        })
        .await?;

    Ok(Json(TxIdResponse { tx_id }))
}

#[utoipa::path(
    post,
    path = "/confirmStaking",
    request_body = VaultConfirmationRequest,
    tag = "Escrow",
    responses(
        (status = 200, body = SuccessResponse),
        (status = 400, description = "Empty transaction id or participant address"),
        (status = 502, description = "Ledger rejected the call")
    )
)]
pub async fn confirm_staking(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<VaultConfirmationRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .relay
        .confirm_staking(&request.transaction_id, &request.participant_address)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Forwards both participant signatures when both are present, otherwise
/// the relay's verifier signs.
#[utoipa::path(
    post,
    path = "/confirmTrading",
    request_body = ConfirmTradingRequest,
    tag = "Escrow",
    responses(
        (status = 200, body = SuccessResponse),
        (status = 400, description = "Malformed request body"),
        (status = 502, description = "Ledger rejected the call")
    )
)]
pub async fn confirm_trading(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ConfirmTradingRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let (participant_a, participant_b) = request.signatures();
    state
        .relay
        .confirm_trading(&request.transaction_id, participant_a, participant_b)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    post,
    path = "/confirmSettling",
    request_body = VaultConfirmationRequest,
    tag = "Escrow",
    responses(
        (status = 200, body = SuccessResponse),
        (status = 400, description = "Empty transaction id or participant address"),
        (status = 502, description = "Ledger rejected the call")
    )
)]
pub async fn confirm_settling(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<VaultConfirmationRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .relay
        .confirm_settling(&request.transaction_id, &request.participant_address)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    post,
    path = "/initiateDispute",
    request_body = InitiateDisputeRequest,
    tag = "Dispute",
    responses(
        (status = 200, body = SuccessResponse),
        (status = 400, description = "Empty transaction id or participant address"),
        (status = 502, description = "Ledger rejected the call")
    )
)]
pub async fn initiate_dispute(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<InitiateDisputeRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .relay
        .initiate_dispute(
            &request.transaction_id,
            &request.participant_address,
            request.participant_signature.into(),
        )
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Always signed by the arbitrator identity.
#[utoipa::path(
    post,
    path = "/resolveDispute",
    request_body = ResolveDisputeRequest,
    tag = "Dispute",
    responses(
        (status = 200, body = SuccessResponse),
        (status = 400, description = "Invalid amount"),
        (status = 502, description = "Ledger rejected the call")
    )
)]
pub async fn resolve_dispute(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ResolveDisputeRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let amount_a = amount(
        &request.participant_a_withdrawable_amount,
        "participantAWithdrawableUSDCAmount",
    )?;
    let amount_b = amount(
        &request.participant_b_withdrawable_amount,
        "participantBWithdrawableUSDCAmount",
    )?;
    state
        .relay
        .resolve_dispute(&request.transaction_id, &request.comments, amount_a, amount_b)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    post,
    path = "/signWithSchnorr",
    request_body = TransactionIdRequest,
    tag = "Ledger",
    responses(
        (status = 200, body = SignatureResponse),
        (status = 400, description = "Malformed request body"),
        (status = 502, description = "Ledger rejected the call")
    )
)]
pub async fn sign_with_schnorr(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<TransactionIdRequest>,
) -> Result<Json<SignatureResponse>, ApiError> {
    let signature = state.relay.sign_with_schnorr(&request.transaction_id).await?;
    Ok(Json(SignatureResponse { signature }))
}
