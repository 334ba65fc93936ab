// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{require_bearer, AuthGate},
    models::{
        Amount, ConfirmTradingRequest, ContentResponse, InitializeRequest,
        InitiateDisputeRequest, PrincipalResponse, PublicKeyResponse, ResolveDisputeRequest,
        SignatureResponse, SuccessResponse, TransactionIdRequest, TxIdResponse,
        VaultConfirmationRequest,
    },
    state::AppState,
};

pub mod escrow;
pub mod extract;
pub mod health;
pub mod queries;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the HTTP surface. Everything except `/health` and `/docs` sits
/// behind `gate`.
pub fn router(state: AppState, gate: AuthGate) -> Router {
    let relay_routes = Router::new()
        .route("/initialize", post(escrow::initialize))
        .route("/confirmStaking", post(escrow::confirm_staking))
        .route("/confirmTrading", post(escrow::confirm_trading))
        .route("/confirmSettling", post(escrow::confirm_settling))
        .route("/initiateDispute", post(escrow::initiate_dispute))
        .route("/resolveDispute", post(escrow::resolve_dispute))
        .route("/signWithSchnorr", post(escrow::sign_with_schnorr))
        .route("/transaction/{id}", get(queries::transaction_details))
        .route("/proof/{id}", get(queries::proof_details))
        .route(
            "/signWithSchnorrContent/{id}",
            get(queries::sign_with_schnorr_content),
        )
        .route("/canisterPrincipal", get(queries::canister_principal))
        .route("/schnorrPublicKey", get(queries::schnorr_public_key))
        .route_layer(middleware::from_fn_with_state(gate, require_bearer))
        .with_state(state);

    Router::new()
        .route("/health", get(health::health))
        .merge(relay_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        let request_id = request
                            .headers()
                            .get(REQUEST_ID_HEADER)
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("-");
                        tracing::info_span!(
                            "http",
                            method = %request.method(),
                            path = %request.uri().path(),
                            request_id
                        )
                    }),
                )
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        escrow::initialize,
        escrow::confirm_staking,
        escrow::confirm_trading,
        escrow::confirm_settling,
        escrow::initiate_dispute,
        escrow::resolve_dispute,
        escrow::sign_with_schnorr,
        queries::transaction_details,
        queries::proof_details,
        queries::sign_with_schnorr_content,
        queries::canister_principal,
        queries::schnorr_public_key,
        health::health
    ),
    components(
        schemas(
            Amount,
            InitializeRequest,
            VaultConfirmationRequest,
            ConfirmTradingRequest,
            InitiateDisputeRequest,
            ResolveDisputeRequest,
            TransactionIdRequest,
            TxIdResponse,
            SuccessResponse,
            PrincipalResponse,
            PublicKeyResponse,
            SignatureResponse,
            ContentResponse,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Escrow", description = "Escrow lifecycle confirmations"),
        (name = "Dispute", description = "Dispute initiation and arbitration"),
        (name = "Queries", description = "Transaction and proof lookups"),
        (name = "Ledger", description = "Ledger identity and threshold signing"),
        (name = "Health", description = "Liveness probe")
    )
)]
struct ApiDoc;
