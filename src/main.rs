// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;
use std::sync::Arc;

use escrow_relay::{
    api::router,
    attestation::{load_or_create, KeyStoreError},
    auth::AuthGate,
    config::{ConfigError, LogFormat, RelayConfig, LOG_FORMAT_ENV},
    ledger::{HttpLedger, LedgerError},
    logging,
    relay::{EscrowRelay, RelayError},
    state::AppState,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Anything that stops the process before or while serving.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("identity: {0}")]
    KeyStore(#[from] KeyStoreError),
    #[error("ledger client: {0}")]
    Ledger(#[from] LedgerError),
    #[error("principal resolution: {0}")]
    Principal(#[from] RelayError),
    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; the process environment still applies.
    let _ = dotenvy::dotenv();

    let log_format = std::env::var(LOG_FORMAT_ENV)
        .ok()
        .map(|v| v.parse::<LogFormat>());
    logging::init(match &log_format {
        Some(Ok(format)) => *format,
        _ => LogFormat::default(),
    });
    if let Some(Err(e)) = log_format {
        warn!(error = %e, "Ignoring {LOG_FORMAT_ENV}");
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Escrow relay stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = RelayConfig::from_env()?;
    info!(
        ledger = %config.ledger_host,
        canister_id = %config.ledger_canister_id,
        protocol = ?config.protocol,
        auth = ?config.auth,
        "Loaded configuration"
    );

    let verifier = Arc::new(load_or_create(&config.verifier_keypair_path)?);
    let arbitrator = Arc::new(load_or_create(&config.arbitrator_keypair_path)?);
    info!(
        verifier = verifier.public_key(),
        arbitrator = arbitrator.public_key(),
        "Loaded identities"
    );

    let ledger = HttpLedger::new(
        config.ledger_host.clone(),
        config.ledger_canister_id.clone(),
        config.ledger_timeout,
    )?;
    let relay = EscrowRelay::connect(
        Arc::new(ledger),
        verifier,
        arbitrator,
        config.vault_address.clone(),
        config.ledger_timeout,
    )
    .await?;

    let app = router(
        AppState::new(relay, config.protocol),
        AuthGate::from(&config.auth),
    );

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Escrow relay listening on http://{addr} (docs at /docs)");

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Escrow relay shut down");
    Ok(())
}

async fn wait_for_signal(shutdown: CancellationToken) {
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                warn!(error = %e, "Cannot listen for Ctrl-C");
                return;
            }
        }
        _ = terminate => {}
    }

    info!("Shutdown signal received");
    shutdown.cancel();
}
