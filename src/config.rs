// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and the validated
//! [`RelayConfig`] built from them. Configuration is loaded once at startup;
//! any missing or malformed required value aborts the process before a port
//! is bound.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `LEDGER_HOST` | Base URL of the ledger RPC gateway | Required |
//! | `LEDGER_CANISTER_ID` | Ledger identifier sent with every call | Required |
//! | `VAULT_ADDRESS` | Vault address used in staking/settling messages | Required |
//! | `VERIFIER_KEYPAIR_PATH` | Verifier identity file | Required |
//! | `ARBITRATOR_KEYPAIR_PATH` | Arbitrator identity file | Required |
//! | `PORT` | Server bind port | Required |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `AUTH_ENABLED` | Enable the bearer token gate | `false` |
//! | `AUTH_TOKEN` | Bearer secret (required when auth is enabled) | - |
//! | `LEDGER_TIMEOUT_SECS` | Per-call ledger timeout | `30` |
//! | `RELAY_PROTOCOL` | Route wiring version (`v1` or `v2`) | `v2` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=info` |

use std::{path::PathBuf, str::FromStr, time::Duration};

use url::Url;

pub const LEDGER_HOST_ENV: &str = "LEDGER_HOST";
pub const LEDGER_CANISTER_ID_ENV: &str = "LEDGER_CANISTER_ID";
pub const VAULT_ADDRESS_ENV: &str = "VAULT_ADDRESS";
pub const VERIFIER_KEYPAIR_PATH_ENV: &str = "VERIFIER_KEYPAIR_PATH";
pub const ARBITRATOR_KEYPAIR_PATH_ENV: &str = "ARBITRATOR_KEYPAIR_PATH";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const AUTH_ENABLED_ENV: &str = "AUTH_ENABLED";
pub const AUTH_TOKEN_ENV: &str = "AUTH_TOKEN";
pub const LEDGER_TIMEOUT_SECS_ENV: &str = "LEDGER_TIMEOUT_SECS";
pub const RELAY_PROTOCOL_ENV: &str = "RELAY_PROTOCOL";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default bind address when `HOST` is unset.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default upper bound for a single ledger round trip.
pub const DEFAULT_LEDGER_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} env variable missing")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// How ledger query responses are shaped for HTTP callers.
///
/// The canonical message format and transaction-id threading are the same
/// for every version; only response reshaping differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtocolVersion {
    /// Deprecated: ledger query results are returned untouched.
    V1,
    /// Variant objects are flattened to their tag and the optional-record
    /// envelope of transaction details is unwrapped.
    #[default]
    V2,
}

impl FromStr for ProtocolVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(ProtocolVersion::V1),
            "v2" | "2" => Ok(ProtocolVersion::V2),
            other => Err(format!("unknown protocol version `{other}` (expected v1 or v2)")),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "" => Ok(LogFormat::Pretty),
            other => Err(format!("unknown log format `{other}` (expected json or pretty)")),
        }
    }
}

/// Bearer gate settings.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthSetting {
    Disabled,
    Bearer(String),
}

impl std::fmt::Debug for AuthSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthSetting::Disabled => f.write_str("Disabled"),
            AuthSetting::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}

/// Validated relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub ledger_host: Url,
    pub ledger_canister_id: String,
    pub vault_address: String,
    pub verifier_keypair_path: PathBuf,
    pub arbitrator_keypair_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub auth: AuthSetting,
    pub ledger_timeout: Duration,
    pub protocol: ProtocolVersion,
}

impl RelayConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let optional = |name: &'static str| -> Option<String> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let ledger_host_raw = required(LEDGER_HOST_ENV)?;
        let ledger_host = Url::parse(&ledger_host_raw).map_err(|e| ConfigError::Invalid {
            name: LEDGER_HOST_ENV,
            reason: e.to_string(),
        })?;

        let port = required(PORT_ENV)?
            .parse::<u16>()
            .map_err(|e| ConfigError::Invalid {
                name: PORT_ENV,
                reason: e.to_string(),
            })?;

        let auth = match optional(AUTH_ENABLED_ENV) {
            Some(flag) if parse_flag(AUTH_ENABLED_ENV, &flag)? => {
                AuthSetting::Bearer(required(AUTH_TOKEN_ENV)?)
            }
            _ => AuthSetting::Disabled,
        };

        let ledger_timeout = match optional(LEDGER_TIMEOUT_SECS_ENV) {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                    name: LEDGER_TIMEOUT_SECS_ENV,
                    reason: e.to_string(),
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        name: LEDGER_TIMEOUT_SECS_ENV,
                        reason: "must be greater than zero".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_LEDGER_TIMEOUT,
        };

        let protocol = match optional(RELAY_PROTOCOL_ENV) {
            Some(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                name: RELAY_PROTOCOL_ENV,
                reason,
            })?,
            None => ProtocolVersion::default(),
        };

        Ok(Self {
            ledger_host,
            ledger_canister_id: required(LEDGER_CANISTER_ID_ENV)?,
            vault_address: required(VAULT_ADDRESS_ENV)?,
            verifier_keypair_path: PathBuf::from(required(VERIFIER_KEYPAIR_PATH_ENV)?),
            arbitrator_keypair_path: PathBuf::from(required(ARBITRATOR_KEYPAIR_PATH_ENV)?),
            host: optional(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            auth,
            ledger_timeout,
            protocol,
        })
    }

    /// Socket address string the listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            name,
            reason: format!("expected a boolean, got `{other}`"),
        }),
    }
}
