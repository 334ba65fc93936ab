// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::config::ProtocolVersion;
use crate::relay::EscrowRelay;

/// Shared handler state. Everything in it is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<EscrowRelay>,
    pub protocol: ProtocolVersion,
}

impl AppState {
    pub fn new(relay: EscrowRelay, protocol: ProtocolVersion) -> Self {
        Self {
            relay: Arc::new(relay),
            protocol,
        }
    }
}
