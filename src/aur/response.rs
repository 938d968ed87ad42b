/*
 * aurpc - Typed client for the Arch User Repository RPC interface.
 * Copyright (C) 2025  compiledkernel-idk and pacboost contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

//! Response envelope decoding and error classification.
//!
//! Classification order is fixed: unavailable status, then body decoding,
//! then the envelope's `error` field. Each step only runs when the previous
//! one passed.

use serde::Deserialize;
use tracing::trace;

use super::package::nullable;
use super::Package;
use crate::error::{AurError, AurResult};

/// AUR RPC API response wrapper
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RpcEnvelope {
    #[serde(deserialize_with = "nullable")]
    pub version: u32,
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub response_type: String,
    #[serde(deserialize_with = "nullable")]
    pub resultcount: usize,
    #[serde(deserialize_with = "nullable")]
    pub results: Vec<Package>,
    pub error: Option<String>,
}

impl RpcEnvelope {
    /// Non-empty `error` field
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }
}

/// Status codes meaning the service is temporarily down
pub fn is_service_unavailable(status: u16) -> bool {
    matches!(status, 502..=504)
}

/// Classify one response and return its packages on success.
///
/// On 502/503/504 the body is never looked at.
pub fn decode_response(status: u16, body: &[u8]) -> AurResult<Vec<Package>> {
    if is_service_unavailable(status) {
        return Err(AurError::ServiceUnavailable { status });
    }

    let envelope: RpcEnvelope = serde_json::from_slice(body)?;
    trace!(
        response_type = %envelope.response_type,
        resultcount = envelope.resultcount,
        "decoded RPC envelope"
    );

    if let Some(message) = envelope.error_message() {
        return Err(AurError::Payload {
            status,
            message: message.to_string(),
        });
    }

    Ok(envelope.results)
}
