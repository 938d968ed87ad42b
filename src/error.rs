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

//! Error taxonomy for AUR RPC calls.

use thiserror::Error;

/// Boxed error produced by transports and request editors
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Literal message the service returns when a query matches too many packages
pub const TOO_MANY_RESULTS: &str = "Too many package results.";

/// Main error type for AUR RPC operations
#[derive(Debug, Error)]
pub enum AurError {
    /// The service is temporarily down (502, 503 or 504)
    #[error("AUR is unavailable at this moment (status {status})")]
    ServiceUnavailable { status: u16 },

    /// The response body did not match the RPC envelope
    #[error("response decoding failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// The service reported a failure in the envelope's `error` field
    #[error("status {status}: {message}")]
    Payload { status: u16, message: String },

    /// A request editor aborted the call before it was sent
    #[error("request editor failed: {0}")]
    RequestEditor(#[source] BoxError),

    /// The transport could not complete the request
    #[error("Network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: BoxError,
    },

    /// Unknown `by` selector
    #[error("invalid search field '{0}'")]
    InvalidSearchBy(String),

    /// The configured endpoint is not a usable URL
    #[error("invalid RPC base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// AUR package not found
    #[error("AUR package '{package}' not found")]
    PackageNotFound { package: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl AurError {
    /// Whether the caller may reasonably retry the call later.
    ///
    /// Only transient unavailability qualifies; the library itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AurError::ServiceUnavailable { .. })
    }

    /// Whether the service rejected the query for matching too many packages
    pub fn is_too_many_results(&self) -> bool {
        matches!(self, AurError::Payload { message, .. } if message == TOO_MANY_RESULTS)
    }

    /// HTTP status attached to the error, if the service answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            AurError::ServiceUnavailable { status } | AurError::Payload { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Create a network error
    pub fn network(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        AurError::Network {
            url: url.into(),
            source: source.into(),
        }
    }
}

/// Result type alias for AUR RPC operations
pub type AurResult<T> = std::result::Result<T, AurError>;
