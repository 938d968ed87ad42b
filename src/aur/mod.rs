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

//! AUR (Arch User Repository) RPC support module.
//!
//! This module provides:
//! - Request parameter building for `search` and `info` calls
//! - Envelope decoding and error classification
//! - A pluggable transport with a `reqwest` default
//! - Request editors that run before every call

pub mod client;
pub mod editor;
pub mod package;
pub mod request;
pub mod response;
pub mod transport;

pub use client::{AurClient, AurClientBuilder, AurRpc, DEFAULT_RPC_URL};
pub use editor::RequestEditor;
pub use package::Package;
pub use request::{build_info, build_search, Params};
pub use response::{decode_response, RpcEnvelope};
pub use transport::{ReqwestTransport, RpcRequest, RpcResponse, Transport};

use std::fmt;
use std::str::FromStr;

use crate::error::AurError;

/// Field a `search` call matches against (the RPC `by` parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchBy {
    Name,
    /// Name and description, what the service uses when `by` is omitted
    NameDesc,
    Maintainer,
    Depends,
    MakeDepends,
    OptDepends,
    CheckDepends,
    /// Omit `by` and let the service default apply
    #[default]
    Unspecified,
}

impl SearchBy {
    /// Every selector that has a wire token
    pub const ALL: [SearchBy; 7] = [
        SearchBy::Name,
        SearchBy::NameDesc,
        SearchBy::Maintainer,
        SearchBy::Depends,
        SearchBy::MakeDepends,
        SearchBy::OptDepends,
        SearchBy::CheckDepends,
    ];

    /// Wire token for the `by` parameter, `None` for [`SearchBy::Unspecified`]
    pub fn token(self) -> Option<&'static str> {
        match self {
            SearchBy::Name => Some("name"),
            SearchBy::NameDesc => Some("name-desc"),
            SearchBy::Maintainer => Some("maintainer"),
            SearchBy::Depends => Some("depends"),
            SearchBy::MakeDepends => Some("makedepends"),
            SearchBy::OptDepends => Some("optdepends"),
            SearchBy::CheckDepends => Some("checkdepends"),
            SearchBy::Unspecified => None,
        }
    }
}

impl fmt::Display for SearchBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token().unwrap_or(""))
    }
}

impl FromStr for SearchBy {
    type Err = AurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(SearchBy::Unspecified);
        }
        SearchBy::ALL
            .into_iter()
            .find(|by| by.token() == Some(s))
            .ok_or_else(|| AurError::InvalidSearchBy(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        assert_eq!(SearchBy::Name.token(), Some("name"));
        assert_eq!(SearchBy::NameDesc.token(), Some("name-desc"));
        assert_eq!(SearchBy::MakeDepends.token(), Some("makedepends"));
        assert_eq!(SearchBy::Unspecified.token(), None);
        assert_eq!(SearchBy::Unspecified.to_string(), "");
    }

    #[test]
    fn test_parse_round_trips_every_token() {
        for by in SearchBy::ALL {
            let token = by.token().unwrap();
            assert_eq!(token.parse::<SearchBy>().unwrap(), by);
        }
        assert_eq!("".parse::<SearchBy>().unwrap(), SearchBy::Unspecified);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "submitter".parse::<SearchBy>().unwrap_err();
        assert!(matches!(err, AurError::InvalidSearchBy(ref s) if s == "submitter"));
        assert!("Name".parse::<SearchBy>().is_err());
    }
}
