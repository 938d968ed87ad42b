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

//! Request editors: hooks that inspect or modify a request before it is sent.

use reqwest::header::{HeaderName, HeaderValue};
use std::sync::Arc;

use super::RpcRequest;
use crate::error::{AurError, AurResult, BoxError};

/// Hook run on every outgoing request.
///
/// Returning an error aborts the call before any network I/O.
pub trait RequestEditor: Send + Sync {
    fn edit(&self, request: &mut RpcRequest) -> Result<(), BoxError>;
}

impl<F> RequestEditor for F
where
    F: Fn(&mut RpcRequest) -> Result<(), BoxError> + Send + Sync,
{
    fn edit(&self, request: &mut RpcRequest) -> Result<(), BoxError> {
        self(request)
    }
}

/// Sets a fixed header on every request
#[derive(Debug, Clone)]
pub struct SetHeader {
    name: HeaderName,
    value: HeaderValue,
}

impl SetHeader {
    pub fn new(name: &str, value: &str) -> Result<Self, BoxError> {
        Ok(Self {
            name: HeaderName::from_bytes(name.as_bytes())?,
            value: HeaderValue::from_str(value)?,
        })
    }

    /// Parse a `Name: value` pair as given on the command line
    pub fn parse(pair: &str) -> Result<Self, BoxError> {
        let (name, value) = pair
            .split_once(':')
            .ok_or_else(|| format!("expected 'Name: value', got '{}'", pair))?;
        Self::new(name.trim(), value.trim())
    }
}

impl RequestEditor for SetHeader {
    fn edit(&self, request: &mut RpcRequest) -> Result<(), BoxError> {
        request.headers.insert(self.name.clone(), self.value.clone());
        Ok(())
    }
}

/// Run `client_editors` then `call_editors`, stopping at the first failure
pub(crate) fn apply_editors(
    request: &mut RpcRequest,
    client_editors: &[Arc<dyn RequestEditor>],
    call_editors: &[Arc<dyn RequestEditor>],
) -> AurResult<()> {
    for editor in client_editors.iter().chain(call_editors) {
        editor.edit(request).map_err(AurError::RequestEditor)?;
    }
    Ok(())
}
