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

//! Query parameter building for RPC calls.

use std::collections::BTreeMap;

use super::SearchBy;

/// RPC interface version sent with every request
pub const RPC_VERSION: &str = "5";

/// Query parameters of one RPC call.
///
/// Keys are kept sorted so the encoded form is reproducible; repeated keys
/// (`arg[]`) keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<String, Vec<String>>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every value of `key`
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), vec![value.into()]);
    }

    /// Append a value to `key`
    pub fn add(&mut self, key: &str, value: impl Into<String>) {
        self.values
            .entry(key.to_string())
            .or_default()
            .push(value.into());
    }

    /// First value of `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// All values of `key`, empty if unset
    pub fn get_all(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Percent-encode into a query string, without the leading `?`
    pub fn encode(&self) -> String {
        self.values
            .iter()
            .flat_map(|(key, values)| {
                values.iter().map(move |value| {
                    format!(
                        "{}={}",
                        urlencoding::encode(key),
                        urlencoding::encode(value)
                    )
                })
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn with_version(mut params: Params) -> Params {
    params.set("v", RPC_VERSION);
    params
}

/// Parameters for `type=search`. `by` is omitted for [`SearchBy::Unspecified`].
pub fn build_search(query: &str, by: SearchBy) -> Params {
    let mut params = Params::new();
    params.set("type", "search");
    params.set("arg", query);

    if let Some(token) = by.token() {
        params.set("by", token);
    }

    with_version(params)
}

/// Parameters for `type=info`, one `arg[]` per name in input order
pub fn build_info<S: AsRef<str>>(names: &[S]) -> Params {
    let mut params = Params::new();
    params.set("type", "info");

    for name in names {
        params.add("arg[]", name.as_ref());
    }

    with_version(params)
}
