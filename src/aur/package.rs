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

//! Package records as returned by the RPC `results` array.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Web root the `URLPath` of a package is relative to
pub const AUR_WEB_ROOT: &str = "https://aur.archlinux.org";

/// AUR package information from RPC API
///
/// Label lists are never absent: a missing field, `null` and `[]` all decode
/// to an empty `Vec`. Only `out_of_date` and `maintainer` can be `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Package {
    #[serde(rename = "ID", default, deserialize_with = "nullable")]
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(rename = "PackageBaseID", default, deserialize_with = "nullable")]
    pub package_base_id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub package_base: String,
    #[serde(default, deserialize_with = "nullable")]
    pub version: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(rename = "URL", default, deserialize_with = "nullable")]
    pub url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub num_votes: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub popularity: f64,
    /// Flagged out-of-date timestamp
    #[serde(default)]
    pub out_of_date: Option<i64>,
    /// `None` for orphaned packages
    #[serde(default)]
    pub maintainer: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub first_submitted: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub last_modified: i64,
    #[serde(rename = "URLPath", default, deserialize_with = "nullable")]
    pub url_path: String,

    // Dependencies
    #[serde(default, deserialize_with = "nullable")]
    pub depends: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub make_depends: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub check_depends: Vec<String>,
    /// Entries may carry a `: reason` suffix, kept as-is
    #[serde(default, deserialize_with = "nullable")]
    pub opt_depends: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub conflicts: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub provides: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub replaces: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub groups: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub license: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub keywords: Vec<String>,
}

/// Treat an explicit `null` like a missing field.
pub(super) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Package {
    /// No maintainer assigned
    pub fn is_orphan(&self) -> bool {
        self.maintainer.is_none()
    }

    pub fn is_out_of_date(&self) -> bool {
        self.out_of_date.is_some()
    }

    /// Get the snapshot download URL, `URLPath` resolved against `web_root`
    pub fn snapshot_url(&self, web_root: &str) -> String {
        format!(
            "{}/{}",
            web_root.trim_end_matches('/'),
            self.url_path.trim_start_matches('/')
        )
    }

    pub fn first_submitted_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.first_submitted, 0)
    }

    pub fn last_modified_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.last_modified, 0)
    }

    pub fn out_of_date_at(&self) -> Option<DateTime<Utc>> {
        self.out_of_date.and_then(|ts| DateTime::from_timestamp(ts, 0))
    }
}
