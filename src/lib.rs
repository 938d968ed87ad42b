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

//! Typed client for the AUR RPC interface (`/rpc.php`, version 5).
//!
//! ```no_run
//! use aurpc::{AurClient, AurRpc, SearchBy};
//!
//! # async fn run() -> aurpc::AurResult<()> {
//! let client = AurClient::new()?;
//! for pkg in client.search("cower", SearchBy::Name).await? {
//!     println!("{} {}", pkg.name, pkg.version);
//! }
//! # Ok(())
//! # }
//! ```

pub mod aur;
pub mod config;
pub mod error;

pub use aur::{AurClient, AurClientBuilder, AurRpc, Package, RequestEditor, SearchBy, Transport};
pub use config::Config;
pub use error::{AurError, AurResult};
