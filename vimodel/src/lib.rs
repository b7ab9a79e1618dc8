// VIModel: Vendor-independent network model written in Rust
// Copyright (C) 2022-2023 Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

#![deny(missing_docs, missing_debug_implementations)]

//! # VIModel
//!
//! Vendor-independent network model. Vendor configurations are normalized into a
//! [`config::Configuration`], which holds a flat symbol table of named routing policies, the
//! filter lists these policies reference, and the per-VRF BGP processes with their materialised
//! peers.
//!
//! ## Main Concepts
//!
//! A [`policy::RoutingPolicy`] is a named list of [`policy::Statement`]s. Policies call each
//! other with [`policy::BooleanExpr::Call`], which evaluates the callee and uses its result as a
//! boolean. A policy evaluated at top level (as import or export policy of a peer) accepts or
//! rejects the route instead. Each evaluation carries a *local default action*, which starts as
//! reject and is inherited by called policies.
//!
//! The module [`eval`] contains a reference evaluator with exactly these semantics, and
//! [`formatter`] renders policies in a readable form.
//!
//! ## Example usage
//!
//! ```
//! use vimodel::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Configuration::new("r1");
//!     config.add_routing_policy(RoutingPolicy::new(
//!         "reject-default",
//!         vec![
//!             Statement::if_then(BooleanExpr::MatchDefaultRoute, vec![Statement::ExitReject]),
//!             Statement::ExitAccept,
//!         ],
//!     ))?;
//!
//!     let default = Route::new("0.0.0.0/0".parse()?, RoutingProtocol::Static);
//!     let other = Route::new("10.0.0.0/8".parse()?, RoutingProtocol::Static);
//!     assert!(!evaluate(&config, "reject-default", &default)?.accepted);
//!     assert!(evaluate(&config, "reject-default", &other)?.accepted);
//!     Ok(())
//! }
//! ```

pub mod bgp;
pub mod config;
pub mod eval;
pub mod filters;
pub mod formatter;
pub mod names;
pub mod policy;
pub mod route;
pub mod types;

#[cfg(test)]
mod test;

/// Prelude module, exporting the most commonly used types.
pub mod prelude {
    pub use crate::bgp::{BgpPeerConfig, BgpProcess, PeerKind, RemoteAsns};
    pub use crate::config::{Configuration, Interface, Vrf, DEFAULT_VRF};
    pub use crate::eval::{evaluate, PolicyOutcome};
    pub use crate::formatter::ConfigFormatter;
    pub use crate::policy::{call_in_context, BooleanExpr, RoutingPolicy, Statement};
    pub use crate::route::Route;
    pub use crate::types::{
        Community, ConfigError, DefaultAction, EvalError, LineAction, NextHop, Origin,
        RoutingProtocol,
    };
}
