// ConfNorm: Vendor configuration normalization written in Rust
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

//! # Conversion
//!
//! This module converts a [`VendorConfiguration`] into the vendor-independent
//! [`Configuration`]. The conversion runs in a fixed order, as later stages look up the results
//! of earlier ones by name:
//!
//! 1. Filter lists ([`filters`]) are converted, so route-map match conditions can reference them.
//! 2. All route-maps are compiled ([`route_map`]) into the policy symbol table.
//! 3. Every BGP instance is converted ([`bgp`]): peer-group inheritance is resolved
//!    ([`inheritance`]), and the import and export policies of each peer are built
//!    ([`peer_policy`]).
//!
//! Interfaces and VRFs must already be part of the target configuration. Recoverable problems
//! are recorded in the [`Warnings`]; only violated preconditions abort the conversion with a
//! [`ConversionError`].

use thiserror::Error;
use vimodel::{config::Configuration, types::ConfigError};

use crate::{vendor::VendorConfiguration, warnings::Warnings};

pub mod bgp;
pub mod continuation;
pub mod filters;
pub mod inheritance;
pub mod peer_policy;
pub mod route_map;
pub mod translate;

/// Errors that abort the conversion of a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
    /// Two entries of the same route-map share a sequence number.
    #[error("Route-map {route_map} contains sequence number {sequence} more than once")]
    DuplicateSequence {
        /// Name of the route-map
        route_map: String,
        /// Duplicate sequence number
        sequence: u32,
    },
    /// Peer policies were requested for a neighbor before its peer group was merged into it.
    #[error("BGP neighbor {neighbor} in VRF {vrf} was not resolved before building its policies")]
    UnresolvedNeighbor {
        /// Name of the VRF
        vrf: String,
        /// Name of the neighbor
        neighbor: String,
    },
    /// Error while inserting into the vendor-independent configuration.
    #[error("{0}")]
    Config(#[from] ConfigError),
}

/// Convert the vendor configuration into `config`. Peer-group inheritance is resolved in place on
/// the BGP neighbors of `vendor`.
pub fn convert(
    vendor: &mut VendorConfiguration,
    config: &mut Configuration,
    warnings: &mut Warnings,
) -> Result<(), ConversionError> {
    log::info!("Convert the configuration of {}", vendor.hostname);
    if config.hostname.is_empty() {
        config.hostname = vendor.hostname.clone();
    }

    filters::convert_filters(vendor, config, warnings)?;
    route_map::compile_all(vendor, config, warnings)?;
    if let Some(bgp) = vendor.bgp.as_mut() {
        bgp::convert_bgp(bgp, config, warnings)?;
    }

    log::info!(
        "Converted {} with {} routing policies",
        vendor.hostname,
        config.routing_policies.len()
    );
    Ok(())
}
