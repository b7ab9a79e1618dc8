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

//! # ConfNorm: Vendor configuration normalization
//!
//! This crate translates the configuration of a single router (as produced by a parser) into the
//! vendor-independent model of the [`vimodel`] crate. Two parts of this translation are tightly
//! coupled:
//!
//! - Route-maps are compiled into a graph of named routing policies with call, return, accept and
//!   reject control flow. A compiled route-map can be used both as a boolean sub-expression of
//!   another policy and as a terminal import or export policy.
//! - BGP neighbors inherit unset attributes from their peer groups, and every neighbor gets an
//!   export and (optionally) an import policy that call into the compiled route-maps.
//!
//! ## Structure
//! The source code of this program is structured as follows:
//! - The module [`vendor`] contains the vendor configuration: route-maps
//!   ([`vendor::route_map`]), filter lists ([`vendor::filters`]), and the BGP instances with
//!   their neighbors and peer groups ([`vendor::bgp`]).
//! - The module [`convert`] (function [`convert()`]) contains the conversion pipeline. It
//!   contains the continuation analysis ([`convert::continuation`]), the route-map compiler
//!   ([`convert::route_map`]), the peer-group resolver ([`convert::inheritance`]) and the peer
//!   policy builder ([`convert::peer_policy`]).
//! - Problems found during the conversion are collected in [`Warnings`].
//!
//! ## Example usage
//!
//! ```
//! use confnorm::prelude::*;
//! use vimodel::prelude::*;
//!
//! fn main() -> Result<(), ConversionError> {
//!     let mut vendor = VendorConfiguration::new("r1");
//!     vendor.add_route_map(RouteMap::new(
//!         "EXPORT",
//!         vec![
//!             RouteMapEntryBuilder::new().sequence(10).permit().match_tag(1).build(),
//!             RouteMapEntryBuilder::new().sequence(20).deny().build(),
//!         ],
//!     ));
//!
//!     let mut config = Configuration::new("r1");
//!     let mut warnings = Warnings::new();
//!     convert(&mut vendor, &mut config, &mut warnings)?;
//!
//!     let tagged = Route::new("10.0.0.0/8".parse().unwrap(), RoutingProtocol::Bgp).with_tag(1);
//!     assert!(evaluate(&config, "EXPORT", &tagged).unwrap().accepted);
//!     Ok(())
//! }
//! ```

#![deny(
    missing_docs,
    clippy::missing_docs_in_private_items,
    missing_debug_implementations,
    rust_2018_idioms
)]

pub mod convert;
pub mod vendor;
pub mod warnings;

pub use convert::{convert, ConversionError};
pub use warnings::Warnings;

#[cfg(test)]
mod test;

/// Prelude module, exporting the most commonly used types of the vendor model and the
/// conversion.
pub mod prelude {
    pub use crate::convert::{convert, ConversionError};
    pub use crate::vendor::bgp::{
        BgpNeighbor, BgpNeighborIpv4Unicast, BgpNeighborKind, BgpVrf, RemoteAs,
    };
    pub use crate::vendor::route_map::{RouteMap, RouteMapEntry, RouteMapEntryBuilder};
    pub use crate::vendor::VendorConfiguration;
    pub use crate::warnings::Warnings;
}
