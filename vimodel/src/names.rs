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

//! Names of generated routing policies and filter lists. All of them are wrapped in `~`, a
//! character that cannot appear in vendor-chosen names, so they never collide.

/// Policy shared by all peers that generates the default route when `default-originate` is
/// configured.
pub const DEFAULT_ROUTE_EXPORT_POLICY: &str = "~BGP_DEFAULT_ROUTE_EXPORT_POLICY~";

/// Neighbor-independent export policy of a VRF.
pub fn common_export_policy(vrf: &str) -> String {
    format!("~BGP_COMMON_EXPORT_POLICY:{vrf}~")
}

/// Export policy of a single peer.
pub fn peer_export_policy(vrf: &str, peer: &str) -> String {
    format!("~BGP_PEER_EXPORT_POLICY:{vrf}:{peer}~")
}

/// Import policy of a single peer.
pub fn peer_import_policy(vrf: &str, peer: &str) -> String {
    format!("~BGP_PEER_IMPORT_POLICY:{vrf}:{peer}~")
}

/// Policy selecting the routes redistributed into BGP.
pub fn redistribution_policy(vrf: &str) -> String {
    format!("~BGP_REDISTRIBUTION_POLICY:{vrf}~")
}

/// Policy selecting the routes originated by `network` statements.
pub fn network_policy(vrf: &str) -> String {
    format!("~BGP_NETWORK_POLICY:{vrf}~")
}

/// Route-filter list matching every route that is more specific than a `summary-only`
/// aggregate.
pub fn suppressed_summary_only(vrf: &str) -> String {
    format!("~MATCH_SUPPRESSED_SUMMARY_ONLY:{vrf}~")
}

/// Name of the segment of a compiled route-map that starts at `sequence`.
pub fn route_map_segment(route_map: &str, sequence: u32) -> String {
    format!("{route_map}#{sequence}")
}

/// Returns `true` if the name was produced by this module.
pub fn is_generated(name: &str) -> bool {
    name.len() > 1 && name.starts_with('~') && name.ends_with('~')
}
