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

//! # BGP
//!
//! Vendor-independent BGP process and peer configuration. A [`BgpProcess`] belongs to a single
//! VRF and holds all materialised peers, each referencing its import and export policy by name.

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, collections::BTreeSet, fmt, net::Ipv4Addr};

use crate::types::Asn;

/// Administrative distance of routes learned over eBGP.
pub const EBGP_ADMIN_DISTANCE: u8 = 20;
/// Administrative distance of routes learned over iBGP.
pub const IBGP_ADMIN_DISTANCE: u8 = 200;
/// Administrative distance of a generated default route.
pub const GENERATED_DEFAULT_ROUTE_ADMIN: u8 = 255;
/// MED announced when `max-med administrative` is configured without a value.
pub const DEFAULT_MAX_MED: u32 = 4_294_967_294;
/// Weight of locally originated routes.
pub const BGP_LOCAL_WEIGHT: u32 = 32768;

/// BGP process of a single VRF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BgpProcess {
    /// Router ID
    pub router_id: Ipv4Addr,
    /// Administrative distance of eBGP routes
    pub ebgp_admin: u8,
    /// Administrative distance of iBGP routes
    pub ibgp_admin: u8,
    /// eBGP multipath
    pub multipath_ebgp: bool,
    /// iBGP multipath
    pub multipath_ibgp: bool,
    /// Networks that may be originated with `network` statements.
    pub origination_space: BTreeSet<Ipv4Net>,
    /// Aggregates
    pub aggregates: Vec<BgpAggregate>,
    /// Policy selecting redistributed routes
    pub redistribution_policy: Option<String>,
    /// Policy selecting networks originated with `network` statements
    pub network_policy: Option<String>,
    /// Peers, indexed by the name of the vendor neighbor.
    pub peers: BTreeMap<String, BgpPeerConfig>,
}

impl BgpProcess {
    /// Create a new BGP process with the default admin distances and multipath enabled.
    pub fn new(router_id: Ipv4Addr) -> Self {
        Self {
            router_id,
            ebgp_admin: EBGP_ADMIN_DISTANCE,
            ibgp_admin: IBGP_ADMIN_DISTANCE,
            multipath_ebgp: true,
            multipath_ibgp: true,
            origination_space: BTreeSet::new(),
            aggregates: Vec::new(),
            redistribution_policy: None,
            network_policy: None,
            peers: BTreeMap::new(),
        }
    }

    /// Get a peer by its name.
    pub fn peer(&self, name: &str) -> Option<&BgpPeerConfig> {
        self.peers.get(name)
    }
}

/// Aggregate route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BgpAggregate {
    /// Aggregated network
    pub network: Ipv4Net,
    /// Suppress all more specific routes
    pub summary_only: bool,
    /// Policy setting the attributes of the aggregate.
    pub attribute_policy: Option<String>,
}

/// Generated route, announced to a peer if its generation policy accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedRoute {
    /// Generated network
    pub network: Ipv4Net,
    /// Administrative distance
    pub admin: u8,
    /// Policy that must accept a route for the generated route to be active.
    pub generation_policy: Option<String>,
}

/// How the session to a peer is established.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeerKind {
    /// Session to a known address
    Active {
        /// Address of the peer
        peer_ip: Ipv4Addr,
    },
    /// Unnumbered session over an interface
    Unnumbered {
        /// Local interface
        interface: String,
    },
    /// Passive session, accepting any peer within the range
    Passive {
        /// Listen range
        range: Ipv4Net,
    },
}

impl fmt::Display for PeerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerKind::Active { peer_ip } => write!(f, "{peer_ip}"),
            PeerKind::Unnumbered { interface } => write!(f, "interface {interface}"),
            PeerKind::Passive { range } => write!(f, "listen {range}"),
        }
    }
}

/// Set of AS numbers a peer may use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoteAsns {
    /// Exactly the given AS numbers.
    Only(BTreeSet<Asn>),
    /// Any AS number except the given one.
    AllExcept(Asn),
}

impl RemoteAsns {
    /// A single AS number.
    pub fn single(asn: Asn) -> Self {
        Self::Only(std::iter::once(asn).collect())
    }

    /// Returns `true` if no AS number is part of the set.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Only(asns) => asns.is_empty(),
            Self::AllExcept(_) => false,
        }
    }

    /// Check if the AS number is part of the set.
    pub fn contains(&self, asn: Asn) -> bool {
        match self {
            Self::Only(asns) => asns.contains(&asn),
            Self::AllExcept(x) => *x != asn,
        }
    }
}

impl fmt::Display for RemoteAsns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Only(asns) => write!(f, "{{{}}}", itertools::join(asns, ", ")),
            Self::AllExcept(asn) => write!(f, "!{asn}"),
        }
    }
}

/// Materialised configuration of a BGP peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BgpPeerConfig {
    /// Session type
    pub kind: PeerKind,
    /// Description
    pub description: Option<String>,
    /// Peer group the configuration was inherited from.
    pub group: Option<String>,
    /// Local AS number used on the session, if known.
    pub local_as: Option<Asn>,
    /// Local IP used on the session, if known.
    pub local_ip: Option<Ipv4Addr>,
    /// AS numbers the peer may use.
    pub remote_asns: RemoteAsns,
    /// eBGP multihop
    pub ebgp_multihop: bool,
    /// Generated routes announced to this peer.
    pub generated_routes: Vec<GeneratedRoute>,
    /// IPv4 unicast address family
    pub ipv4_unicast: Option<Ipv4UnicastAf>,
    /// L2VPN EVPN address family
    pub evpn: Option<EvpnAf>,
}

impl BgpPeerConfig {
    /// Returns `true` if the session is iBGP, i.e., the only allowed remote AS is the local AS.
    pub fn is_ibgp(&self) -> bool {
        match (&self.remote_asns, self.local_as) {
            (RemoteAsns::Only(asns), Some(local)) => asns.len() == 1 && asns.contains(&local),
            _ => false,
        }
    }
}

/// IPv4 unicast address family of a peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ipv4UnicastAf {
    /// Export policy
    pub export_policy: String,
    /// Import policy. If `None`, all routes are accepted.
    pub import_policy: Option<String>,
    /// The peer is a route-reflector client
    pub route_reflector_client: bool,
    /// Accept routes containing the local AS in their path
    pub allow_local_as_in: bool,
}

/// L2VPN EVPN address family of a peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvpnAf {
    /// Export policy
    pub export_policy: String,
    /// The peer is a route-reflector client
    pub route_reflector_client: bool,
}
