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

//! Route representation that routing policies are evaluated on.

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::{Community, NextHop, Origin, RoutingProtocol};

/// A route, as seen by a routing policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Destination network
    pub network: Ipv4Net,
    /// Protocol that produced the route
    pub protocol: RoutingProtocol,
    /// AS path, first element is the neighboring AS.
    pub as_path: Vec<u32>,
    /// Standard communities
    pub communities: BTreeSet<Community>,
    /// Local preference
    pub local_preference: u32,
    /// MED
    pub metric: u32,
    /// Weight
    pub weight: u32,
    /// Tag
    pub tag: u32,
    /// Origin attribute
    pub origin: Origin,
    /// Next hop
    pub next_hop: NextHop,
    /// Outgoing interface, if known.
    pub interface: Option<String>,
}

impl Route {
    /// Create a new route with default attributes (local-pref 100, everything else zero or
    /// empty).
    pub fn new(network: Ipv4Net, protocol: RoutingProtocol) -> Self {
        Self {
            network,
            protocol,
            as_path: Vec::new(),
            communities: BTreeSet::new(),
            local_preference: 100,
            metric: 0,
            weight: 0,
            tag: 0,
            origin: Origin::Igp,
            next_hop: NextHop::Unset,
            interface: None,
        }
    }

    /// Returns `true` if the route is the IPv4 default route.
    pub fn is_default_route(&self) -> bool {
        self.network.prefix_len() == 0 && self.network.network().is_unspecified()
    }

    /// Set the AS path
    pub fn with_as_path(mut self, as_path: impl IntoIterator<Item = u32>) -> Self {
        self.as_path = as_path.into_iter().collect();
        self
    }

    /// Set the communities
    pub fn with_communities(mut self, communities: impl IntoIterator<Item = Community>) -> Self {
        self.communities = communities.into_iter().collect();
        self
    }

    /// Set the tag
    pub fn with_tag(mut self, tag: u32) -> Self {
        self.tag = tag;
        self
    }

    /// Set the MED
    pub fn with_metric(mut self, metric: u32) -> Self {
        self.metric = metric;
        self
    }

    /// Set the outgoing interface
    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interface = Some(interface.into());
        self
    }
}

/// Returns `true` if `asn` is a private AS number (16 or 32 bit range).
pub fn is_private_asn(asn: u32) -> bool {
    (64512..=65534).contains(&asn) || (4_200_000_000..=4_294_967_294).contains(&asn)
}
