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

//! # Vendor-independent configuration
//!
//! The [`Configuration`] is the sink of the normalization pipeline. It holds a single, flat
//! symbol table of routing policies, the filter lists they reference, and the VRFs and
//! interfaces of the device. Insertions never overwrite existing entries; adding a name twice
//! results in a [`ConfigError`].

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, net::Ipv4Addr};

use crate::{
    bgp::BgpProcess,
    filters::{AsPathList, CommunityList, RouteFilterList},
    policy::RoutingPolicy,
    types::ConfigError,
};

/// Name of the default VRF
pub const DEFAULT_VRF: &str = "default";

/// Name of the loopback interface.
pub const LOOPBACK_INTERFACE: &str = "lo";

/// Vendor-independent configuration of a single device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Hostname of the device
    pub hostname: String,
    /// Symbol table of all routing policies.
    pub routing_policies: BTreeMap<String, RoutingPolicy>,
    /// Route-filter lists
    pub route_filter_lists: BTreeMap<String, RouteFilterList>,
    /// Community lists
    pub community_lists: BTreeMap<String, CommunityList>,
    /// AS-path lists
    pub as_path_lists: BTreeMap<String, AsPathList>,
    /// VRFs
    pub vrfs: BTreeMap<String, Vrf>,
    /// Interfaces
    pub interfaces: BTreeMap<String, Interface>,
}

impl Configuration {
    /// Create an empty configuration
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            ..Default::default()
        }
    }

    /// Add a routing policy to the symbol table. This function returns an error if a policy
    /// with the same name already exists, leaving the existing policy untouched.
    pub fn add_routing_policy(&mut self, policy: RoutingPolicy) -> Result<(), ConfigError> {
        if self.routing_policies.contains_key(&policy.name) {
            return Err(ConfigError::PolicyExists(policy.name));
        }
        log::trace!("add routing policy {}", policy.name);
        self.routing_policies.insert(policy.name.clone(), policy);
        Ok(())
    }

    /// Get a routing policy by its name.
    pub fn routing_policy(&self, name: &str) -> Option<&RoutingPolicy> {
        self.routing_policies.get(name)
    }

    /// Check if a routing policy with the given name exists.
    pub fn has_routing_policy(&self, name: &str) -> bool {
        self.routing_policies.contains_key(name)
    }

    /// Add a route-filter list
    pub fn add_route_filter_list(&mut self, list: RouteFilterList) -> Result<(), ConfigError> {
        if self.route_filter_lists.contains_key(&list.name) {
            return Err(ConfigError::FilterExists(list.name));
        }
        self.route_filter_lists.insert(list.name.clone(), list);
        Ok(())
    }

    /// Add a community list
    pub fn add_community_list(&mut self, list: CommunityList) -> Result<(), ConfigError> {
        if self.community_lists.contains_key(&list.name) {
            return Err(ConfigError::FilterExists(list.name));
        }
        self.community_lists.insert(list.name.clone(), list);
        Ok(())
    }

    /// Add an AS-path list
    pub fn add_as_path_list(&mut self, list: AsPathList) -> Result<(), ConfigError> {
        if self.as_path_lists.contains_key(&list.name) {
            return Err(ConfigError::FilterExists(list.name));
        }
        self.as_path_lists.insert(list.name.clone(), list);
        Ok(())
    }

    /// Add a VRF. An already existing VRF with the same name is kept.
    pub fn add_vrf(&mut self, name: impl Into<String>) -> &mut Vrf {
        let name = name.into();
        self.vrfs
            .entry(name.clone())
            .or_insert_with(|| Vrf::new(name))
    }

    /// Get a VRF by its name.
    pub fn vrf(&self, name: &str) -> Option<&Vrf> {
        self.vrfs.get(name)
    }

    /// Get a mutable reference to a VRF, or an error if it does not exist.
    pub fn vrf_mut(&mut self, name: &str) -> Result<&mut Vrf, ConfigError> {
        self.vrfs
            .get_mut(name)
            .ok_or_else(|| ConfigError::VrfNotFound(name.to_string()))
    }

    /// Add an interface, replacing any interface with the same name.
    pub fn add_interface(&mut self, interface: Interface) {
        self.interfaces.insert(interface.name.clone(), interface);
    }

    /// Get an interface by its name.
    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.get(name)
    }

    /// Iterate over all interfaces that belong to the given VRF.
    pub fn interfaces_in_vrf<'a>(
        &'a self,
        vrf: &'a str,
    ) -> impl Iterator<Item = &'a Interface> + 'a {
        self.interfaces.values().filter(move |i| i.vrf == vrf)
    }
}

/// Virtual routing and forwarding instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vrf {
    /// Name of the VRF
    pub name: String,
    /// BGP process of the VRF, if any.
    pub bgp_process: Option<BgpProcess>,
}

impl Vrf {
    /// Create a VRF without any routing process.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bgp_process: None,
        }
    }
}

/// Layer-3 interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    /// Name of the interface
    pub name: String,
    /// VRF the interface belongs to
    #[serde(default = "default_vrf")]
    pub vrf: String,
    /// Primary address, including the prefix length of the connected network.
    pub address: Option<Ipv4Net>,
}

fn default_vrf() -> String {
    DEFAULT_VRF.to_string()
}

impl Interface {
    /// Create an interface in the default VRF.
    pub fn new(name: impl Into<String>, address: Option<Ipv4Net>) -> Self {
        Self {
            name: name.into(),
            vrf: default_vrf(),
            address,
        }
    }

    /// Move the interface into another VRF.
    pub fn in_vrf(mut self, vrf: impl Into<String>) -> Self {
        self.vrf = vrf.into();
        self
    }

    /// Address of the interface (without prefix length).
    pub fn ip(&self) -> Option<Ipv4Addr> {
        self.address.map(|a| a.addr())
    }
}
