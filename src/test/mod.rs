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

use ipnet::Ipv4Net;
use vimodel::{
    config::{Configuration, Interface, DEFAULT_VRF},
    route::Route,
    types::RoutingProtocol,
};

mod inheritance;
mod pipeline;

/// Shorthand to build an eBGP route for the given network.
fn route(net: &str) -> Route {
    Route::new(net.parse::<Ipv4Net>().unwrap(), RoutingProtocol::Bgp)
}

/// Configuration with the default VRF and a few interfaces:
///
/// - `lo`: 1.1.1.1/32
/// - `eth0`: 10.0.0.0/31
/// - `eth1`: 192.168.1.1/24
/// - `swp1`: no address
fn base_config() -> Configuration {
    let mut c = Configuration::new("r1");
    c.add_vrf(DEFAULT_VRF);
    c.add_interface(Interface::new("lo", Some("1.1.1.1/32".parse().unwrap())));
    c.add_interface(Interface::new("eth0", Some("10.0.0.0/31".parse().unwrap())));
    c.add_interface(Interface::new("eth1", Some("192.168.1.1/24".parse().unwrap())));
    c.add_interface(Interface::new("swp1", None));
    c
}
