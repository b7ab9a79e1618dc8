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

use pretty_assertions::assert_eq;

use crate::{
    config::{Configuration, Interface, DEFAULT_VRF},
    filters::RouteFilterList,
    names,
    policy::{RoutingPolicy, Statement},
    types::ConfigError,
};

#[test]
fn duplicate_policy_is_rejected() {
    let mut c = Configuration::new("r1");
    c.add_routing_policy(RoutingPolicy::new("rm", vec![Statement::ExitAccept]))
        .unwrap();
    assert_eq!(
        c.add_routing_policy(RoutingPolicy::new("rm", vec![Statement::ExitReject])),
        Err(ConfigError::PolicyExists("rm".to_string()))
    );
    // the first policy is kept
    assert_eq!(
        c.routing_policy("rm").unwrap().statements,
        vec![Statement::ExitAccept]
    );
}

#[test]
fn duplicate_filter_is_rejected() {
    let mut c = Configuration::new("r1");
    c.add_route_filter_list(RouteFilterList::new("pl", vec![]))
        .unwrap();
    assert_eq!(
        c.add_route_filter_list(RouteFilterList::new("pl", vec![])),
        Err(ConfigError::FilterExists("pl".to_string()))
    );
}

#[test]
fn vrfs_and_interfaces() {
    let mut c = Configuration::new("r1");
    c.add_vrf(DEFAULT_VRF);
    assert!(c.vrf(DEFAULT_VRF).is_some());
    assert_eq!(
        c.vrf_mut("blue").err(),
        Some(ConfigError::VrfNotFound("blue".to_string()))
    );

    c.add_interface(Interface::new("eth0", Some("10.0.0.1/31".parse().unwrap())));
    c.add_interface(Interface::new("eth1", None).in_vrf("blue"));
    assert_eq!(
        c.interfaces_in_vrf(DEFAULT_VRF)
            .map(|i| i.name.as_str())
            .collect::<Vec<_>>(),
        vec!["eth0"]
    );
    assert_eq!(
        c.interface("eth0").unwrap().ip(),
        Some("10.0.0.1".parse().unwrap())
    );
}

#[test]
fn generated_names() {
    assert_eq!(
        names::peer_export_policy("default", "10.0.0.1"),
        "~BGP_PEER_EXPORT_POLICY:default:10.0.0.1~"
    );
    assert_eq!(names::route_map_segment("RM", 20), "RM#20");
    assert!(names::is_generated(names::DEFAULT_ROUTE_EXPORT_POLICY));
    assert!(names::is_generated(&names::common_export_policy("default")));
    assert!(!names::is_generated("RM#20"));
    assert!(!names::is_generated("~"));
}
