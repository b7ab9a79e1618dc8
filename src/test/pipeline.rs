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

use pretty_assertions::assert_eq;
use std::net::Ipv4Addr;
use test_log::test;

use vimodel::{
    bgp::{PeerKind, RemoteAsns},
    config::{Configuration, DEFAULT_VRF},
    eval::evaluate,
    formatter::ConfigFormatter,
    names,
};

use super::{base_config, route};
use crate::{
    convert,
    vendor::{
        bgp::{BgpNeighbor, BgpVrf, RemoteAs},
        route_map::{RouteMap, RouteMapEntryBuilder},
        VendorConfiguration,
    },
    warnings::Warnings,
};

/// Vendor configuration with an eBGP neighbor in the peer group `PG`, which exports through
/// the route-map `R`.
fn vendor(route_map: RouteMap) -> VendorConfiguration {
    let mut vendor = VendorConfiguration::new("r1");
    vendor.add_route_map(route_map);

    let mut group = BgpNeighbor::new_peer_group("PG");
    group.remote_as = Some(RemoteAs::Explicit(65000));
    group.ipv4_unicast_mut().route_map_out = Some("R".to_string());
    let mut neighbor = BgpNeighbor::ip(Ipv4Addr::new(10, 0, 0, 1));
    neighbor.peer_group = Some("PG".to_string());

    let mut vrf = BgpVrf::new(DEFAULT_VRF, Some(65001));
    vrf.add_neighbor(group).add_neighbor(neighbor);
    vendor.bgp_mut().vrfs.insert(DEFAULT_VRF.to_string(), vrf);
    vendor
}

fn run(mut vendor: VendorConfiguration) -> (VendorConfiguration, Configuration, Warnings) {
    let mut config = base_config();
    let mut warnings = Warnings::new();
    convert(&mut vendor, &mut config, &mut warnings).unwrap();
    (vendor, config, warnings)
}

#[test]
fn permit_then_deny_exports_everything() {
    let (_, config, warnings) = run(vendor(RouteMap::new(
        "R",
        vec![
            RouteMapEntryBuilder::new().sequence(10).permit().build(),
            RouteMapEntryBuilder::new().sequence(20).deny().build(),
        ],
    )));
    assert!(warnings.is_empty());

    let export = names::peer_export_policy(DEFAULT_VRF, "10.0.0.1");
    for net in ["10.0.0.0/8", "192.168.0.0/16", "0.0.0.0/0"] {
        assert!(evaluate(&config, &export, &route(net)).unwrap().accepted);
    }
}

#[test]
fn peer_group_remote_as() {
    let (vendor, config, _) = run(vendor(RouteMap::new(
        "R",
        vec![RouteMapEntryBuilder::new().match_tag(1).build()],
    )));

    let neighbor = &vendor.bgp.as_ref().unwrap().vrfs[DEFAULT_VRF].neighbors["10.0.0.1"];
    assert!(neighbor.is_resolved());
    assert_eq!(neighbor.remote_as, Some(RemoteAs::Explicit(65000)));

    let process = config
        .vrf(DEFAULT_VRF)
        .unwrap()
        .bgp_process
        .as_ref()
        .unwrap();
    assert_eq!(process.peers.len(), 1);
    let peer = process.peer("10.0.0.1").unwrap();
    assert_eq!(
        peer.kind,
        PeerKind::Active {
            peer_ip: Ipv4Addr::new(10, 0, 0, 1)
        }
    );
    assert_eq!(peer.remote_asns, RemoteAsns::single(65000));
    assert_eq!(peer.local_ip, Some(Ipv4Addr::new(10, 0, 0, 0)));
    assert_eq!(peer.group.as_deref(), Some("PG"));

    let export = &peer.ipv4_unicast.as_ref().unwrap().export_policy;
    assert!(evaluate(&config, export, &route("10.0.0.0/8").with_tag(1)).unwrap().accepted);
    assert!(!evaluate(&config, export, &route("10.0.0.0/8")).unwrap().accepted);
}

#[test]
fn policies_can_be_printed() {
    let (_, config, _) = run(vendor(RouteMap::new(
        "R",
        vec![
            RouteMapEntryBuilder::new().sequence(10).continue_next().build(),
            RouteMapEntryBuilder::new().sequence(20).deny().build(),
        ],
    )));
    let printed = config.fmt(&config);
    assert!(printed.contains("policy R {"));
    assert!(printed.contains("policy R#20 {"));
    assert!(printed.contains(&format!(
        "policy {} {{",
        names::peer_export_policy(DEFAULT_VRF, "10.0.0.1")
    )));
}

#[test]
fn duplicate_sequence_aborts() {
    let mut vendor = vendor(RouteMap::new(
        "R",
        vec![
            RouteMapEntryBuilder::new().sequence(10).build(),
            RouteMapEntryBuilder::new().sequence(10).build(),
        ],
    ));
    let mut config = base_config();
    assert!(matches!(
        convert(&mut vendor, &mut config, &mut Warnings::new()),
        Err(crate::ConversionError::DuplicateSequence { sequence: 10, .. })
    ));
}

#[cfg(feature = "serde")]
#[test]
fn from_json() {
    let json = r#"{
        "hostname": "r1",
        "prefix_lists": {
            "PL": {
                "name": "PL",
                "lines": [
                    {"sequence": 5, "action": "Permit", "prefix": "10.0.0.0/8", "le": 24}
                ]
            }
        },
        "route_maps": {
            "R": {
                "name": "R",
                "entries": [
                    {"sequence": 10, "action": "Deny", "matches": [{"PrefixList": ["PL"]}]},
                    {"sequence": 20, "action": "Permit", "sets": [{"Metric": 10}], "continue": {"target": null}},
                    {"sequence": 30, "action": "Permit", "matches": [{"Tag": 3}]}
                ]
            }
        },
        "bgp": {
            "vrfs": {
                "default": {
                    "name": "default",
                    "asn": 65001,
                    "neighbors": {
                        "swp1": {
                            "name": "swp1",
                            "kind": {"Interface": "swp1"},
                            "remote_as": "External",
                            "ipv4_unicast": {"route_map_out": "R"}
                        }
                    }
                }
            }
        }
    }"#;
    let vendor: VendorConfiguration = serde_json::from_str(json).unwrap();
    assert!(vendor.route_maps["R"].entries[1].continue_.is_some());
    let (_, config, warnings) = run(vendor);
    assert!(warnings.is_empty());

    let peer = config.vrf(DEFAULT_VRF).unwrap().bgp_process.as_ref().unwrap().peer("swp1").unwrap();
    assert_eq!(
        peer.kind,
        PeerKind::Unnumbered {
            interface: "swp1".to_string()
        }
    );
    let export = &peer.ipv4_unicast.as_ref().unwrap().export_policy;
    assert!(!evaluate(&config, export, &route("10.1.0.0/16")).unwrap().accepted);
    let outcome = evaluate(&config, export, &route("20.0.0.0/8")).unwrap();
    assert!(outcome.accepted);
    assert_eq!(outcome.route.metric, 10);

    // the converted configuration survives a JSON round trip
    let text = serde_json::to_string(&config).unwrap();
    let parsed: Configuration = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}
