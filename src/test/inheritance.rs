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

use crate::{
    convert::inheritance::{resolve, resolve_all, InheritanceError},
    vendor::bgp::{BgpNeighbor, BgpVrf, RemoteAs, UpdateSource},
};

const N: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);

fn neighbor(group: Option<&str>) -> BgpNeighbor {
    let mut n = BgpNeighbor::ip(N);
    n.peer_group = group.map(String::from);
    n
}

fn group(name: &str, parent: Option<&str>) -> BgpNeighbor {
    let mut g = BgpNeighbor::new_peer_group(name);
    g.peer_group = parent.map(String::from);
    g
}

#[test]
fn inherit_remote_as() {
    let mut vrf = BgpVrf::new("default", Some(65001));
    let mut pg = group("PG", None);
    pg.remote_as = Some(RemoteAs::Explicit(65000));
    vrf.add_neighbor(pg).add_neighbor(neighbor(Some("PG")));

    resolve(&mut vrf, "10.0.0.1").unwrap();
    let n = &vrf.neighbors["10.0.0.1"];
    assert!(n.is_resolved());
    assert_eq!(n.remote_as, Some(RemoteAs::Explicit(65000)));
    assert!(vrf.neighbors["PG"].is_resolved());
}

#[test]
fn own_values_take_precedence() {
    let mut vrf = BgpVrf::new("default", Some(65001));
    let mut pg = group("PG", None);
    pg.remote_as = Some(RemoteAs::Explicit(65000));
    pg.local_as = Some(100);
    pg.description = Some("group".to_string());
    pg.update_source = Some(UpdateSource::Interface("lo".to_string()));
    let mut n = neighbor(Some("PG"));
    n.remote_as = Some(RemoteAs::External);
    vrf.add_neighbor(pg).add_neighbor(n);

    resolve(&mut vrf, "10.0.0.1").unwrap();
    let n = &vrf.neighbors["10.0.0.1"];
    assert_eq!(n.remote_as, Some(RemoteAs::External));
    assert_eq!(n.local_as, Some(100));
    assert_eq!(n.update_source, Some(UpdateSource::Interface("lo".to_string())));
    assert_eq!(n.description, None);
    assert_eq!(n.peer_group.as_deref(), Some("PG"));
}

#[test]
fn address_family_is_merged() {
    let mut vrf = BgpVrf::new("default", Some(65001));
    let mut pg = group("PG", None);
    pg.ipv4_unicast_mut().route_map_out = Some("OUT".to_string());
    pg.ipv4_unicast_mut().route_map_in = Some("IN".to_string());
    let mut n = neighbor(Some("PG"));
    n.ipv4_unicast_mut().route_map_in = Some("OWN_IN".to_string());
    let mut plain = BgpNeighbor::ip(Ipv4Addr::new(10, 0, 0, 2));
    plain.peer_group = Some("PG".to_string());
    vrf.add_neighbor(pg).add_neighbor(n).add_neighbor(plain);

    assert!(resolve_all(&mut vrf).is_empty());

    let af = vrf.neighbors["10.0.0.1"].ipv4_unicast.clone().unwrap();
    assert_eq!(af.route_map_out.as_deref(), Some("OUT"));
    assert_eq!(af.route_map_in.as_deref(), Some("OWN_IN"));

    let af = vrf.neighbors["10.0.0.2"].ipv4_unicast.clone().unwrap();
    assert_eq!(af.route_map_out.as_deref(), Some("OUT"));
    assert_eq!(af.route_map_in.as_deref(), Some("IN"));
}

#[test]
fn resolve_is_idempotent() {
    let mut vrf = BgpVrf::new("default", Some(65001));
    let mut pg = group("PG", None);
    pg.remote_as = Some(RemoteAs::Internal);
    vrf.add_neighbor(pg).add_neighbor(neighbor(Some("PG")));

    resolve(&mut vrf, "10.0.0.1").unwrap();
    let once = vrf.clone();
    resolve(&mut vrf, "10.0.0.1").unwrap();
    assert_eq!(vrf, once);

    // later changes of the group are not picked up again
    vrf.neighbors.get_mut("PG").unwrap().local_as = Some(7);
    resolve(&mut vrf, "10.0.0.1").unwrap();
    assert_eq!(vrf.neighbors["10.0.0.1"].local_as, None);
}

#[test]
fn without_group() {
    let mut vrf = BgpVrf::new("default", Some(65001));
    vrf.add_neighbor(neighbor(None));
    resolve(&mut vrf, "10.0.0.1").unwrap();
    assert!(vrf.neighbors["10.0.0.1"].is_resolved());
    assert_eq!(vrf.neighbors["10.0.0.1"].remote_as, None);

    // unknown neighbors are ignored
    resolve(&mut vrf, "10.9.9.9").unwrap();
}

#[test]
fn missing_group() {
    let mut vrf = BgpVrf::new("default", Some(65001));
    let mut n = neighbor(Some("MISSING"));
    n.local_as = Some(3);
    vrf.add_neighbor(n);
    resolve(&mut vrf, "10.0.0.1").unwrap();

    let resolved = &vrf.neighbors["10.0.0.1"];
    assert!(resolved.is_resolved());
    assert_eq!(resolved.local_as, Some(3));
    assert_eq!(resolved.remote_as, None);
}

#[test]
fn multi_level_groups() {
    let mut vrf = BgpVrf::new("default", Some(65001));
    let mut outer = group("OUTER", None);
    outer.local_as = Some(1);
    outer.remote_as = Some(RemoteAs::Explicit(2));
    let mut inner = group("INNER", Some("OUTER"));
    inner.remote_as = Some(RemoteAs::Explicit(3));
    vrf.add_neighbor(outer)
        .add_neighbor(inner)
        .add_neighbor(neighbor(Some("INNER")));

    resolve(&mut vrf, "10.0.0.1").unwrap();
    let n = &vrf.neighbors["10.0.0.1"];
    assert_eq!(n.local_as, Some(1));
    assert_eq!(n.remote_as, Some(RemoteAs::Explicit(3)));
    assert!(vrf.neighbors["INNER"].is_resolved());
    assert!(vrf.neighbors["OUTER"].is_resolved());
}

#[test]
fn cycle() {
    let mut vrf = BgpVrf::new("default", Some(65001));
    vrf.add_neighbor(group("A", Some("B")))
        .add_neighbor(group("B", Some("A")))
        .add_neighbor(neighbor(Some("A")));

    assert_eq!(
        resolve(&mut vrf, "10.0.0.1"),
        Err(InheritanceError::Cycle {
            vrf: "default".to_string(),
            chain: vec!["10.0.0.1", "A", "B", "A"]
                .into_iter()
                .map(String::from)
                .collect(),
        })
    );
    assert!(!vrf.neighbors["10.0.0.1"].is_resolved());
    assert!(!vrf.neighbors["A"].is_resolved());

    let errors = resolve_all(&mut vrf);
    assert_eq!(errors.len(), 3);
    assert_eq!(
        errors[0].to_string(),
        "Peer-group cycle in VRF default: 10.0.0.1 -> A -> B -> A"
    );
}

#[test]
fn self_reference() {
    let mut vrf = BgpVrf::new("default", None);
    vrf.add_neighbor(group("A", Some("A")));
    assert!(resolve(&mut vrf, "A").is_err());
}
