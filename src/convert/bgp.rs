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

//! # BGP conversion
//!
//! Converts every BGP instance into the BGP process of its VRF: router ID, originated networks,
//! aggregates, redistribution, and one peer for every neighbor that can be materialised.

use ipnet::Ipv4Net;
use lazy_static::lazy_static;
use maplit::btreeset;
use std::{collections::BTreeSet, net::Ipv4Addr};

use vimodel::{
    bgp::{
        BgpAggregate, BgpPeerConfig, BgpProcess as ViBgpProcess, EvpnAf, GeneratedRoute,
        Ipv4UnicastAf, PeerKind, BGP_LOCAL_WEIGHT, GENERATED_DEFAULT_ROUTE_ADMIN,
    },
    config::{Configuration, LOOPBACK_INTERFACE},
    names,
    policy::{BooleanExpr, RoutingPolicy, Statement},
    types::{NextHop, Origin, RoutingProtocol},
};

use crate::{
    vendor::bgp::{BgpNeighbor, BgpNeighborKind, BgpProcess, BgpVrf, UpdateSource},
    warnings::Warnings,
};

use super::{inheritance, peer_policy, ConversionError};

lazy_static! {
    /// Routes of these protocols are never originated by a `network` statement.
    static ref BGP_PROTOCOLS: BTreeSet<RoutingProtocol> = btreeset! {
        RoutingProtocol::Bgp,
        RoutingProtocol::Ibgp,
        RoutingProtocol::Aggregate,
    };
}

/// Convert all BGP instances. Instances of VRFs that do not exist are skipped with a warning.
pub fn convert_bgp(
    bgp: &mut BgpProcess,
    config: &mut Configuration,
    warnings: &mut Warnings,
) -> Result<(), ConversionError> {
    for (vrf_name, vrf) in bgp.vrfs.iter_mut() {
        if config.vrf(vrf_name).is_none() {
            warnings.red_flag(format!(
                "Ignoring BGP configuration of VRF {vrf_name} that does not exist"
            ));
            continue;
        }
        let process = convert_vrf(vrf, config, warnings)?;
        config.vrf_mut(vrf_name)?.bgp_process = Some(process);
    }
    Ok(())
}

/// Convert a single BGP instance.
pub fn convert_vrf(
    vrf: &mut BgpVrf,
    config: &mut Configuration,
    warnings: &mut Warnings,
) -> Result<ViBgpProcess, ConversionError> {
    log::info!("Convert BGP in VRF {}", vrf.name);
    let mut process = ViBgpProcess::new(router_id(vrf, config));

    if let Some(af) = vrf.ipv4_unicast.as_ref() {
        process.origination_space = af.networks.iter().map(|n| n.prefix.trunc()).collect();
        process.aggregates = af
            .aggregates
            .iter()
            .map(|a| BgpAggregate {
                network: a.prefix.trunc(),
                summary_only: a.summary_only,
                attribute_policy: defined_policy(config, a.route_map.as_ref()),
            })
            .collect();
    }
    process.redistribution_policy = build_redistribution_policy(vrf, config)?;
    process.network_policy = build_network_policy(vrf, config)?;

    if vrf.l2vpn_evpn.as_ref().map_or(false, |evpn| evpn.advertise_all_vni) {
        warnings.unimplemented(format!(
            "advertise-all-vni in VRF {}: VNI mapping is not supported",
            vrf.name
        ));
    }

    for err in inheritance::resolve_all(vrf) {
        warnings.red_flag(err.to_string());
    }

    let vrf: &BgpVrf = vrf;
    for neighbor in vrf.neighbors.values() {
        if neighbor.is_peer_group() {
            continue;
        }
        if !neighbor.is_resolved() {
            log::debug!("Skipping unresolved BGP neighbor {}", neighbor.name);
            continue;
        }
        if let Some(peer) = convert_neighbor(neighbor, vrf, config, warnings)? {
            process.peers.insert(neighbor.name.clone(), peer);
        }
    }

    Ok(process)
}

/// Return the name of the policy if it exists in the configuration.
fn defined_policy(config: &Configuration, name: Option<&String>) -> Option<String> {
    name.filter(|n| config.has_routing_policy(n)).cloned()
}

/// Router ID of the VRF: either the configured one, the address of the loopback unless it lies in
/// `127.0.0.0/8`, or the highest address of any other interface on the device.
pub fn router_id(vrf: &BgpVrf, config: &Configuration) -> Ipv4Addr {
    if let Some(id) = vrf.router_id {
        return id;
    }
    let id = config
        .interface(LOOPBACK_INTERFACE)
        .and_then(|i| i.ip())
        .filter(|ip| !ip.is_loopback())
        .or_else(|| {
            config
                .interfaces
                .values()
                .filter(|i| i.name != LOOPBACK_INTERFACE)
                .filter_map(|i| i.ip())
                .max()
        })
        .unwrap_or(Ipv4Addr::UNSPECIFIED);
    log::debug!("Inferred router-id {} for VRF {}", id, vrf.name);
    id
}

/// Policy accepting every redistributed route, if anything is redistributed.
fn build_redistribution_policy(
    vrf: &BgpVrf,
    config: &mut Configuration,
) -> Result<Option<String>, ConversionError> {
    let Some(redistribution) = vrf
        .ipv4_unicast
        .as_ref()
        .map(|af| &af.redistribution)
        .filter(|r| !r.is_empty())
    else {
        return Ok(None);
    };

    let guard = BooleanExpr::or(
        redistribution
            .iter()
            .map(|r| {
                let mut conj = vec![BooleanExpr::MatchProtocol(btreeset! {r.protocol})];
                if let Some(rm) = defined_policy(config, r.route_map.as_ref()) {
                    conj.push(BooleanExpr::Call(rm));
                }
                BooleanExpr::and(conj)
            })
            .collect(),
    );

    let name = names::redistribution_policy(&vrf.name);
    config.add_routing_policy(RoutingPolicy::new(
        name.clone(),
        vec![
            Statement::if_then(guard, vec![Statement::ExitAccept]),
            Statement::ExitReject,
        ],
    ))?;
    Ok(Some(name))
}

/// Policy originating the networks of `network` statements, if there are any.
fn build_network_policy(
    vrf: &BgpVrf,
    config: &mut Configuration,
) -> Result<Option<String>, ConversionError> {
    let Some(networks) = vrf
        .ipv4_unicast
        .as_ref()
        .map(|af| &af.networks)
        .filter(|n| !n.is_empty())
    else {
        return Ok(None);
    };

    let guard = BooleanExpr::or(
        networks
            .iter()
            .map(|n| {
                let mut conj = vec![
                    BooleanExpr::MatchPrefix(n.prefix.trunc()),
                    BooleanExpr::not(BooleanExpr::MatchProtocol(BGP_PROTOCOLS.clone())),
                ];
                if let Some(rm) = defined_policy(config, n.route_map.as_ref()) {
                    conj.push(BooleanExpr::Call(rm));
                }
                BooleanExpr::And(conj)
            })
            .collect(),
    );

    let name = names::network_policy(&vrf.name);
    config.add_routing_policy(RoutingPolicy::new(
        name.clone(),
        vec![
            Statement::SetNextHop(NextHop::Discard),
            Statement::SetWeight(BGP_LOCAL_WEIGHT),
            Statement::if_then(
                guard,
                vec![Statement::SetOrigin(Origin::Igp), Statement::ExitAccept],
            ),
            Statement::ExitReject,
        ],
    ))?;
    Ok(Some(name))
}

/// Materialise a single resolved neighbor. Returns `None` if the neighbor must be skipped.
pub fn convert_neighbor(
    neighbor: &BgpNeighbor,
    vrf: &BgpVrf,
    config: &mut Configuration,
    warnings: &mut Warnings,
) -> Result<Option<BgpPeerConfig>, ConversionError> {
    let Some(remote_asns) = peer_policy::remote_asns(neighbor, vrf, warnings) else {
        return Ok(None);
    };
    let Some((kind, local_ip)) = session(neighbor, vrf, config, warnings) else {
        return Ok(None);
    };
    let Some(policies) = peer_policy::build(neighbor, vrf, config, warnings)? else {
        return Ok(None);
    };
    let local_as = neighbor.local_as.or(vrf.asn);

    let af = neighbor.ipv4_unicast.as_ref();
    let mut generated_routes = Vec::new();
    if af.and_then(|af| af.default_originate).unwrap_or(false) {
        generated_routes.push(GeneratedRoute {
            network: Ipv4Net::default(),
            admin: GENERATED_DEFAULT_ROUTE_ADMIN,
            generation_policy: defined_policy(
                config,
                af.and_then(|af| af.default_originate_route_map.as_ref()),
            ),
        });
    }

    let ipv4_active = af
        .and_then(|af| af.activated)
        .unwrap_or(vrf.default_ipv4_unicast);
    let ipv4_unicast = ipv4_active.then(|| Ipv4UnicastAf {
        export_policy: policies.export.clone(),
        import_policy: policies.import.clone(),
        route_reflector_client: af
            .and_then(|af| af.route_reflector_client)
            .unwrap_or(false),
        allow_local_as_in: af.and_then(|af| af.allowas_in).unwrap_or(0) > 0,
    });

    let evpn = neighbor
        .l2vpn_evpn
        .as_ref()
        .filter(|_| vrf.l2vpn_evpn.is_some() && local_as.is_some())
        .filter(|af| af.activated == Some(true))
        .map(|af| EvpnAf {
            export_policy: policies.export.clone(),
            route_reflector_client: af.route_reflector_client.unwrap_or(false),
        });

    log::debug!("Materialised BGP peer {} ({})", neighbor.name, kind);
    Ok(Some(BgpPeerConfig {
        kind,
        description: neighbor.description.clone(),
        group: neighbor.peer_group.clone(),
        local_as,
        local_ip,
        remote_asns,
        ebgp_multihop: neighbor.ebgp_multihop.unwrap_or(false),
        generated_routes,
        ipv4_unicast,
        evpn,
    }))
}

/// Determine how the session to the neighbor is established, and from which local address.
fn session(
    neighbor: &BgpNeighbor,
    vrf: &BgpVrf,
    config: &Configuration,
    warnings: &mut Warnings,
) -> Option<(PeerKind, Option<Ipv4Addr>)> {
    match &neighbor.kind {
        BgpNeighborKind::Ip(peer_ip) => Some((
            PeerKind::Active { peer_ip: *peer_ip },
            local_ip(neighbor, *peer_ip, vrf, config, warnings),
        )),
        BgpNeighborKind::Interface(name) => {
            let Some(iface) = config.interface(name) else {
                warnings.red_flag(format!(
                    "Skipping BGP neighbor {}: interface {} does not exist",
                    neighbor.name, name
                ));
                return None;
            };
            match iface.address.and_then(|a| point_to_point_peer(&a).map(|p| (a, p))) {
                Some((addr, peer_ip)) => Some((PeerKind::Active { peer_ip }, Some(addr.addr()))),
                None => Some((
                    PeerKind::Unnumbered {
                        interface: name.clone(),
                    },
                    None,
                )),
            }
        }
        BgpNeighborKind::Dynamic(range) => Some((
            PeerKind::Passive { range: *range },
            update_source_ip(neighbor, config, warnings),
        )),
        BgpNeighborKind::PeerGroup => None,
    }
}

/// The address of the other end of a /30 or /31 link.
pub fn point_to_point_peer(addr: &Ipv4Net) -> Option<Ipv4Addr> {
    let own = u32::from(addr.addr());
    let net = u32::from(addr.network());
    match addr.prefix_len() {
        31 => Some(Ipv4Addr::from(own ^ 1)),
        30 if own == net + 1 => Some(Ipv4Addr::from(net + 2)),
        30 if own == net + 2 => Some(Ipv4Addr::from(net + 1)),
        _ => None,
    }
}

/// Local address of the session to `peer_ip`: taken from `update-source`, or from the first
/// interface of the VRF whose network contains the peer.
fn local_ip(
    neighbor: &BgpNeighbor,
    peer_ip: Ipv4Addr,
    vrf: &BgpVrf,
    config: &Configuration,
    warnings: &mut Warnings,
) -> Option<Ipv4Addr> {
    update_source_ip(neighbor, config, warnings).or_else(|| {
        config
            .interfaces_in_vrf(&vrf.name)
            .filter_map(|i| i.address)
            .find(|a| a.contains(&peer_ip) && a.addr() != peer_ip)
            .map(|a| a.addr())
    })
}

/// Address configured with `update-source`. A missing interface, or one without an address, is
/// reported and yields `None`.
fn update_source_ip(
    neighbor: &BgpNeighbor,
    config: &Configuration,
    warnings: &mut Warnings,
) -> Option<Ipv4Addr> {
    match neighbor.update_source.as_ref()? {
        UpdateSource::Address(ip) => Some(*ip),
        UpdateSource::Interface(name) => match config.interface(name) {
            None => {
                warnings.red_flag(format!(
                    "BGP neighbor {}: update-source interface {} does not exist",
                    neighbor.name, name
                ));
                None
            }
            Some(iface) if iface.ip().is_none() => {
                warnings.red_flag(format!(
                    "BGP neighbor {}: update-source interface {} has no address",
                    neighbor.name, name
                ));
                None
            }
            Some(iface) => iface.ip(),
        },
    }
}
