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

//! # Peer policies
//!
//! Builds the export and import policy of a single BGP neighbor. The export policy is laid out
//! as follows:
//!
//! 1. With `default-originate`, the generated default route is exported through the shared
//!    default-route export policy, and any other default route is rejected.
//! 2. With `remove-private-AS`, private AS numbers are stripped from the path.
//! 3. A route is exported if both the common export policy of the VRF and the outbound
//!    route-map (if any) accept it. Exported routes get the next hop and the MED rewritten where
//!    configured.
//!
//! An import policy is only built if the neighbor has an inbound route-map.

use lazy_static::lazy_static;
use maplit::btreeset;
use std::collections::BTreeSet;

use vimodel::{
    bgp::RemoteAsns,
    config::Configuration,
    filters::{RouteFilterLine, RouteFilterList},
    names,
    policy::{BooleanExpr, RoutingPolicy, Statement},
    types::{LineAction, NextHop, Origin, RoutingProtocol},
};

use crate::{
    vendor::bgp::{BgpNeighbor, BgpVrf},
    warnings::Warnings,
};

use super::ConversionError;

lazy_static! {
    /// Protocols that identify the generated default route.
    static ref AGGREGATE: BTreeSet<RoutingProtocol> = btreeset! {RoutingProtocol::Aggregate};
}

/// Names of the policies built for a single peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerPolicies {
    /// Export policy
    pub export: String,
    /// Import policy, if the neighbor has an inbound route-map.
    pub import: Option<String>,
}

/// Build the export and import policy of a resolved neighbor. Returns `None` (and records a
/// warning) if the remote AS of the neighbor cannot be determined.
pub fn build(
    neighbor: &BgpNeighbor,
    vrf: &BgpVrf,
    config: &mut Configuration,
    warnings: &mut Warnings,
) -> Result<Option<PeerPolicies>, ConversionError> {
    if !neighbor.is_resolved() {
        return Err(ConversionError::UnresolvedNeighbor {
            vrf: vrf.name.clone(),
            neighbor: neighbor.name.clone(),
        });
    }

    if remote_asns(neighbor, vrf, warnings).is_none() {
        return Ok(None);
    }

    log::debug!("Build policies of BGP neighbor {} in VRF {}", neighbor.name, vrf.name);
    let export = build_export_policy(neighbor, vrf, config)?;
    let import = build_import_policy(neighbor, vrf, config)?;
    Ok(Some(PeerPolicies { export, import }))
}

/// Remote AS numbers accepted from the neighbor. Returns `None` with a warning if the neighbor has
/// no remote-as, or if its remote-as cannot be interpreted without a local AS.
pub fn remote_asns(
    neighbor: &BgpNeighbor,
    vrf: &BgpVrf,
    warnings: &mut Warnings,
) -> Option<RemoteAsns> {
    let Some(remote_as) = neighbor.remote_as else {
        warnings.red_flag(format!(
            "Skipping BGP neighbor {}: missing remote-as configuration",
            neighbor.name
        ));
        return None;
    };
    let asns = remote_as.remote_asns(neighbor.local_as.or(vrf.asn));
    if asns.is_empty() {
        warnings.red_flag(format!(
            "Skipping BGP neighbor {}: unable to determine remote-as without local-as configured",
            neighbor.name
        ));
        return None;
    }
    Some(asns)
}

/// Build the export policy and return its name.
fn build_export_policy(
    neighbor: &BgpNeighbor,
    vrf: &BgpVrf,
    config: &mut Configuration,
) -> Result<String, ConversionError> {
    let af = neighbor.ipv4_unicast.as_ref();
    let mut statements = Vec::new();

    if af.and_then(|af| af.default_originate).unwrap_or(false) {
        ensure_default_route_export_policy(config)?;
        statements.push(
            Statement::if_then(
                BooleanExpr::call(names::DEFAULT_ROUTE_EXPORT_POLICY),
                vec![Statement::ReturnTrue],
            )
            .with_comment("export the generated default route"),
        );
        statements.push(
            Statement::if_then(BooleanExpr::MatchDefaultRoute, vec![Statement::ReturnFalse])
                .with_comment("reject all other default routes"),
        );
    }

    if af.and_then(|af| af.remove_private_as).is_some() {
        statements.push(Statement::RemovePrivateAs);
    }

    let mut guard = vec![BooleanExpr::Call(ensure_common_export_policy(vrf, config)?)];
    match af.and_then(|af| af.route_map_out.as_ref()) {
        Some(rm) if config.has_routing_policy(rm) => guard.push(BooleanExpr::call(rm.as_str())),
        Some(rm) => log::debug!(
            "BGP neighbor {} references undefined route-map {} out",
            neighbor.name,
            rm
        ),
        None => {}
    }

    let mut accept = Vec::new();
    if next_hop_self(neighbor, vrf) {
        accept.push(Statement::SetNextHop(NextHop::SelfNextHop));
    }
    if let Some(med) = vrf.max_med_administrative {
        accept.push(Statement::SetMetric(med));
    }
    accept.push(Statement::ExitAccept);

    statements.push(Statement::if_then_else(
        BooleanExpr::and(guard),
        accept,
        vec![Statement::ExitReject],
    ));

    let name = names::peer_export_policy(&vrf.name, &neighbor.name);
    config.add_routing_policy(RoutingPolicy::new(name.clone(), statements))?;
    Ok(name)
}

/// Build the import policy if the neighbor has a defined inbound route-map.
fn build_import_policy(
    neighbor: &BgpNeighbor,
    vrf: &BgpVrf,
    config: &mut Configuration,
) -> Result<Option<String>, ConversionError> {
    let Some(rm) = neighbor
        .ipv4_unicast
        .as_ref()
        .and_then(|af| af.route_map_in.as_ref())
    else {
        return Ok(None);
    };
    if !config.has_routing_policy(rm) {
        log::debug!(
            "BGP neighbor {} references undefined route-map {} in",
            neighbor.name,
            rm
        );
        return Ok(None);
    }

    let name = names::peer_import_policy(&vrf.name, &neighbor.name);
    config.add_routing_policy(RoutingPolicy::new(
        name.clone(),
        vec![Statement::if_then_else(
            BooleanExpr::call(rm.as_str()),
            vec![Statement::ExitAccept],
            vec![Statement::ExitReject],
        )],
    ))?;
    Ok(Some(name))
}

/// Whether exported routes get the local address as next hop. For iBGP sessions, this requires
/// `next-hop-self force`.
pub fn next_hop_self(neighbor: &BgpNeighbor, vrf: &BgpVrf) -> bool {
    let local_as = neighbor.local_as.or(vrf.asn);
    if local_as.is_none() {
        return false;
    }
    let Some(af) = neighbor.ipv4_unicast.as_ref() else {
        return false;
    };
    let ibgp = neighbor
        .remote_as
        .map(|r| r.is_ibgp(local_as))
        .unwrap_or(false);
    if ibgp && af.next_hop_self_all != Some(true) {
        return false;
    }
    af.next_hop_self.unwrap_or(false)
}

/// Create the shared default-route export policy, unless it already exists.
pub fn ensure_default_route_export_policy(
    config: &mut Configuration,
) -> Result<(), ConversionError> {
    if config.has_routing_policy(names::DEFAULT_ROUTE_EXPORT_POLICY) {
        return Ok(());
    }
    config.add_routing_policy(RoutingPolicy::new(
        names::DEFAULT_ROUTE_EXPORT_POLICY,
        vec![
            Statement::if_then(
                BooleanExpr::And(vec![
                    BooleanExpr::MatchDefaultRoute,
                    BooleanExpr::MatchProtocol(AGGREGATE.clone()),
                ]),
                vec![Statement::SetOrigin(Origin::Incomplete), Statement::ReturnTrue],
            ),
            Statement::ReturnFalse,
        ],
    ))?;
    Ok(())
}

/// Create the common export policy of the VRF, unless it already exists, and return its name.
/// The policy rejects every route that is more specific than a `summary-only` aggregate.
pub fn ensure_common_export_policy(
    vrf: &BgpVrf,
    config: &mut Configuration,
) -> Result<String, ConversionError> {
    let name = names::common_export_policy(&vrf.name);
    if config.has_routing_policy(&name) {
        return Ok(name);
    }

    let summary_only: Vec<RouteFilterLine> = vrf
        .ipv4_unicast
        .iter()
        .flat_map(|af| af.aggregates.iter())
        .filter(|a| a.summary_only && a.prefix.prefix_len() < 32)
        .map(|a| RouteFilterLine::longer(LineAction::Permit, a.prefix.trunc()))
        .collect();

    let mut statements = Vec::new();
    if !summary_only.is_empty() {
        let list = names::suppressed_summary_only(&vrf.name);
        config.add_route_filter_list(RouteFilterList::new(list.clone(), summary_only))?;
        statements.push(
            Statement::if_then(
                BooleanExpr::MatchPrefixList(list),
                vec![Statement::ReturnFalse],
            )
            .with_comment("suppress more specific routes of summary-only aggregates"),
        );
    }
    statements.push(Statement::ReturnTrue);

    config.add_routing_policy(RoutingPolicy::new(name.clone(), statements))?;
    Ok(name)
}
