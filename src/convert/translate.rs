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

//! Translation of single route-map match conditions and set actions. Each variant has exactly
//! one arm. References to filter lists that do not exist in the converted configuration are
//! dropped, so a condition referencing only undefined lists never matches.

use std::collections::BTreeSet;

use vimodel::{
    config::Configuration,
    policy::{BooleanExpr, Statement},
    types::NextHop,
};

use crate::{
    vendor::route_map::{NextHopSpec, RouteMapMatch, RouteMapSet},
    warnings::Warnings,
};

/// Keep only the names that satisfy `defined`, logging the others.
fn defined_only<'a>(
    kind: &str,
    names: &'a [String],
    defined: impl Fn(&str) -> bool,
) -> Vec<&'a String> {
    let (ok, missing): (Vec<&String>, Vec<&String>) =
        names.iter().partition(|n| defined(n.as_str()));
    for name in missing {
        log::debug!("Ignoring reference to undefined {} {}", kind, name);
    }
    ok
}

/// Translate a match condition into a boolean expression.
pub fn translate_match(
    cond: &RouteMapMatch,
    config: &Configuration,
    warnings: &mut Warnings,
) -> BooleanExpr {
    match cond {
        RouteMapMatch::PrefixList(names) => BooleanExpr::or(
            defined_only("prefix-list", names, |n| {
                config.route_filter_lists.contains_key(n)
            })
            .into_iter()
            .map(|n| BooleanExpr::MatchPrefixList(n.clone()))
            .collect(),
        ),
        RouteMapMatch::Community(names) => BooleanExpr::or(
            defined_only("community-list", names, |n| {
                config.community_lists.contains_key(n)
            })
            .into_iter()
            .map(|n| BooleanExpr::MatchCommunityList(n.clone()))
            .collect(),
        ),
        RouteMapMatch::AsPath(names) => BooleanExpr::or(
            defined_only("as-path access-list", names, |n| {
                config.as_path_lists.contains_key(n)
            })
            .into_iter()
            .map(|n| BooleanExpr::MatchAsPathList(n.clone()))
            .collect(),
        ),
        RouteMapMatch::Tag(tag) => BooleanExpr::MatchTag(*tag),
        RouteMapMatch::Metric(metric) => BooleanExpr::MatchMetric(*metric),
        RouteMapMatch::Interface(ifaces) => {
            for iface in ifaces.iter().filter(|i| config.interface(i).is_none()) {
                warnings.red_flag(format!(
                    "Route-map matches on interface {iface} that does not exist"
                ));
            }
            BooleanExpr::MatchInterface(ifaces.iter().cloned().collect())
        }
        RouteMapMatch::SourceProtocol(protocols) => {
            BooleanExpr::MatchProtocol(protocols.iter().copied().collect::<BTreeSet<_>>())
        }
    }
}

/// Translate a set action into a list of statements.
pub fn translate_set(set: &RouteMapSet, config: &Configuration) -> Vec<Statement> {
    match set {
        RouteMapSet::Metric(x) => vec![Statement::SetMetric(*x)],
        RouteMapSet::LocalPreference(x) => vec![Statement::SetLocalPreference(*x)],
        RouteMapSet::Weight(x) => vec![Statement::SetWeight(*x)],
        RouteMapSet::Tag(x) => vec![Statement::SetTag(*x)],
        RouteMapSet::Origin(x) => vec![Statement::SetOrigin(*x)],
        RouteMapSet::Community {
            communities,
            additive: true,
        } => vec![Statement::AddCommunities(communities.clone())],
        RouteMapSet::Community {
            communities,
            additive: false,
        } => vec![Statement::SetCommunities(communities.clone())],
        RouteMapSet::CommListDelete(list) if config.community_lists.contains_key(list) => {
            vec![Statement::DeleteCommunities(list.clone())]
        }
        RouteMapSet::CommListDelete(list) => {
            log::debug!("Ignoring comm-list delete of undefined list {}", list);
            Vec::new()
        }
        RouteMapSet::AsPathPrepend(asns) => vec![Statement::PrependAsPath(asns.clone())],
        RouteMapSet::IpNextHop(NextHopSpec::Address(ip)) => {
            vec![Statement::SetNextHop(NextHop::Ip(*ip))]
        }
        RouteMapSet::IpNextHop(NextHopSpec::PeerAddress) => {
            vec![Statement::SetNextHop(NextHop::PeerAddress)]
        }
        RouteMapSet::IpNextHop(NextHopSpec::Unchanged) => {
            vec![Statement::SetNextHop(NextHop::Unchanged)]
        }
    }
}
