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

//! # Route-map compiler
//!
//! Compiles a vendor route-map into a set of routing policies. The entries are partitioned into
//! *segments*: a new segment starts at the first entry and at every entry that some `continue`
//! may jump to. Each segment becomes its own policy named `<route-map>#<first sequence>`, so a
//! `continue` is simply a call into the target segment. On top, a *dispatcher* policy named like
//! the route-map calls the first segment in context: when called from another policy it returns
//! the result, and when used as an import or export policy it accepts or rejects.
//!
//! Every segment ends by returning the local default action. The first segment resets it to
//! reject, and entries that continue set it to their own action before jumping, so a route that
//! matches no later entry keeps the verdict of the last matching entry.

use vimodel::{
    config::Configuration,
    names,
    policy::{call_in_context, call_returning, BooleanExpr, RoutingPolicy, Statement},
    types::DefaultAction,
};

use crate::{
    vendor::{
        route_map::{RouteMap, RouteMapEntry},
        VendorConfiguration,
    },
    warnings::Warnings,
};

use super::{
    continuation::{Continuation, ContinuationInfo},
    translate::{translate_match, translate_set},
    ConversionError,
};

/// Compile all route-maps of the vendor configuration.
pub fn compile_all(
    vendor: &VendorConfiguration,
    config: &mut Configuration,
    warnings: &mut Warnings,
) -> Result<(), ConversionError> {
    for route_map in vendor.route_maps.values() {
        compile(route_map, vendor, config, warnings)?;
    }
    Ok(())
}

/// Compile a single route-map and register its segments and its dispatcher in `config`.
pub fn compile(
    route_map: &RouteMap,
    vendor: &VendorConfiguration,
    config: &mut Configuration,
    warnings: &mut Warnings,
) -> Result<(), ConversionError> {
    let info = ContinuationInfo::analyze(route_map)?;
    let entries = route_map.sorted_entries();
    let name = route_map.name.as_str();

    let first_segment = names::route_map_segment(name, entries.first().map_or(0, |e| e.sequence));
    let mut segments: Vec<(String, Vec<Statement>)> = vec![(
        first_segment.clone(),
        vec![
            Statement::SetReadIntermediateAttributes,
            Statement::SetLocalDefaultAction(DefaultAction::Reject),
        ],
    )];

    for (idx, entry) in entries.iter().enumerate() {
        if idx > 0 && info.is_target(entry.sequence) {
            segments.push((names::route_map_segment(name, entry.sequence), Vec::new()));
        }
        let stmt = compile_entry(name, entry, &info, vendor, config, warnings);
        if let Some((_, statements)) = segments.last_mut() {
            statements.push(stmt);
        }
    }

    log::debug!("Compiled route-map {} into {} segment(s)", name, segments.len());

    for (segment, mut statements) in segments {
        statements.push(Statement::ReturnLocalDefaultAction);
        config.add_routing_policy(RoutingPolicy::new(segment, statements))?;
    }
    config.add_routing_policy(RoutingPolicy::new(
        name,
        vec![call_in_context(first_segment)],
    ))?;
    Ok(())
}

/// Compile a single entry into a conditional statement.
fn compile_entry(
    name: &str,
    entry: &RouteMapEntry,
    info: &ContinuationInfo,
    vendor: &VendorConfiguration,
    config: &Configuration,
    warnings: &mut Warnings,
) -> Statement {
    let guard = BooleanExpr::and(
        entry
            .matches
            .iter()
            .map(|m| translate_match(m, config, warnings))
            .collect(),
    );

    let mut then: Vec<Statement> = entry
        .sets
        .iter()
        .flat_map(|s| translate_set(s, config))
        .collect();

    match &entry.call {
        Some(called) if vendor.route_maps.contains_key(called) => {
            then.push(call_returning(called.as_str()));
        }
        Some(called) => log::debug!(
            "Route-map {} entry {} calls undefined route-map {}",
            name,
            entry.sequence,
            called
        ),
        None => {}
    }

    match info.resolve(entry) {
        Some(Continuation::Target(target)) => {
            then.push(Statement::SetLocalDefaultAction(entry.action.into()));
            then.push(call_returning(names::route_map_segment(name, target)));
        }
        Some(Continuation::InvalidTarget(target)) => {
            warnings.red_flag(format!(
                "Route-map {name} entry {} continues to invalid entry {target}",
                entry.sequence
            ));
            then.push(Statement::ReturnFalse);
        }
        Some(Continuation::PastEnd) => then.push(Statement::ReturnFalse),
        None => then.push(Statement::return_bool(entry.action.is_permit())),
    }

    let otherwise = match info.fallthrough(entry.sequence) {
        Some(next) if info.is_target(next) => {
            vec![call_returning(names::route_map_segment(name, next))]
        }
        _ => Vec::new(),
    };

    Statement::if_then_else(guard, then, otherwise)
        .with_comment(format!("{} {} {}", name, entry.action, entry.sequence))
}
