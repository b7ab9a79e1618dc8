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

//! Peer-group inheritance. Every attribute a neighbor leaves unset is taken from its peer group.
//! Peer groups may themselves reference another peer group; they are resolved before any
//! neighbor that references them. Each neighbor is resolved at most once.

use thiserror::Error;

use crate::vendor::bgp::BgpVrf;

/// Error while resolving the peer-group inheritance.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InheritanceError {
    /// Peer groups reference each other in a cycle.
    #[error("Peer-group cycle in VRF {vrf}: {}", chain.join(" -> "))]
    Cycle {
        /// Name of the VRF
        vrf: String,
        /// Neighbors on the cycle, starting and ending with the same name.
        chain: Vec<String>,
    },
}

/// Merge the configuration of the peer group of `neighbor` into it. Calling this function again
/// on an already resolved neighbor has no effect. A neighbor without a peer group, or with a
/// reference to a missing one, is only marked as resolved.
pub fn resolve(vrf: &mut BgpVrf, neighbor: &str) -> Result<(), InheritanceError> {
    resolve_chain(vrf, neighbor, &mut Vec::new())
}

/// Resolve all neighbors and peer groups of the VRF, returning the errors of those that could
/// not be resolved.
pub fn resolve_all(vrf: &mut BgpVrf) -> Vec<InheritanceError> {
    let names: Vec<String> = vrf.neighbors.keys().cloned().collect();
    names
        .iter()
        .filter_map(|name| resolve(vrf, name).err())
        .collect()
}

/// Resolve `name`, where `chain` holds the neighbors currently being resolved that (indirectly)
/// reference `name`.
fn resolve_chain(
    vrf: &mut BgpVrf,
    name: &str,
    chain: &mut Vec<String>,
) -> Result<(), InheritanceError> {
    let group_name = match vrf.neighbors.get(name) {
        None => return Ok(()),
        Some(n) if n.resolved => return Ok(()),
        Some(n) => n.peer_group.clone(),
    };

    if chain.iter().any(|n| n == name) {
        let mut cycle = chain.clone();
        cycle.push(name.to_string());
        return Err(InheritanceError::Cycle {
            vrf: vrf.name.clone(),
            chain: cycle,
        });
    }

    let group = match group_name {
        Some(group_name) if vrf.neighbors.contains_key(&group_name) => {
            chain.push(name.to_string());
            let result = resolve_chain(vrf, &group_name, chain);
            chain.pop();
            result?;
            vrf.neighbors.get(&group_name).cloned()
        }
        Some(group_name) => {
            log::debug!(
                "BGP neighbor {} references undefined peer-group {}",
                name,
                group_name
            );
            None
        }
        None => None,
    };

    if let Some(neighbor) = vrf.neighbors.get_mut(name) {
        if let Some(group) = group {
            log::trace!("{} inherits from peer-group {}", name, group.name);
            neighbor.inherit_from(&group);
        }
        neighbor.resolved = true;
    }
    Ok(())
}
