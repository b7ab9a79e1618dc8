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

//! Continuation analysis of a route-map: the fallthrough successor of every entry, and the set
//! of sequence numbers that some `continue` may jump to. Each such target starts a new segment
//! of the compiled route-map.

use std::collections::{BTreeMap, BTreeSet};

use crate::vendor::route_map::{RouteMap, RouteMapEntry};

use super::ConversionError;

/// Where the `continue` of an entry leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Continue with the entry of the given sequence number.
    Target(u32),
    /// The explicit target is not a later entry of the route-map.
    InvalidTarget(u32),
    /// The entry is the last one and continues without an explicit target.
    PastEnd,
}

/// Result of the continuation analysis of a single route-map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuationInfo {
    /// Fallthrough successor of each sequence number.
    successors: BTreeMap<u32, Option<u32>>,
    /// Sequence numbers reachable by a valid `continue`.
    targets: BTreeSet<u32>,
}

impl ContinuationInfo {
    /// Analyze the route-map. Fails if two entries share a sequence number.
    pub fn analyze(route_map: &RouteMap) -> Result<Self, ConversionError> {
        let mut sequences = BTreeSet::new();
        for entry in &route_map.entries {
            if !sequences.insert(entry.sequence) {
                return Err(ConversionError::DuplicateSequence {
                    route_map: route_map.name.clone(),
                    sequence: entry.sequence,
                });
            }
        }

        let ordered: Vec<u32> = sequences.into_iter().collect();
        let successors = ordered
            .iter()
            .enumerate()
            .map(|(i, seq)| (*seq, ordered.get(i + 1).copied()))
            .collect();

        let mut info = Self {
            successors,
            targets: BTreeSet::new(),
        };
        info.targets = route_map
            .entries
            .iter()
            .filter_map(|e| match info.resolve(e) {
                Some(Continuation::Target(t)) => Some(t),
                _ => None,
            })
            .collect();
        Ok(info)
    }

    /// Sequence number of the entry following `sequence`, if any.
    pub fn fallthrough(&self, sequence: u32) -> Option<u32> {
        self.successors.get(&sequence).copied().flatten()
    }

    /// Returns `true` if some entry may continue to `sequence`.
    pub fn is_target(&self, sequence: u32) -> bool {
        self.targets.contains(&sequence)
    }

    /// All continuation targets, in ascending order.
    pub fn targets(&self) -> &BTreeSet<u32> {
        &self.targets
    }

    /// Where the `continue` of `entry` leads, or `None` if the entry does not continue.
    pub fn resolve(&self, entry: &RouteMapEntry) -> Option<Continuation> {
        let cont = entry.continue_?;
        Some(match cont.target {
            Some(target) if target > entry.sequence && self.successors.contains_key(&target) => {
                Continuation::Target(target)
            }
            Some(target) => Continuation::InvalidTarget(target),
            None => match self.fallthrough(entry.sequence) {
                Some(next) => Continuation::Target(next),
                None => Continuation::PastEnd,
            },
        })
    }
}
