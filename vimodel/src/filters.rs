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

//! # Filter lists
//!
//! Route-filter lists, community lists and AS-path lists. Routing policies reference them by
//! name. All lists use first-match semantics and deny routes that no line matches.

use ipnet::Ipv4Net;
use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::{Community, LineAction};

/// List of prefix ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteFilterList {
    /// Name of the list
    pub name: String,
    /// Lines, checked in order.
    pub lines: Vec<RouteFilterLine>,
}

/// Line of a route-filter list. It matches every network contained in `prefix` whose prefix
/// length lies in `min_len..=max_len`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteFilterLine {
    /// Action of the line
    pub action: LineAction,
    /// Covering prefix
    pub prefix: Ipv4Net,
    /// Minimum prefix length (inclusive)
    pub min_len: u8,
    /// Maximum prefix length (inclusive)
    pub max_len: u8,
}

impl RouteFilterLine {
    /// Line matching exactly `prefix`.
    pub fn exact(action: LineAction, prefix: Ipv4Net) -> Self {
        Self {
            action,
            prefix,
            min_len: prefix.prefix_len(),
            max_len: prefix.prefix_len(),
        }
    }

    /// Line matching `prefix` and all more specific networks.
    pub fn orlonger(action: LineAction, prefix: Ipv4Net) -> Self {
        Self {
            action,
            prefix,
            min_len: prefix.prefix_len(),
            max_len: 32,
        }
    }

    /// Line matching only networks strictly more specific than `prefix`. For a host prefix, the
    /// line matches nothing.
    pub fn longer(action: LineAction, prefix: Ipv4Net) -> Self {
        Self {
            action,
            prefix,
            min_len: prefix.prefix_len() + 1,
            max_len: 32,
        }
    }

    /// Check if the line matches the network.
    pub fn matches(&self, network: &Ipv4Net) -> bool {
        let len = network.prefix_len();
        self.min_len <= len && len <= self.max_len && self.prefix.contains(network)
    }
}

impl RouteFilterList {
    /// Create a new list
    pub fn new(name: impl Into<String>, lines: Vec<RouteFilterLine>) -> Self {
        Self {
            name: name.into(),
            lines,
        }
    }

    /// Returns `true` if the first matching line permits the network.
    pub fn permits(&self, network: &Ipv4Net) -> bool {
        self.lines
            .iter()
            .find(|l| l.matches(network))
            .map(|l| l.action.is_permit())
            .unwrap_or(false)
    }
}

/// List of community sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityList {
    /// Name of the list
    pub name: String,
    /// Lines, checked in order.
    pub lines: Vec<CommunityListLine>,
}

/// A line matches a route if the route carries all of its communities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityListLine {
    /// Action of the line
    pub action: LineAction,
    /// Communities that must all be present.
    pub communities: BTreeSet<Community>,
}

impl CommunityList {
    /// Create a new list
    pub fn new(name: impl Into<String>, lines: Vec<CommunityListLine>) -> Self {
        Self {
            name: name.into(),
            lines,
        }
    }

    /// Returns `true` if the first matching line permits the set of communities.
    pub fn permits(&self, communities: &BTreeSet<Community>) -> bool {
        self.lines
            .iter()
            .find(|l| l.communities.is_subset(communities))
            .map(|l| l.action.is_permit())
            .unwrap_or(false)
    }

    /// Returns `true` if a single community is permitted by the list. This is used when deleting
    /// communities that match a list.
    pub fn permits_single(&self, community: Community) -> bool {
        self.lines
            .iter()
            .find(|l| l.communities.len() == 1 && l.communities.contains(&community))
            .map(|l| l.action.is_permit())
            .unwrap_or(false)
    }
}

/// List of AS-path regular expressions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsPathList {
    /// Name of the list
    pub name: String,
    /// Lines, checked in order.
    pub lines: Vec<AsPathListLine>,
}

/// Line of an AS-path list. The regular expression is matched against the AS path written as
/// space-separated numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsPathListLine {
    /// Action of the line
    pub action: LineAction,
    /// Regular expression (in `regex` crate syntax).
    pub regex: String,
}

impl AsPathListLine {
    /// Create a new line, checking that the regular expression is valid.
    pub fn new(action: LineAction, regex: impl Into<String>) -> Result<Self, regex::Error> {
        let regex = regex.into();
        Regex::new(&regex)?;
        Ok(Self { action, regex })
    }

    /// Check if the line matches the AS path.
    pub fn matches(&self, as_path: &str) -> bool {
        match Regex::new(&self.regex) {
            Ok(re) => re.is_match(as_path),
            Err(e) => {
                log::warn!("Ignoring invalid AS-path regex {}: {}", self.regex, e);
                false
            }
        }
    }
}

impl AsPathList {
    /// Create a new list
    pub fn new(name: impl Into<String>, lines: Vec<AsPathListLine>) -> Self {
        Self {
            name: name.into(),
            lines,
        }
    }

    /// Returns `true` if the first matching line permits the AS path.
    pub fn permits(&self, as_path: &[u32]) -> bool {
        let path = as_path.iter().join(" ");
        self.lines
            .iter()
            .find(|l| l.matches(&path))
            .map(|l| l.action.is_permit())
            .unwrap_or(false)
    }
}
