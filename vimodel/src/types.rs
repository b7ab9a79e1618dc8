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

//! Module containing the basic value types and the errors of the vendor-independent model.

use serde::{Deserialize, Serialize};
use std::{fmt, net::Ipv4Addr, str::FromStr};
use thiserror::Error;

/// Autonomous system number.
pub type Asn = u32;

/// Action of a single line in an access list, prefix list, or route-map entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LineAction {
    /// The line permits whatever it matches.
    Permit,
    /// The line denies whatever it matches.
    Deny,
}

impl LineAction {
    /// Returns `true` if the action is `Permit`.
    pub fn is_permit(&self) -> bool {
        matches!(self, Self::Permit)
    }

    /// Returns `true` if the action is `Deny`.
    pub fn is_deny(&self) -> bool {
        matches!(self, Self::Deny)
    }
}

impl fmt::Display for LineAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineAction::Permit => write!(f, "permit"),
            LineAction::Deny => write!(f, "deny"),
        }
    }
}

/// Value of the per-evaluation *local default action*. It starts out as `Reject` in every
/// evaluation, can be changed with `SetLocalDefaultAction`, and is read by
/// `ReturnLocalDefaultAction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DefaultAction {
    /// Accept the route (`true` when called).
    Accept,
    /// Reject the route (`false` when called).
    #[default]
    Reject,
}

impl DefaultAction {
    /// Boolean value of the action when a policy returns it to its caller.
    pub fn as_bool(&self) -> bool {
        matches!(self, Self::Accept)
    }
}

impl From<LineAction> for DefaultAction {
    fn from(action: LineAction) -> Self {
        match action {
            LineAction::Permit => Self::Accept,
            LineAction::Deny => Self::Reject,
        }
    }
}

impl fmt::Display for DefaultAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultAction::Accept => write!(f, "accept"),
            DefaultAction::Reject => write!(f, "reject"),
        }
    }
}

/// Routing protocol that produced a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoutingProtocol {
    /// Directly connected network.
    Connected,
    /// Local (interface address) route.
    Local,
    /// Static route.
    Static,
    /// Route learned via eBGP.
    Bgp,
    /// Route learned via iBGP.
    Ibgp,
    /// Route learned via OSPF (any route type).
    Ospf,
    /// Aggregate or otherwise generated route.
    Aggregate,
    /// Kernel route.
    Kernel,
}

impl fmt::Display for RoutingProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RoutingProtocol::Connected => "connected",
            RoutingProtocol::Local => "local",
            RoutingProtocol::Static => "static",
            RoutingProtocol::Bgp => "bgp",
            RoutingProtocol::Ibgp => "ibgp",
            RoutingProtocol::Ospf => "ospf",
            RoutingProtocol::Aggregate => "aggregate",
            RoutingProtocol::Kernel => "kernel",
        };
        f.write_str(s)
    }
}

/// BGP origin attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Origin {
    /// Network statement or IGP
    #[default]
    Igp,
    /// EGP
    Egp,
    /// Redistributed or generated
    Incomplete,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Igp => write!(f, "igp"),
            Origin::Egp => write!(f, "egp"),
            Origin::Incomplete => write!(f, "incomplete"),
        }
    }
}

/// Standard BGP community, stored as a single 32-bit value and written as `high:low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Community(pub u32);

impl Community {
    /// Build a community from its `high:low` parts.
    pub fn from_parts(high: u16, low: u16) -> Self {
        Self(((high as u32) << 16) | low as u32)
    }

    /// The upper 16 bits (typically an AS number).
    pub fn high(&self) -> u16 {
        (self.0 >> 16) as u16
    }

    /// The lower 16 bits.
    pub fn low(&self) -> u16 {
        (self.0 & 0xffff) as u16
    }
}

impl fmt::Display for Community {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.high(), self.low())
    }
}

impl FromStr for Community {
    type Err = ParseCommunityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (high, low) = s
            .split_once(':')
            .ok_or_else(|| ParseCommunityError(s.to_string()))?;
        let high = high
            .parse::<u16>()
            .map_err(|_| ParseCommunityError(s.to_string()))?;
        let low = low
            .parse::<u16>()
            .map_err(|_| ParseCommunityError(s.to_string()))?;
        Ok(Self::from_parts(high, low))
    }
}

/// Error returned when a community string is not of the form `high:low`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid community: {0}")]
pub struct ParseCommunityError(pub String);

/// Next hop of a route, or the next hop written by a `SetNextHop` statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NextHop {
    /// No next hop is known (yet).
    #[default]
    Unset,
    /// Explicit next-hop address.
    Ip(Ipv4Addr),
    /// The local address of the session the route is sent on.
    SelfNextHop,
    /// The address of the peer the route was received from.
    PeerAddress,
    /// Traffic is dropped.
    Discard,
    /// Keep whatever next hop the route already carries. Only meaningful in `SetNextHop`.
    Unchanged,
}

impl fmt::Display for NextHop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextHop::Unset => write!(f, "unset"),
            NextHop::Ip(ip) => write!(f, "{ip}"),
            NextHop::SelfNextHop => write!(f, "self"),
            NextHop::PeerAddress => write!(f, "peer-address"),
            NextHop::Discard => write!(f, "discard"),
            NextHop::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// Configuration Error
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigError {
    /// A routing policy with the same name is already part of the symbol table.
    #[error("Routing policy {0} already exists!")]
    PolicyExists(String),
    /// A filter list with the same name is already part of the configuration.
    #[error("Filter list {0} already exists!")]
    FilterExists(String),
    /// The VRF does not exist in the configuration.
    #[error("VRF {0} does not exist!")]
    VrfNotFound(String),
}

/// Error thrown while evaluating a routing policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A policy that is not part of the symbol table was invoked.
    #[error("Routing policy {0} is not defined")]
    UndefinedPolicy(String),
    /// Nested calls exceeded the maximum depth (most likely a call cycle).
    #[error("Maximum call depth exceeded while calling {0}")]
    RecursionLimit(String),
}
