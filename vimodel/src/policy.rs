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

//! # Routing Policies
//!
//! This module contains the routing-policy intermediate representation. A [`RoutingPolicy`] is a
//! named, ordered list of [`Statement`]s. Policies invoke each other by name using
//! [`BooleanExpr::Call`], which evaluates the callee and returns its boolean result. A policy
//! used as a top-level import or export policy terminates with accept or reject.
//!
//! Programs are usually built by a compiler, so the constructors in this module are kept small:
//!
//! ```
//! # use vimodel::policy::*;
//! let policy = RoutingPolicy::new(
//!     "export",
//!     vec![Statement::if_then_else(
//!         BooleanExpr::call("my-route-map"),
//!         vec![Statement::ExitAccept],
//!         vec![Statement::ExitReject],
//!     )],
//! );
//! assert_eq!(policy.name(), "export");
//! ```

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::{Community, DefaultAction, NextHop, Origin, RoutingProtocol};

/// A named routing policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingPolicy {
    /// Name under which the policy is registered in the symbol table.
    pub name: String,
    /// Statements, executed in order.
    pub statements: Vec<Statement>,
}

impl RoutingPolicy {
    /// Create a new routing policy.
    pub fn new(name: impl Into<String>, statements: Vec<Statement>) -> Self {
        Self {
            name: name.into(),
            statements,
        }
    }

    /// Name of the policy
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Statements of the policy
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }
}

/// Statement of a routing policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    /// Conditional execution
    If {
        /// Optional comment that is shown when printing the program.
        comment: Option<String>,
        /// Condition
        guard: BooleanExpr,
        /// Statements executed if the guard is true.
        then: Vec<Statement>,
        /// Statements executed if the guard is false.
        otherwise: Vec<Statement>,
    },
    /// Return `true` to the caller, or accept the route at top level.
    ReturnTrue,
    /// Return `false` to the caller, or reject the route at top level.
    ReturnFalse,
    /// Terminate the entire evaluation and accept the route.
    ExitAccept,
    /// Terminate the entire evaluation and reject the route.
    ExitReject,
    /// Change the local default action of the current evaluation.
    SetLocalDefaultAction(DefaultAction),
    /// Return the local default action of the current evaluation.
    ReturnLocalDefaultAction,
    /// From now on, match conditions read the attributes written by previous set actions.
    SetReadIntermediateAttributes,
    /// Set the MED
    SetMetric(u32),
    /// Set the local preference
    SetLocalPreference(u32),
    /// Set the weight
    SetWeight(u32),
    /// Set the tag
    SetTag(u32),
    /// Set the origin attribute
    SetOrigin(Origin),
    /// Set the next hop
    SetNextHop(NextHop),
    /// Add communities to the route
    AddCommunities(BTreeSet<Community>),
    /// Replace all communities of the route
    SetCommunities(BTreeSet<Community>),
    /// Remove all communities matched by the community list with the given name.
    DeleteCommunities(String),
    /// Prepend the AS path
    PrependAsPath(Vec<u32>),
    /// Remove private AS numbers from the AS path
    RemovePrivateAs,
}

impl Statement {
    /// Create a conditional statement without an else branch.
    pub fn if_then(guard: BooleanExpr, then: Vec<Statement>) -> Self {
        Self::If {
            comment: None,
            guard,
            then,
            otherwise: Vec::new(),
        }
    }

    /// Create a conditional statement.
    pub fn if_then_else(
        guard: BooleanExpr,
        then: Vec<Statement>,
        otherwise: Vec<Statement>,
    ) -> Self {
        Self::If {
            comment: None,
            guard,
            then,
            otherwise,
        }
    }

    /// Attach a comment to a conditional statement. All other statements are returned unchanged.
    pub fn with_comment(mut self, text: impl Into<String>) -> Self {
        if let Self::If { comment, .. } = &mut self {
            *comment = Some(text.into());
        }
        self
    }

    /// Return either `ReturnTrue` or `ReturnFalse`.
    pub fn return_bool(value: bool) -> Self {
        if value {
            Self::ReturnTrue
        } else {
            Self::ReturnFalse
        }
    }
}

/// Boolean expression used as a guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanExpr {
    /// Always true
    True,
    /// Always false
    False,
    /// Negation
    Not(Box<BooleanExpr>),
    /// Conjunction. An empty conjunction is `true`.
    And(Vec<BooleanExpr>),
    /// Disjunction. An empty disjunction is `false`.
    Or(Vec<BooleanExpr>),
    /// Call another policy and use its result.
    Call(String),
    /// True iff the current evaluation was entered through a `Call`.
    CallContext,
    /// Matches the IPv4 default route `0.0.0.0/0`.
    MatchDefaultRoute,
    /// Matches if the route was produced by any of the given protocols.
    MatchProtocol(BTreeSet<RoutingProtocol>),
    /// Matches if the route is permitted by the route-filter list with the given name.
    MatchPrefixList(String),
    /// Matches if the network of the route is exactly the given prefix.
    MatchPrefix(Ipv4Net),
    /// Matches if the route is permitted by the community list with the given name.
    MatchCommunityList(String),
    /// Matches if the route is permitted by the AS-path list with the given name.
    MatchAsPathList(String),
    /// Matches the tag
    MatchTag(u32),
    /// Matches the MED
    MatchMetric(u32),
    /// Matches if the route points out of any of the given interfaces.
    MatchInterface(BTreeSet<String>),
}

impl BooleanExpr {
    /// Create a call expression.
    pub fn call(name: impl Into<String>) -> Self {
        Self::Call(name.into())
    }

    /// Negate an expression.
    #[allow(clippy::should_implement_trait)]
    pub fn not(expr: BooleanExpr) -> Self {
        Self::Not(Box::new(expr))
    }

    /// Build a conjunction. A single conjunct is returned as is, and no conjunct yields `True`.
    pub fn and(mut conjuncts: Vec<BooleanExpr>) -> Self {
        match conjuncts.len() {
            0 => Self::True,
            1 => conjuncts.remove(0),
            _ => Self::And(conjuncts),
        }
    }

    /// Build a disjunction. A single disjunct is returned as is, and no disjunct yields `False`.
    pub fn or(mut disjuncts: Vec<BooleanExpr>) -> Self {
        match disjuncts.len() {
            0 => Self::False,
            1 => disjuncts.remove(0),
            _ => Self::Or(disjuncts),
        }
    }
}

/// Call `name` so that its result is returned to the caller when evaluated as a nested call,
/// and the route is accepted or rejected when evaluated at top level.
pub fn call_in_context(name: impl Into<String>) -> Statement {
    let name = name.into();
    Statement::if_then_else(
        BooleanExpr::CallContext,
        vec![call_returning(name.clone())],
        vec![Statement::if_then_else(
            BooleanExpr::Call(name),
            vec![Statement::ExitAccept],
            vec![Statement::ExitReject],
        )],
    )
}

/// `If(Call(name), [ReturnTrue], [ReturnFalse])`
pub fn call_returning(name: impl Into<String>) -> Statement {
    Statement::if_then_else(
        BooleanExpr::Call(name.into()),
        vec![Statement::ReturnTrue],
        vec![Statement::ReturnFalse],
    )
}
