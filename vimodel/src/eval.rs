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

//! # Policy evaluation
//!
//! Reference evaluator for routing policies. Each `Call` opens a new frame that inherits the
//! local default action of its caller; the caller's value is restored once the callee returns.
//! `ExitAccept` and `ExitReject` terminate the whole evaluation, no matter how deeply nested.
//!
//! Set statements always write to the output route. Match conditions read the input route,
//! unless `SetReadIntermediateAttributes` was executed earlier in the same evaluation.

use crate::{
    config::Configuration,
    policy::{BooleanExpr, Statement},
    route::{is_private_asn, Route},
    types::{DefaultAction, EvalError, NextHop},
};

/// Maximum nesting depth of `Call` expressions.
pub const MAX_CALL_DEPTH: usize = 64;

/// Result of evaluating a policy on a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyOutcome {
    /// Whether the route was accepted.
    pub accepted: bool,
    /// The route with all set actions applied, independent of whether it was accepted.
    pub route: Route,
}

/// Evaluate the policy named `policy` on `route` as a top-level (import or export) policy.
pub fn evaluate(
    config: &Configuration,
    policy: &str,
    route: &Route,
) -> Result<PolicyOutcome, EvalError> {
    let mut env = Environment::new(config, route);
    let statements = &config
        .routing_policy(policy)
        .ok_or_else(|| EvalError::UndefinedPolicy(policy.to_string()))?
        .statements;
    let accepted = match env.execute(statements, false) {
        Ok(ret) => ret.unwrap_or(false),
        Err(Interrupt::Exit(accepted)) => accepted,
        Err(Interrupt::Error(e)) => return Err(e),
    };
    log::trace!(
        "policy {} {} {}",
        policy,
        if accepted { "accepts" } else { "rejects" },
        route.network
    );
    Ok(PolicyOutcome {
        accepted,
        route: env.output,
    })
}

/// Reason for leaving the regular control flow.
#[derive(Debug)]
enum Interrupt {
    /// `ExitAccept` or `ExitReject` was executed.
    Exit(bool),
    /// Evaluation failed.
    Error(EvalError),
}

impl From<EvalError> for Interrupt {
    fn from(e: EvalError) -> Self {
        Self::Error(e)
    }
}

#[derive(Debug)]
struct Environment<'a> {
    config: &'a Configuration,
    input: &'a Route,
    output: Route,
    read_intermediate: bool,
    local_default: DefaultAction,
    depth: usize,
}

impl<'a> Environment<'a> {
    fn new(config: &'a Configuration, input: &'a Route) -> Self {
        Self {
            config,
            input,
            output: input.clone(),
            read_intermediate: false,
            local_default: DefaultAction::default(),
            depth: 0,
        }
    }

    fn attrs(&self) -> &Route {
        if self.read_intermediate {
            &self.output
        } else {
            self.input
        }
    }

    /// Execute a block. Returns `Some(value)` if a return statement was reached.
    fn execute(&mut self, block: &[Statement], in_call: bool) -> Result<Option<bool>, Interrupt> {
        for stmt in block {
            match stmt {
                Statement::If {
                    guard,
                    then,
                    otherwise,
                    ..
                } => {
                    let branch = if self.eval(guard, in_call)? {
                        then
                    } else {
                        otherwise
                    };
                    if let Some(ret) = self.execute(branch, in_call)? {
                        return Ok(Some(ret));
                    }
                }
                Statement::ReturnTrue => return Ok(Some(true)),
                Statement::ReturnFalse => return Ok(Some(false)),
                Statement::ExitAccept => return Err(Interrupt::Exit(true)),
                Statement::ExitReject => return Err(Interrupt::Exit(false)),
                Statement::SetLocalDefaultAction(action) => self.local_default = *action,
                Statement::ReturnLocalDefaultAction => {
                    return Ok(Some(self.local_default.as_bool()))
                }
                Statement::SetReadIntermediateAttributes => self.read_intermediate = true,
                Statement::SetMetric(x) => self.output.metric = *x,
                Statement::SetLocalPreference(x) => self.output.local_preference = *x,
                Statement::SetWeight(x) => self.output.weight = *x,
                Statement::SetTag(x) => self.output.tag = *x,
                Statement::SetOrigin(x) => self.output.origin = *x,
                Statement::SetNextHop(NextHop::Unchanged) => {}
                Statement::SetNextHop(nh) => self.output.next_hop = nh.clone(),
                Statement::AddCommunities(cs) => self.output.communities.extend(cs.iter().copied()),
                Statement::SetCommunities(cs) => self.output.communities = cs.clone(),
                Statement::DeleteCommunities(list) => {
                    if let Some(list) = self.config.community_lists.get(list) {
                        self.output.communities.retain(|c| !list.permits_single(*c));
                    }
                }
                Statement::PrependAsPath(asns) => {
                    let mut path = asns.clone();
                    path.append(&mut self.output.as_path);
                    self.output.as_path = path;
                }
                Statement::RemovePrivateAs => self.output.as_path.retain(|a| !is_private_asn(*a)),
            }
        }
        Ok(None)
    }

    fn eval(&mut self, expr: &BooleanExpr, in_call: bool) -> Result<bool, Interrupt> {
        Ok(match expr {
            BooleanExpr::True => true,
            BooleanExpr::False => false,
            BooleanExpr::Not(e) => !self.eval(e, in_call)?,
            BooleanExpr::And(es) => {
                for e in es {
                    if !self.eval(e, in_call)? {
                        return Ok(false);
                    }
                }
                true
            }
            BooleanExpr::Or(es) => {
                for e in es {
                    if self.eval(e, in_call)? {
                        return Ok(true);
                    }
                }
                false
            }
            BooleanExpr::Call(name) => self.call(name)?,
            BooleanExpr::CallContext => in_call,
            BooleanExpr::MatchDefaultRoute => self.attrs().is_default_route(),
            BooleanExpr::MatchProtocol(protocols) => protocols.contains(&self.attrs().protocol),
            BooleanExpr::MatchPrefixList(name) => self
                .config
                .route_filter_lists
                .get(name)
                .map(|l| l.permits(&self.attrs().network))
                .unwrap_or(false),
            BooleanExpr::MatchPrefix(net) => self.attrs().network == *net,
            BooleanExpr::MatchCommunityList(name) => self
                .config
                .community_lists
                .get(name)
                .map(|l| l.permits(&self.attrs().communities))
                .unwrap_or(false),
            BooleanExpr::MatchAsPathList(name) => self
                .config
                .as_path_lists
                .get(name)
                .map(|l| l.permits(&self.attrs().as_path))
                .unwrap_or(false),
            BooleanExpr::MatchTag(tag) => self.attrs().tag == *tag,
            BooleanExpr::MatchMetric(metric) => self.attrs().metric == *metric,
            BooleanExpr::MatchInterface(ifaces) => self
                .attrs()
                .interface
                .as_ref()
                .map(|i| ifaces.contains(i))
                .unwrap_or(false),
        })
    }

    fn call(&mut self, name: &str) -> Result<bool, Interrupt> {
        if self.depth >= MAX_CALL_DEPTH {
            return Err(EvalError::RecursionLimit(name.to_string()).into());
        }
        let config = self.config;
        let policy = config
            .routing_policy(name)
            .ok_or_else(|| EvalError::UndefinedPolicy(name.to_string()))?;
        log::trace!("call {} (depth {})", name, self.depth + 1);

        let caller_default = self.local_default;
        self.depth += 1;
        let result = self.execute(&policy.statements, true);
        self.depth -= 1;
        self.local_default = caller_default;

        Ok(result?.unwrap_or(false))
    }
}
