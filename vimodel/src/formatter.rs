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

//! Module that introduces a formatter to display routing policies in a readable, indented form.

use itertools::Itertools;

use crate::{
    config::Configuration,
    policy::{BooleanExpr, RoutingPolicy, Statement},
};

/// Trait to format a type that references routing policies by name.
pub trait ConfigFormatter<'a, 'c> {
    /// Type that is returned, which implements `std::fmt::Display`.
    type Formatter;

    /// Return a struct that can be formatted and displayed. Calls to policies that are missing
    /// in `config` are marked as undefined.
    fn fmt(&'a self, config: &'c Configuration) -> Self::Formatter;
}

impl<'a, 'c> ConfigFormatter<'a, 'c> for BooleanExpr {
    type Formatter = String;

    fn fmt(&'a self, config: &'c Configuration) -> Self::Formatter {
        match self {
            BooleanExpr::True => "true".to_string(),
            BooleanExpr::False => "false".to_string(),
            BooleanExpr::Not(e) => format!("!{}", e.fmt(config)),
            BooleanExpr::And(es) if es.is_empty() => "true".to_string(),
            BooleanExpr::And(es) => format!("({})", es.iter().map(|e| e.fmt(config)).join(" && ")),
            BooleanExpr::Or(es) if es.is_empty() => "false".to_string(),
            BooleanExpr::Or(es) => format!("({})", es.iter().map(|e| e.fmt(config)).join(" || ")),
            BooleanExpr::Call(name) if config.has_routing_policy(name) => format!("call({name})"),
            BooleanExpr::Call(name) => format!("call({name} [undefined])"),
            BooleanExpr::CallContext => "in_call_context".to_string(),
            BooleanExpr::MatchDefaultRoute => "default_route".to_string(),
            BooleanExpr::MatchProtocol(ps) => format!("protocol in {{{}}}", ps.iter().join(", ")),
            BooleanExpr::MatchPrefixList(l) => format!("prefix in {l}"),
            BooleanExpr::MatchPrefix(p) => format!("prefix == {p}"),
            BooleanExpr::MatchCommunityList(l) => format!("communities in {l}"),
            BooleanExpr::MatchAsPathList(l) => format!("as_path in {l}"),
            BooleanExpr::MatchTag(t) => format!("tag == {t}"),
            BooleanExpr::MatchMetric(m) => format!("metric == {m}"),
            BooleanExpr::MatchInterface(is) => format!("interface in {{{}}}", is.iter().join(", ")),
        }
    }
}

fn fmt_block(block: &[Statement], config: &Configuration, indent: usize, out: &mut Vec<String>) {
    let pad = "    ".repeat(indent);
    for stmt in block {
        match stmt {
            Statement::If {
                comment,
                guard,
                then,
                otherwise,
            } => {
                if let Some(c) = comment {
                    out.push(format!("{pad}// {c}"));
                }
                out.push(format!("{pad}if {} {{", guard.fmt(config)));
                fmt_block(then, config, indent + 1, out);
                if otherwise.is_empty() {
                    out.push(format!("{pad}}}"));
                } else {
                    out.push(format!("{pad}}} else {{"));
                    fmt_block(otherwise, config, indent + 1, out);
                    out.push(format!("{pad}}}"));
                }
            }
            s => out.push(format!("{pad}{}", fmt_simple(s))),
        }
    }
}

fn fmt_simple(stmt: &Statement) -> String {
    match stmt {
        Statement::If { .. } => "if ...".to_string(),
        Statement::ReturnTrue => "return true".to_string(),
        Statement::ReturnFalse => "return false".to_string(),
        Statement::ExitAccept => "exit accept".to_string(),
        Statement::ExitReject => "exit reject".to_string(),
        Statement::SetLocalDefaultAction(a) => format!("local_default = {a}"),
        Statement::ReturnLocalDefaultAction => "return local_default".to_string(),
        Statement::SetReadIntermediateAttributes => "read_intermediate_attributes".to_string(),
        Statement::SetMetric(x) => format!("metric = {x}"),
        Statement::SetLocalPreference(x) => format!("local_pref = {x}"),
        Statement::SetWeight(x) => format!("weight = {x}"),
        Statement::SetTag(x) => format!("tag = {x}"),
        Statement::SetOrigin(x) => format!("origin = {x}"),
        Statement::SetNextHop(x) => format!("next_hop = {x}"),
        Statement::AddCommunities(cs) => format!("communities += {{{}}}", cs.iter().join(", ")),
        Statement::SetCommunities(cs) => format!("communities = {{{}}}", cs.iter().join(", ")),
        Statement::DeleteCommunities(l) => format!("communities -= {l}"),
        Statement::PrependAsPath(asns) => format!("as_path.prepend({})", asns.iter().join(" ")),
        Statement::RemovePrivateAs => "as_path.remove_private()".to_string(),
    }
}

impl<'a, 'c> ConfigFormatter<'a, 'c> for Statement {
    type Formatter = String;

    fn fmt(&'a self, config: &'c Configuration) -> Self::Formatter {
        let mut lines = Vec::new();
        fmt_block(std::slice::from_ref(self), config, 0, &mut lines);
        lines.join("\n")
    }
}

impl<'a, 'c> ConfigFormatter<'a, 'c> for RoutingPolicy {
    type Formatter = String;

    fn fmt(&'a self, config: &'c Configuration) -> Self::Formatter {
        let mut lines = vec![format!("policy {} {{", self.name)];
        fmt_block(&self.statements, config, 1, &mut lines);
        lines.push("}".to_string());
        lines.join("\n")
    }
}

impl<'a, 'c> ConfigFormatter<'a, 'c> for Configuration {
    type Formatter = String;

    fn fmt(&'a self, config: &'c Configuration) -> Self::Formatter {
        self.routing_policies
            .values()
            .map(|p| p.fmt(config))
            .join("\n\n")
    }
}
