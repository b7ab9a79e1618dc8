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

//! Conversion of prefix-lists, community-lists and AS-path access-lists.

use itertools::Itertools;

use vimodel::{
    config::Configuration,
    filters::{
        AsPathList, AsPathListLine, CommunityList, CommunityListLine, RouteFilterLine,
        RouteFilterList,
    },
};

use crate::{
    vendor::{
        filters::{AsPathAccessList, PrefixList},
        VendorConfiguration,
    },
    warnings::Warnings,
};

use super::ConversionError;

/// Character class matched by `_` in vendor AS-path expressions.
const AS_PATH_DELIMITER: &str = "(^|[,{}() ]|$)";

/// Convert all filter lists of the vendor configuration.
pub fn convert_filters(
    vendor: &VendorConfiguration,
    config: &mut Configuration,
    warnings: &mut Warnings,
) -> Result<(), ConversionError> {
    for list in vendor.prefix_lists.values() {
        config.add_route_filter_list(convert_prefix_list(list))?;
    }
    for list in vendor.community_lists.values() {
        config.add_community_list(CommunityList::new(
            list.name.clone(),
            list.lines
                .iter()
                .map(|l| CommunityListLine {
                    action: l.action,
                    communities: l.communities.clone(),
                })
                .collect(),
        ))?;
    }
    for list in vendor.as_path_lists.values() {
        config.add_as_path_list(convert_as_path_list(list, warnings))?;
    }
    Ok(())
}

/// Convert a prefix-list. Lines are ordered by their sequence number.
pub fn convert_prefix_list(list: &PrefixList) -> RouteFilterList {
    RouteFilterList::new(
        list.name.clone(),
        list.lines
            .iter()
            .sorted_by_key(|l| l.sequence)
            .map(|l| {
                let (min_len, max_len) = l.length_range();
                RouteFilterLine {
                    action: l.action,
                    prefix: l.prefix.trunc(),
                    min_len,
                    max_len,
                }
            })
            .collect(),
    )
}

/// Convert an AS-path access-list. Lines with an invalid expression are dropped.
pub fn convert_as_path_list(list: &AsPathAccessList, warnings: &mut Warnings) -> AsPathList {
    let mut lines = Vec::new();
    for line in &list.lines {
        match AsPathListLine::new(line.action, as_path_regex(&line.regex)) {
            Ok(l) => lines.push(l),
            Err(e) => warnings.red_flag(format!(
                "Ignoring invalid regex {} in as-path access-list {}: {}",
                line.regex, list.name, e
            )),
        }
    }
    AsPathList::new(list.name.clone(), lines)
}

/// Translate a vendor AS-path expression into `regex` syntax.
pub fn as_path_regex(regex: &str) -> String {
    regex.replace('_', AS_PATH_DELIMITER)
}
