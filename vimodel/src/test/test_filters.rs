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

use maplit::btreeset;

use crate::{
    filters::*,
    types::{Community, LineAction::*},
};

#[test]
fn route_filter_lines() {
    let net = |s: &str| s.parse().unwrap();
    let list = RouteFilterList::new(
        "pl",
        vec![
            RouteFilterLine::exact(Deny, net("10.0.0.0/24")),
            RouteFilterLine {
                action: Permit,
                prefix: net("10.0.0.0/8"),
                min_len: 16,
                max_len: 24,
            },
        ],
    );
    assert!(!list.permits(&net("10.0.0.0/24")));
    assert!(list.permits(&net("10.1.0.0/24")));
    assert!(list.permits(&net("10.1.0.0/16")));
    assert!(!list.permits(&net("10.0.0.0/8")));
    assert!(!list.permits(&net("10.1.1.0/25")));
    assert!(!list.permits(&net("11.0.0.0/16")));

    let longer = RouteFilterLine::longer(Permit, net("10.0.0.0/8"));
    assert!(!longer.matches(&net("10.0.0.0/8")));
    assert!(longer.matches(&net("10.0.0.0/9")));
    let host = RouteFilterLine::longer(Permit, net("10.0.0.1/32"));
    assert!(!host.matches(&net("10.0.0.1/32")));
    let orlonger = RouteFilterLine::orlonger(Permit, net("10.0.0.0/8"));
    assert!(orlonger.matches(&net("10.0.0.0/8")));
}

#[test]
fn community_list() {
    let c = Community::from_parts;
    let list = CommunityList::new(
        "cl",
        vec![
            CommunityListLine {
                action: Deny,
                communities: btreeset! {c(1, 1)},
            },
            CommunityListLine {
                action: Permit,
                communities: btreeset! {c(2, 2), c(3, 3)},
            },
        ],
    );
    assert!(!list.permits(&btreeset! {c(1, 1), c(2, 2), c(3, 3)}));
    assert!(list.permits(&btreeset! {c(2, 2), c(3, 3), c(4, 4)}));
    assert!(!list.permits(&btreeset! {c(2, 2)}));
    assert!(!list.permits_single(c(2, 2)));
    assert!("65000:10".parse::<Community>().unwrap() == c(65000, 10));
    assert_eq!(c(65000, 10).to_string(), "65000:10");
    assert!("65000".parse::<Community>().is_err());
}

#[test]
fn as_path_list() {
    let list = AsPathList::new(
        "al",
        vec![
            AsPathListLine::new(Deny, "(^|[ ])65001([ ]|$)").unwrap(),
            AsPathListLine::new(Permit, "^100([ ]|$)").unwrap(),
        ],
    );
    assert!(list.permits(&[100, 200]));
    assert!(!list.permits(&[100, 65001]));
    assert!(!list.permits(&[1000]));
    assert!(!list.permits(&[]));
    assert!(AsPathListLine::new(Permit, "(").is_err());
}
