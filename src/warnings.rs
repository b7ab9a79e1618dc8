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

//! Append-only sink for problems found while converting a configuration. Warnings never change
//! the control flow of the conversion; they are rendered once the conversion is done.

use std::fmt;

/// Collected warnings of a single conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Warnings {
    /// Configuration that is invalid or cannot be interpreted.
    red_flags: Vec<String>,
    /// Configuration that is valid but not supported.
    unimplemented: Vec<String>,
}

impl Warnings {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an invalid or uninterpretable configuration.
    pub fn red_flag(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        log::warn!("{}", msg);
        self.red_flags.push(msg);
    }

    /// Record a valid but unsupported configuration.
    pub fn unimplemented(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        log::debug!("unimplemented: {}", msg);
        self.unimplemented.push(msg);
    }

    /// All red flags, in the order in which they were recorded.
    pub fn red_flags(&self) -> &[String] {
        &self.red_flags
    }

    /// All unimplemented features, in the order in which they were recorded.
    pub fn unimplemented_features(&self) -> &[String] {
        &self.unimplemented
    }

    /// Returns `true` if no warning was recorded.
    pub fn is_empty(&self) -> bool {
        self.red_flags.is_empty() && self.unimplemented.is_empty()
    }

    /// Returns `true` if any red flag contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.red_flags.iter().any(|w| w.contains(needle))
    }
}

impl fmt::Display for Warnings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for w in &self.red_flags {
            writeln!(f, "red flag: {w}")?;
        }
        for w in &self.unimplemented {
            writeln!(f, "unimplemented: {w}")?;
        }
        Ok(())
    }
}
