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

use clap::Parser;
use serde::Deserialize;
use std::{fs::File, io::BufReader, path::PathBuf};

use confnorm::{convert, vendor::VendorConfiguration, Warnings};
use vimodel::{
    config::{Configuration, Interface, DEFAULT_VRF},
    formatter::ConfigFormatter,
};

/// Convert a vendor configuration snapshot into the vendor-independent model.
#[derive(Debug, Parser)]
struct Cli {
    /// JSON snapshot containing the VRFs, the interfaces, and the vendor configuration.
    input: PathBuf,
    /// Print the compiled routing policies
    #[clap(long = "print", short = 'p')]
    print: bool,
    /// Print the resulting configuration as JSON
    #[clap(long = "json", short = 'j')]
    json: bool,
}

/// Input of the conversion. VRFs and interfaces are assigned by an earlier stage of the pipeline.
#[derive(Debug, Deserialize)]
struct Snapshot {
    /// Names of all VRFs. The default VRF always exists.
    #[serde(default)]
    vrfs: Vec<String>,
    /// Layer-3 interfaces
    #[serde(default)]
    interfaces: Vec<Interface>,
    /// Vendor configuration
    vendor: VendorConfiguration,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_timed();

    let args = Cli::parse();

    let reader = BufReader::new(File::open(&args.input)?);
    let Snapshot {
        vrfs,
        interfaces,
        mut vendor,
    } = serde_json::from_reader(reader)?;

    let mut config = Configuration::new(vendor.hostname.clone());
    config.add_vrf(DEFAULT_VRF);
    for vrf in vrfs {
        config.add_vrf(vrf);
    }
    for iface in interfaces {
        config.add_interface(iface);
    }

    let mut warnings = Warnings::new();
    convert(&mut vendor, &mut config, &mut warnings)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    }
    if args.print {
        println!("{}", config.fmt(&config));
    }
    if !warnings.is_empty() {
        eprint!("{warnings}");
    }

    Ok(())
}
