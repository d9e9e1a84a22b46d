// Copyright 2022 Matthew Ingwersen.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you
// may not use this file except in compliance with the License. You may
// obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied. See the License for the specific language governing
// permissions and limitations under the License.


//! Runs the selected command.

use std::fmt::Write as _;
use std::io;
use std::process;

use anyhow::{Context, Result};
use env_logger::Env;
use log::{error, info};

use crate::args::{Args, Command};
use crate::codec;
use crate::config::{self, Config};
use crate::ldif;

/// Runs the command given by `args`, exiting the process with failure
/// if it does not succeed.
pub fn run(args: Args) {
    env_logger::init_from_env(Env::new().default_filter_or("warn"));

    if let Err(e) = try_running(args) {
        let mut message = String::from("Failed:");
        for (i, cause) in e.chain().enumerate() {
            write!(message, "\n[{}] {}", i + 1, cause).unwrap();
        }
        error!("{}", message);
        process::exit(1);
    }
}

fn try_running(args: Args) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        info!("Loading the configuration from {}.", config_path.display());
        config::load_from_path(config_path).context("failed to load the configuration")?
    } else {
        Config::default()
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.command {
        Command::Encode(ref encode_args) => codec::encode(encode_args, &config, &mut out),
        Command::Decode(ref decode_args) => codec::decode(decode_args, &mut out),
        Command::Ldif(ref ldif_args) => ldif::run(ldif_args, &config, &mut out),
    }
}
