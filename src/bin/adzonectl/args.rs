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

//! Implements command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use adzone::rr::RecordType;
use adzone::zone::Partition;

/// Parses the command line arguments.
pub fn parse() -> Args {
    Args::parse()
}

/// Encode, decode, and plan changes to Active Directory DNS records
#[derive(Debug, Parser)]
#[command(author, version)]
pub struct Args {
    /// Set the configuration file to use
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encode a record as a dnsRecord attribute value
    Encode(EncodeArgs),

    /// Decode dnsRecord attribute values
    Decode(DecodeArgs),

    /// Print an LDIF change record that adds, replaces, or deletes a
    /// record node
    Ldif(LdifArgs),
}

#[derive(Debug, Parser)]
pub struct EncodeArgs {
    /// The record type (A, AAAA, CNAME, MX, PTR, SRV, or TXT)
    #[arg(value_name = "TYPE")]
    pub rr_type: RecordType,

    /// The record data, e.g. "10 mail.example.com" for MX
    pub data: String,

    /// Set the TTL in seconds [default: from the configuration, or 3600]
    #[arg(long)]
    pub ttl: Option<u32>,

    /// Print the value in hex rather than base64
    #[arg(long)]
    pub hex: bool,
}

#[derive(Debug, Parser)]
pub struct DecodeArgs {
    /// Base64-encoded values; read one per line from standard input if
    /// none are given
    pub values: Vec<String>,

    /// Also print each value's header fields
    #[arg(long)]
    pub header: bool,
}

#[derive(Debug, Parser)]
pub struct LdifArgs {
    /// The kind of change
    #[arg(value_enum)]
    pub action: Action,

    /// The zone name, e.g. example.com
    pub zone: String,

    /// The record name relative to the zone ("@" for the apex)
    pub name: String,

    /// The record type (required for add and replace)
    #[arg(value_name = "TYPE", required_if_eq_any = [("action", "add"), ("action", "replace")])]
    pub rr_type: Option<RecordType>,

    /// The record data (required for add and replace)
    #[arg(required_if_eq_any = [("action", "add"), ("action", "replace")])]
    pub data: Option<String>,

    /// Set the TTL in seconds [default: from the configuration, or 3600]
    #[arg(long)]
    pub ttl: Option<u32>,

    /// Set the domain's base DN, e.g. DC=example,DC=com
    #[arg(long, value_name = "DN")]
    pub base_dn: Option<String>,

    /// Set the partition holding the zone (domain or forest)
    #[arg(long)]
    pub partition: Option<Partition>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Action {
    Add,
    Replace,
    Delete,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ldif_requires_data_for_add() {
        assert!(Args::try_parse_from(["adzonectl", "ldif", "add", "example.com", "www"]).is_err());
        let args = Args::try_parse_from([
            "adzonectl",
            "ldif",
            "add",
            "example.com",
            "www",
            "a",
            "192.0.2.1",
        ])
        .unwrap();
        match args.command {
            Command::Ldif(ldif) => {
                assert_eq!(ldif.action, Action::Add);
                assert_eq!(ldif.rr_type, Some(RecordType::A));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn ldif_delete_needs_only_a_name() {
        let args =
            Args::try_parse_from(["adzonectl", "ldif", "delete", "example.com", "old"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Ldif(LdifArgs {
                action: Action::Delete,
                rr_type: None,
                ..
            })
        ));
    }

    #[test]
    fn encode_accepts_lowercase_types() {
        let args = Args::try_parse_from(["adzonectl", "encode", "srv", "0 100 389 dc1.example.com"])
            .unwrap();
        match args.command {
            Command::Encode(encode) => assert_eq!(encode.rr_type, RecordType::Srv),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn clap_configuration_is_valid() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
