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

//! Implements the `ldif` command, which prints [RFC 2849] change
//! records that can be applied with standard directory tools (e.g.
//! `ldapmodify` or `ldifde`).
//!
//! [RFC 2849]: https://datatracker.ietf.org/doc/html/rfc2849

use std::io::{self, Write};

use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use adzone::directory::Dn;
use adzone::zone::{self, DNS_RECORD, NODE_OBJECT_CLASSES};

use crate::args::{Action, LdifArgs};
use crate::config::Config;

/// The longest line written before folding.
const MAX_LINE_LEN: usize = 76;

/// A change to one record node.
#[derive(Debug, Eq, PartialEq)]
pub enum Change {
    /// Create the node with a single `dnsRecord` value.
    Add(Vec<u8>),

    /// Replace every `dnsRecord` value with this one.
    Replace(Vec<u8>),

    /// Delete the node.
    Delete,
}

/// Runs the `ldif` command.
pub fn run(args: &LdifArgs, config: &Config, out: &mut impl Write) -> Result<()> {
    let base_dn = args
        .base_dn
        .as_deref()
        .or(config.base_dn.as_deref())
        .ok_or_else(|| anyhow!("no base DN given (use --base-dn or set base_dn)"))?;
    let partition = args.partition.unwrap_or(config.partition.0);
    let zone = zone::zone_dn(&Dn::from(base_dn), partition, &args.zone);
    let dn = zone::record_dn(&zone, &args.name).context("invalid record name")?;

    let change = match args.action {
        Action::Add => Change::Add(encode(args, config)?),
        Action::Replace => Change::Replace(encode(args, config)?),
        Action::Delete => Change::Delete,
    };
    write_change(out, &dn, &change)?;
    Ok(())
}

fn encode(args: &LdifArgs, config: &Config) -> Result<Vec<u8>> {
    let rr_type = args.rr_type.ok_or_else(|| anyhow!("a record type is required"))?;
    let data = args
        .data
        .as_deref()
        .ok_or_else(|| anyhow!("record data is required"))?;
    let ttl = args.ttl.unwrap_or(config.default_ttl);
    zone::encode_value(rr_type, data, ttl)
        .with_context(|| format!("failed to encode the {} record", rr_type))
}

/// Writes the change record for `change` applied to the node `dn`.
pub fn write_change(out: &mut impl Write, dn: &Dn, change: &Change) -> io::Result<()> {
    write_line(out, &attr_value_line("dn", dn.as_str().as_bytes()))?;
    match change {
        Change::Add(value) => {
            write_line(out, "changetype: add")?;
            for class in NODE_OBJECT_CLASSES {
                write_line(out, &attr_value_line("objectClass", class.as_bytes()))?;
            }
            write_line(out, &base64_line(DNS_RECORD, value))?;
        }
        Change::Replace(value) => {
            write_line(out, "changetype: modify")?;
            write_line(out, &format!("replace: {}", DNS_RECORD))?;
            write_line(out, &base64_line(DNS_RECORD, value))?;
            write_line(out, "-")?;
        }
        Change::Delete => write_line(out, "changetype: delete")?,
    }
    writeln!(out)
}

/// Renders `name: value`, or `name:: <base64>` if `value` is not a
/// SAFE-STRING.
fn attr_value_line(name: &str, value: &[u8]) -> String {
    if is_safe_string(value) {
        // Safe strings are ASCII.
        format!("{}: {}", name, String::from_utf8_lossy(value))
    } else {
        base64_line(name, value)
    }
}

fn base64_line(name: &str, value: &[u8]) -> String {
    format!("{}:: {}", name, STANDARD.encode(value))
}

fn is_safe_string(value: &[u8]) -> bool {
    let safe_char = |b: &u8| b.is_ascii() && !matches!(b, b'\0' | b'\n' | b'\r');
    match value.first() {
        None => true,
        Some(b' ' | b':' | b'<') => false,
        Some(_) => value.iter().all(safe_char) && value.last() != Some(&b' '),
    }
}

/// Writes `line`, folding it onto continuation lines (which begin with
/// a space) if it is longer than [`MAX_LINE_LEN`]. Lines produced here
/// are ASCII, so folding never splits a character.
fn write_line(out: &mut impl Write, line: &str) -> io::Result<()> {
    let (first, mut rest) = line.split_at(line.len().min(MAX_LINE_LEN));
    writeln!(out, "{}", first)?;
    while !rest.is_empty() {
        let (chunk, remaining) = rest.split_at(rest.len().min(MAX_LINE_LEN - 1));
        writeln!(out, " {}", chunk)?;
        rest = remaining;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use adzone::rr::RecordType;
    use adzone::zone::Partition;

    fn render(dn: &Dn, change: &Change) -> String {
        let mut out = Vec::new();
        write_change(&mut out, dn, change).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn www() -> Dn {
        Dn::from("DC=www,DC=example.com,CN=MicrosoftDNS,DC=DomainDnsZones,DC=example,DC=com")
    }

    #[test]
    fn add_record() {
        let value = zone::encode_value(RecordType::A, "203.0.113.5", 300).unwrap();
        assert_eq!(
            render(&www(), &Change::Add(value)),
            "dn: DC=www,DC=example.com,CN=MicrosoftDNS,DC=DomainDnsZones,DC=example,DC=co\n \
             m\n\
             changetype: add\n\
             objectClass: top\n\
             objectClass: dnsNode\n\
             dnsRecord:: BAABAAXwAAABAAAAAAABLAAAAAAAAAAAywBxBQ==\n\
             \n"
        );
    }

    #[test]
    fn replace_and_delete_records() {
        let dn = Dn::from("DC=www,DC=example.com");
        let value = zone::encode_value(RecordType::A, "203.0.113.5", 300).unwrap();
        assert_eq!(
            render(&dn, &Change::Replace(value)),
            "dn: DC=www,DC=example.com\n\
             changetype: modify\n\
             replace: dnsRecord\n\
             dnsRecord:: BAABAAXwAAABAAAAAAABLAAAAAAAAAAAywBxBQ==\n\
             -\n\
             \n"
        );
        assert_eq!(
            render(&dn, &Change::Delete),
            "dn: DC=www,DC=example.com\nchangetype: delete\n\n"
        );
    }

    #[test]
    fn long_lines_are_folded() {
        let text = format!("v=spf1 {}", "x".repeat(120));
        let value = zone::encode_value(RecordType::Txt, &text, 3600).unwrap();
        let text = render(&Dn::from("DC=@,DC=example.com"), &Change::Add(value.clone()));
        assert!(text.lines().all(|line| line.len() <= MAX_LINE_LEN));
        let unfolded = text.replace("\n ", "");
        assert!(unfolded.contains(&format!("dnsRecord:: {}\n", STANDARD.encode(&value))));
    }

    #[test]
    fn unsafe_values_are_base64_encoded() {
        assert_eq!(attr_value_line("dn", b"DC=a"), "dn: DC=a");
        assert_eq!(attr_value_line("dn", b" lead"), "dn:: IGxlYWQ=");
        assert_eq!(attr_value_line("dn", "DC=\u{e9}".as_bytes()), "dn:: REM9w6k=");
    }

    #[test]
    fn run_uses_configuration_defaults() {
        let args = LdifArgs {
            action: Action::Add,
            zone: "example.com".to_owned(),
            name: "www".to_owned(),
            rr_type: Some(RecordType::A),
            data: Some("203.0.113.5".to_owned()),
            ttl: Some(300),
            base_dn: None,
            partition: Some(Partition::Domain),
        };
        let mut out = Vec::new();
        assert!(run(&args, &Config::default(), &mut out).is_err());

        let config = Config {
            base_dn: Some("DC=example,DC=com".to_owned()),
            ..Config::default()
        };
        run(&args, &config, &mut out).unwrap();
        let value = zone::encode_value(RecordType::A, "203.0.113.5", 300).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), render(&www(), &Change::Add(value)));
    }
}
