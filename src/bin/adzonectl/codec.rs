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

//! Implements the `encode` and `decode` commands.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::warn;

use adzone::util::to_hex;
use adzone::zone::{self, StoredRecord};

use crate::args::{DecodeArgs, EncodeArgs};
use crate::config::Config;

/// Runs the `encode` command.
pub fn encode(args: &EncodeArgs, config: &Config, out: &mut impl Write) -> Result<()> {
    let ttl = args.ttl.unwrap_or(config.default_ttl);
    let value = zone::encode_value(args.rr_type, &args.data, ttl)
        .with_context(|| format!("failed to encode the {} record", args.rr_type))?;
    if args.hex {
        writeln!(out, "{}", to_hex(&value))?;
    } else {
        writeln!(out, "{}", STANDARD.encode(&value))?;
    }
    Ok(())
}

/// Runs the `decode` command, reading values from standard input if
/// none were given on the command line.
pub fn decode(args: &DecodeArgs, out: &mut impl Write) -> Result<()> {
    if args.values.is_empty() {
        let lines = io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<Vec<_>>>()
            .context("failed to read standard input")?;
        decode_all(&lines, args.header, out)
    } else {
        decode_all(&args.values, args.header, out)
    }
}

fn decode_all(values: &[String], header: bool, out: &mut impl Write) -> Result<()> {
    let values = values.iter().map(|v| v.trim()).filter(|v| !v.is_empty());
    for (i, text) in values.enumerate() {
        let value = STANDARD
            .decode(text)
            .with_context(|| format!("value {} is not valid base64", i + 1))?;
        let stored = StoredRecord::from_value(&value);
        writeln!(out, "{}", stored)?;
        if let StoredRecord::Decoded(ref envelope) = stored {
            if header {
                writeln!(out, "  header: {}", envelope.header)?;
            }
            if !envelope.header.is_standard() {
                warn!("Value {} has a non-standard header: {}", i + 1, envelope.header);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use adzone::rr::RecordType;

    fn encode_to_string(rr_type: RecordType, data: &str, ttl: Option<u32>, hex: bool) -> String {
        let args = EncodeArgs {
            rr_type,
            data: data.to_owned(),
            ttl,
            hex,
        };
        let mut out = Vec::new();
        encode(&args, &Config::default(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn encodes_known_value() {
        assert_eq!(
            encode_to_string(RecordType::A, "203.0.113.5", Some(300), true),
            "0400010005f0000001000000\
             0000012c0000000000000000cb007105\n"
        );
    }

    #[test]
    fn encode_uses_configured_default_ttl() {
        let b64 = encode_to_string(RecordType::Txt, "hello", None, false);
        let value = STANDARD.decode(b64.trim()).unwrap();
        assert_eq!(&value[12..16], &3600u32.to_be_bytes());
    }

    #[test]
    fn encode_errors_are_reported() {
        let args = EncodeArgs {
            rr_type: RecordType::Srv,
            data: "10 20 25".to_owned(),
            ttl: None,
            hex: false,
        };
        let err = encode(&args, &Config::default(), &mut Vec::<u8>::new()).unwrap_err();
        assert_eq!(err.to_string(), "failed to encode the SRV record");
        assert_eq!(err.chain().count(), 3);
    }

    #[test]
    fn decodes_values_and_headers() {
        let a = encode_to_string(RecordType::A, "203.0.113.5", Some(300), false);
        let short = STANDARD.encode([1u8, 2, 3]);
        let mut out = Vec::new();
        decode_all(&[a.trim().to_owned(), String::new(), short], true, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "300 A 203.0.113.5\n\
             \x20 header: length=4 type=1 version=5 rank=240 flags=0x0000 serial=1 ttl=300 \
             reserved=0 timestamp=0\n\
             unparseable 010203\n"
        );
    }

    #[test]
    fn bad_base64_is_an_error() {
        assert!(decode_all(&["***".to_owned()], false, &mut Vec::<u8>::new()).is_err());
    }
}
