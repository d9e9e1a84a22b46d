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

//! Implementation of the [`RecordData`] type and RDATA processing.
//!
//! RDATA travels in three forms: the free text that operators type
//! (e.g. `10 mail.example.com` for MX), the structured [`RecordData`]
//! value, and the binary form stored in the directory. This module
//! converts between all three:
//!
//! * [`RecordData::parse`] turns text into a [`RecordData`], failing
//!   with an [`EncodeError`] on bad input;
//! * [`RecordData::write`] serializes a [`RecordData`] to binary;
//! * [`RecordData::decode`] turns binary back into a [`RecordData`] and
//!   never fails; and
//! * the [`Display`](fmt::Display) implementation produces text that
//!   [`RecordData::parse`] accepts.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use super::{EncodeError, RecordType};
use crate::name::Name;
use crate::util::to_hex;

// Implementation helpers.
mod helpers;

// Implementations of RR types.
mod ipv6;
mod srv;
mod std13;
pub use ipv6::serialize_aaaa;
pub use srv::serialize_srv;
pub use std13::{serialize_mx, serialize_txt, DEFAULT_MX_PRIORITY, MAX_TXT_LEN};

////////////////////////////////////////////////////////////////////////
// RECORD DATA TYPE                                                   //
////////////////////////////////////////////////////////////////////////

/// The type-specific payload of a record.
///
/// Besides one variant per supported [`RecordType`], there are two
/// variants that only arise from decoding stored data:
///
/// * [`RecordData::Unrecognized`] holds the payload of a type this
///   crate does not know; and
/// * [`RecordData::Malformed`] holds the payload of a supported type
///   that is too short to decode.
///
/// Both display as lower-case hex so that the record is still visible
/// (and can still be deleted) by an operator.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum RecordData {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Cname(Name),
    Ptr(Name),
    Mx {
        priority: u16,
        exchange: Name,
    },
    Srv {
        priority: u16,
        weight: u16,
        port: u16,
        target: Name,
    },
    Txt(String),
    Unrecognized {
        code: u16,
        octets: Vec<u8>,
    },
    Malformed {
        rr_type: RecordType,
        octets: Vec<u8>,
    },
}

impl RecordData {
    /// Parses the textual data `text` for a record of type `rr_type`.
    ///
    /// The accepted formats are:
    ///
    /// * A: a dotted-quad IPv4 address;
    /// * AAAA: an IPv6 address;
    /// * CNAME and PTR: a domain name;
    /// * MX: `priority hostname`, or just `hostname`, in which case the
    ///   priority is [`DEFAULT_MX_PRIORITY`];
    /// * SRV: exactly `priority weight port target`; and
    /// * TXT: any text up to [`MAX_TXT_LEN`] octets of UTF-8, taken
    ///   verbatim.
    ///
    /// Surrounding whitespace is ignored for every type except TXT.
    pub fn parse(rr_type: RecordType, text: &str) -> Result<Self, EncodeError> {
        match rr_type {
            RecordType::A => std13::parse_a(text),
            RecordType::Aaaa => ipv6::parse_aaaa(text),
            RecordType::Cname | RecordType::Ptr => std13::parse_target(rr_type, text),
            RecordType::Mx => std13::parse_mx(text),
            RecordType::Srv => srv::parse_srv(text),
            RecordType::Txt => std13::parse_txt(text),
            RecordType::Unrecognized(_) => Err(EncodeError::UnsupportedType(rr_type)),
        }
    }

    /// Decodes the binary RDATA `octets` of a record of type `rr_type`.
    ///
    /// This never fails. Payloads of unknown types become
    /// [`RecordData::Unrecognized`], and payloads too short for their
    /// type become [`RecordData::Malformed`]. Trailing octets after a
    /// fixed-size payload (A, AAAA) are ignored, as are octets after an
    /// embedded name.
    pub fn decode(rr_type: RecordType, octets: &[u8]) -> Self {
        let decoded = match rr_type {
            RecordType::A => std13::decode_a(octets),
            RecordType::Aaaa => ipv6::decode_aaaa(octets),
            RecordType::Cname => Some(Self::Cname(Name::from_wire(octets, 0).0)),
            RecordType::Ptr => Some(Self::Ptr(Name::from_wire(octets, 0).0)),
            RecordType::Mx => std13::decode_mx(octets),
            RecordType::Srv => srv::decode_srv(octets),
            RecordType::Txt => std13::decode_txt(octets),
            RecordType::Unrecognized(code) => {
                return Self::Unrecognized {
                    code,
                    octets: octets.to_vec(),
                }
            }
        };
        decoded.unwrap_or_else(|| Self::Malformed {
            rr_type,
            octets: octets.to_vec(),
        })
    }

    /// Serializes this `RecordData` into the provided buffer.
    ///
    /// The raw octets of [`RecordData::Unrecognized`] and
    /// [`RecordData::Malformed`] values are written back unchanged.
    /// This fails only if a [`RecordData::Txt`] value is too long, which
    /// can happen if it was constructed directly rather than through
    /// [`RecordData::parse`].
    pub fn write(&self, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
        match self {
            Self::A(address) => buf.extend_from_slice(&address.octets()),
            Self::Aaaa(address) => serialize_aaaa(*address, buf),
            Self::Cname(target) | Self::Ptr(target) => buf.extend_from_slice(target.wire_repr()),
            Self::Mx { priority, exchange } => serialize_mx(*priority, exchange, buf),
            Self::Srv {
                priority,
                weight,
                port,
                target,
            } => serialize_srv(*priority, *weight, *port, target, buf),
            Self::Txt(text) => {
                std13::check_txt_len(text)?;
                serialize_txt(text, buf);
            }
            Self::Unrecognized { octets, .. } | Self::Malformed { octets, .. } => {
                buf.extend_from_slice(octets)
            }
        }
        Ok(())
    }

    /// Returns the RR type of this data.
    pub fn rr_type(&self) -> RecordType {
        match self {
            Self::A(_) => RecordType::A,
            Self::Aaaa(_) => RecordType::Aaaa,
            Self::Cname(_) => RecordType::Cname,
            Self::Ptr(_) => RecordType::Ptr,
            Self::Mx { .. } => RecordType::Mx,
            Self::Srv { .. } => RecordType::Srv,
            Self::Txt(_) => RecordType::Txt,
            Self::Unrecognized { code, .. } => RecordType::Unrecognized(*code),
            Self::Malformed { rr_type, .. } => *rr_type,
        }
    }

    /// Returns whether this data came from a stored payload that could
    /// not be decoded.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

impl fmt::Display for RecordData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::A(address) => write!(f, "{}", address),
            Self::Aaaa(address) => write!(f, "{}", address),
            Self::Cname(target) | Self::Ptr(target) => write!(f, "{}", target),
            Self::Mx { priority, exchange } => write!(f, "{} {}", priority, exchange),
            Self::Srv {
                priority,
                weight,
                port,
                target,
            } => write!(f, "{} {} {} {}", priority, weight, port, target),
            Self::Txt(text) => f.write_str(text),
            Self::Unrecognized { octets, .. } | Self::Malformed { octets, .. } => {
                f.write_str(&to_hex(octets))
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////
// FREE-FUNCTION FORMS                                                //
////////////////////////////////////////////////////////////////////////

/// Parses `text` as data for `rr_type` and serializes it to binary
/// RDATA.
pub fn encode_rdata(rr_type: RecordType, text: &str) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    RecordData::parse(rr_type, text)?.write(&mut buf)?;
    Ok(buf)
}

/// Decodes binary RDATA of type `rr_type`. See [`RecordData::decode`].
pub fn decode_rdata(rr_type: RecordType, octets: &[u8]) -> RecordData {
    RecordData::decode(rr_type, octets)
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_round_trips_for_every_supported_type() {
        let cases = [
            (RecordType::A, "203.0.113.5"),
            (RecordType::Aaaa, "2001:db8::5"),
            (RecordType::Cname, "www.example.com"),
            (RecordType::Ptr, "host.example.com"),
            (RecordType::Mx, "20 mail.example.com"),
            (RecordType::Srv, "0 100 389 dc1.example.com"),
            (RecordType::Txt, "v=spf1 mx -all"),
        ];
        for (rr_type, text) in cases {
            let octets = encode_rdata(rr_type, text).unwrap();
            let decoded = decode_rdata(rr_type, &octets);
            assert_eq!(decoded, RecordData::parse(rr_type, text).unwrap());
            assert_eq!(decoded.to_string(), text);
            assert_eq!(decoded.rr_type(), rr_type);
        }
    }

    #[test]
    fn a_encodes_to_four_octets() {
        assert_eq!(
            encode_rdata(RecordType::A, "203.0.113.5").unwrap(),
            vec![203, 0, 113, 5]
        );
    }

    #[test]
    fn mx_defaults_priority_to_ten() {
        let octets = encode_rdata(RecordType::Mx, "mail.example.com").unwrap();
        assert_eq!(&octets[..2], &[10, 0]);
        assert_eq!(
            decode_rdata(RecordType::Mx, &octets).to_string(),
            "10 mail.example.com"
        );
    }

    #[test]
    fn srv_with_three_fields_is_an_arity_error() {
        assert_eq!(
            encode_rdata(RecordType::Srv, "10 20 25"),
            Err(EncodeError::SrvArity { found: 3 })
        );
    }

    #[test]
    fn txt_is_limited_to_255_octets() {
        let longest = "x".repeat(255);
        let octets = encode_rdata(RecordType::Txt, &longest).unwrap();
        assert_eq!(octets.len(), 256);
        assert_eq!(octets[0], 255);
        assert_eq!(
            decode_rdata(RecordType::Txt, &octets),
            RecordData::Txt(longest)
        );

        assert_eq!(
            encode_rdata(RecordType::Txt, &"x".repeat(256)),
            Err(EncodeError::TxtTooLong { len: 256 })
        );
    }

    #[test]
    fn txt_limit_counts_utf8_octets() {
        // 128 two-octet characters are 256 octets.
        let text = "\u{e9}".repeat(128);
        assert_eq!(
            encode_rdata(RecordType::Txt, &text),
            Err(EncodeError::TxtTooLong { len: 256 })
        );
        let text = "\u{e9}".repeat(127);
        let octets = encode_rdata(RecordType::Txt, &text).unwrap();
        assert_eq!(decode_rdata(RecordType::Txt, &octets), RecordData::Txt(text));
    }

    #[test]
    fn txt_is_taken_verbatim() {
        let octets = encode_rdata(RecordType::Txt, "  padded  ").unwrap();
        assert_eq!(decode_rdata(RecordType::Txt, &octets).to_string(), "  padded  ");
    }

    #[test]
    fn short_payloads_are_malformed() {
        let cases: [(RecordType, &[u8]); 5] = [
            (RecordType::A, &[203, 0, 113]),
            (RecordType::Aaaa, &[0; 15]),
            (RecordType::Mx, &[10]),
            (RecordType::Srv, &[0, 0, 0, 0, 0]),
            (RecordType::Txt, &[]),
        ];
        for (rr_type, octets) in cases {
            let decoded = decode_rdata(rr_type, octets);
            assert!(decoded.is_malformed());
            assert_eq!(decoded.rr_type(), rr_type);
            assert_eq!(decoded.to_string(), to_hex(octets));
        }
    }

    #[test]
    fn unrecognized_types_decode_to_hex() {
        let decoded = decode_rdata(RecordType::from_code(99), &[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(
            decoded,
            RecordData::Unrecognized {
                code: 99,
                octets: vec![0xde, 0xad, 0xbe, 0xef],
            }
        );
        assert_eq!(decoded.to_string(), "deadbeef");
    }

    #[test]
    fn unrecognized_types_cannot_be_encoded() {
        let rr_type = RecordType::Unrecognized(6);
        assert_eq!(
            encode_rdata(rr_type, "anything"),
            Err(EncodeError::UnsupportedType(rr_type))
        );
    }

    #[test]
    fn srv_decodes_to_text() {
        let mut octets = vec![5, 0, 10, 0];
        octets.extend_from_slice(&443u16.to_le_bytes());
        octets.extend_from_slice(b"\x04ldap\x07example\x03com\x00");
        assert_eq!(
            decode_rdata(RecordType::Srv, &octets).to_string(),
            "5 10 443 ldap.example.com"
        );
    }

    #[test]
    fn directly_built_long_txt_is_not_written() {
        let mut buf = Vec::new();
        assert_eq!(
            RecordData::Txt("x".repeat(300)).write(&mut buf),
            Err(EncodeError::TxtTooLong { len: 300 })
        );
        assert!(buf.is_empty());
    }
}
