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

//! Handling of the [RFC 1035] RR types A, CNAME, PTR, MX, and TXT.
//!
//! Note that the directory's record format departs from [RFC 1035] in
//! byte order: the MX preference is stored little-endian.
//!
//! [RFC 1035]: https://datatracker.ietf.org/doc/html/rfc1035

use std::net::Ipv4Addr;

use super::helpers;
use super::RecordData;
use crate::name::Name;
use crate::rr::{EncodeError, RecordType};

/// The MX preference used when the caller supplies only a hostname.
pub const DEFAULT_MX_PRIORITY: u16 = 10;

/// The longest TXT string that fits behind its one-octet length prefix.
pub const MAX_TXT_LEN: usize = 255;

////////////////////////////////////////////////////////////////////////
// RFC 1035 § 3.4.1 - A RDATA                                         //
////////////////////////////////////////////////////////////////////////

/// Parses a dotted-quad IPv4 address.
pub(super) fn parse_a(text: &str) -> Result<RecordData, EncodeError> {
    let text = text.trim();
    text.parse()
        .map(RecordData::A)
        .map_err(|_| EncodeError::InvalidAddress {
            rr_type: RecordType::A,
            text: text.to_owned(),
        })
}

/// Decodes A RDATA. Octets past the first four are ignored.
pub(super) fn decode_a(octets: &[u8]) -> Option<RecordData> {
    let address: [u8; 4] = octets.get(0..4)?.try_into().ok()?;
    Some(RecordData::A(Ipv4Addr::from(address)))
}

////////////////////////////////////////////////////////////////////////
// RFC 1035 §§ 3.3.1 AND 3.3.12 - CNAME AND PTR RDATA                 //
////////////////////////////////////////////////////////////////////////

/// Parses the single domain name of CNAME or PTR data.
pub(super) fn parse_target(rr_type: RecordType, text: &str) -> Result<RecordData, EncodeError> {
    let target = helpers::parse_name(text.trim())?;
    match rr_type {
        RecordType::Ptr => Ok(RecordData::Ptr(target)),
        _ => Ok(RecordData::Cname(target)),
    }
}

////////////////////////////////////////////////////////////////////////
// RFC 1035 § 3.3.9 - MX RDATA                                        //
////////////////////////////////////////////////////////////////////////

/// Parses MX data given either as `priority hostname` or, as a
/// convenience, as a bare `hostname`, in which case the priority is
/// [`DEFAULT_MX_PRIORITY`].
pub(super) fn parse_mx(text: &str) -> Result<RecordData, EncodeError> {
    let (priority, exchange) = match helpers::fields(text)[..] {
        [exchange] => (DEFAULT_MX_PRIORITY, exchange),
        [priority, exchange] => (helpers::parse_u16("MX priority", priority)?, exchange),
        ref other => return Err(EncodeError::MxArity { found: other.len() }),
    };
    Ok(RecordData::Mx {
        priority,
        exchange: helpers::parse_name(exchange)?,
    })
}

/// Serializes MX data into the provided buffer.
pub fn serialize_mx(priority: u16, exchange: &Name, buf: &mut Vec<u8>) {
    buf.reserve(2 + exchange.wire_repr().len());
    buf.extend_from_slice(&priority.to_le_bytes());
    buf.extend_from_slice(exchange.wire_repr());
}

/// Decodes MX RDATA, which needs at least the two priority octets.
pub(super) fn decode_mx(octets: &[u8]) -> Option<RecordData> {
    let priority = helpers::read_u16_le(octets, 0)?;
    let (exchange, _) = Name::from_wire(octets, 2);
    Some(RecordData::Mx { priority, exchange })
}

////////////////////////////////////////////////////////////////////////
// RFC 1035 § 3.3.14 - TXT RDATA                                      //
////////////////////////////////////////////////////////////////////////

/// Accepts TXT data verbatim, as long as it fits in a single
/// character-string.
pub(super) fn parse_txt(text: &str) -> Result<RecordData, EncodeError> {
    check_txt_len(text)?;
    Ok(RecordData::Txt(text.to_owned()))
}

/// Checks that `text` fits in a single character-string.
pub(super) fn check_txt_len(text: &str) -> Result<(), EncodeError> {
    if text.len() > MAX_TXT_LEN {
        Err(EncodeError::TxtTooLong { len: text.len() })
    } else {
        Ok(())
    }
}

/// Serializes TXT data into the provided buffer. The caller must have
/// checked the length with [`check_txt_len`].
pub fn serialize_txt(text: &str, buf: &mut Vec<u8>) {
    buf.push(text.len() as u8);
    buf.extend_from_slice(text.as_bytes());
}

/// Decodes TXT RDATA. The length octet is honored only as far as data
/// is present, and invalid UTF-8 is replaced rather than rejected.
pub(super) fn decode_txt(octets: &[u8]) -> Option<RecordData> {
    let (&len, rest) = octets.split_first()?;
    let text = &rest[..rest.len().min(len as usize)];
    Some(RecordData::Txt(String::from_utf8_lossy(text).into_owned()))
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
