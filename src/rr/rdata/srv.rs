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

//! Handling of the [RFC 2782] RR type, SRV.
//!
//! As with MX, the directory format stores the three integer fields
//! little-endian, unlike [RFC 2782].
//!
//! [RFC 2782]: https://datatracker.ietf.org/doc/html/rfc2782

use super::helpers;
use super::RecordData;
use crate::name::Name;
use crate::rr::EncodeError;

////////////////////////////////////////////////////////////////////////
// RFC 2782 - SRV RR                                                  //
////////////////////////////////////////////////////////////////////////

/// Parses SRV data. All four fields are required; unlike MX, there is
/// no default priority, since an SRV record is meaningless without each
/// of them.
pub(super) fn parse_srv(text: &str) -> Result<RecordData, EncodeError> {
    match helpers::fields(text)[..] {
        [priority, weight, port, target] => Ok(RecordData::Srv {
            priority: helpers::parse_u16("SRV priority", priority)?,
            weight: helpers::parse_u16("SRV weight", weight)?,
            port: helpers::parse_u16("SRV port", port)?,
            target: helpers::parse_name(target)?,
        }),
        ref other => Err(EncodeError::SrvArity { found: other.len() }),
    }
}

/// Serializes an SRV record into the provided buffer.
pub fn serialize_srv(priority: u16, weight: u16, port: u16, target: &Name, buf: &mut Vec<u8>) {
    buf.reserve(6 + target.wire_repr().len());
    buf.extend_from_slice(&priority.to_le_bytes());
    buf.extend_from_slice(&weight.to_le_bytes());
    buf.extend_from_slice(&port.to_le_bytes());
    buf.extend_from_slice(target.wire_repr());
}

/// Decodes SRV RDATA, which needs at least the six octets of integer
/// fields.
pub(super) fn decode_srv(octets: &[u8]) -> Option<RecordData> {
    let priority = helpers::read_u16_le(octets, 0)?;
    let weight = helpers::read_u16_le(octets, 2)?;
    let port = helpers::read_u16_le(octets, 4)?;
    let (target, _) = Name::from_wire(octets, 6);
    Some(RecordData::Srv {
        priority,
        weight,
        port,
        target,
    })
}
