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

//! Encoding and decoding of the binary `dnsRecord` attribute value.
//!
//! Each value of a `dnsRecord` attribute is one record: a fixed 24-octet
//! header followed by the RDATA. The header layout is:
//!
//! ```text
//! offset  0-1   u16 LE  RDATA length
//! offset  2-3   u16 LE  record type
//! offset  4     u8      version (5)
//! offset  5     u8      rank (240, zone data)
//! offset  6-7   u16 LE  flags (0)
//! offset  8-11  u32 LE  serial (1)
//! offset 12-15  u32 BE  TTL in seconds
//! offset 16-19  u32 LE  reserved (0)
//! offset 20-23  u32 LE  timestamp (0, a static record)
//! offset 24-    RDATA
//! ```
//!
//! Note the TTL: it is the only big-endian field. Existing zones depend
//! on this layout octet for octet.

use std::fmt;

use crate::rr::{EncodeError, RecordData, RecordType, ResourceRecord};

/// The length of the fixed header.
pub const HEADER_LEN: usize = 24;

/// The record format version written in every header.
pub const VERSION: u8 = 5;

/// The rank of records that belong to the zone's own data.
pub const RANK_ZONE: u8 = 240;

/// The flags written in every header.
pub const FLAGS: u16 = 0;

/// The serial written in every header.
pub const SERIAL: u32 = 1;

/// The timestamp of a static (non-aging) record.
pub const TIMESTAMP_STATIC: u32 = 0;

////////////////////////////////////////////////////////////////////////
// HEADER                                                             //
////////////////////////////////////////////////////////////////////////

/// The fixed header of a stored record, with every field as found on
/// the wire.
///
/// Headers we write always carry the constants above; headers written
/// by other software may not, so decoding reports what it finds rather
/// than insisting on them.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Header {
    pub data_len: u16,
    pub type_code: u16,
    pub version: u8,
    pub rank: u8,
    pub flags: u16,
    pub serial: u32,
    pub ttl: u32,
    pub reserved: u32,
    pub timestamp: u32,
}

impl Header {
    /// Builds the header we write for a record of type `rr_type` with
    /// `data_len` octets of RDATA.
    pub fn new(rr_type: RecordType, ttl: u32, data_len: u16) -> Self {
        Self {
            data_len,
            type_code: rr_type.code(),
            version: VERSION,
            rank: RANK_ZONE,
            flags: FLAGS,
            serial: SERIAL,
            ttl,
            reserved: 0,
            timestamp: TIMESTAMP_STATIC,
        }
    }

    /// Reads a header from the start of `octets`, which must be at
    /// least [`HEADER_LEN`] octets long.
    fn read(octets: &[u8]) -> Option<Self> {
        let header: &[u8; HEADER_LEN] = octets.get(..HEADER_LEN)?.try_into().ok()?;
        let u16_le = |i: usize| u16::from_le_bytes([header[i], header[i + 1]]);
        let u32_le = |i: usize| {
            u32::from_le_bytes([header[i], header[i + 1], header[i + 2], header[i + 3]])
        };
        Some(Self {
            data_len: u16_le(0),
            type_code: u16_le(2),
            version: header[4],
            rank: header[5],
            flags: u16_le(6),
            serial: u32_le(8),
            ttl: u32::from_be_bytes([header[12], header[13], header[14], header[15]]),
            reserved: u32_le(16),
            timestamp: u32_le(20),
        })
    }

    /// Serializes the header into the provided buffer.
    fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.data_len.to_le_bytes());
        buf.extend_from_slice(&self.type_code.to_le_bytes());
        buf.push(self.version);
        buf.push(self.rank);
        buf.extend_from_slice(&self.flags.to_le_bytes());
        buf.extend_from_slice(&self.serial.to_le_bytes());
        buf.extend_from_slice(&self.ttl.to_be_bytes());
        buf.extend_from_slice(&self.reserved.to_le_bytes());
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
    }

    /// Returns whether the header carries the constants that we write
    /// (version, rank, flags, serial, and a static timestamp).
    pub fn is_standard(&self) -> bool {
        self.version == VERSION
            && self.rank == RANK_ZONE
            && self.flags == FLAGS
            && self.serial == SERIAL
            && self.timestamp == TIMESTAMP_STATIC
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "length={} type={} version={} rank={} flags={:#06x} serial={} ttl={} \
             reserved={} timestamp={}",
            self.data_len,
            self.type_code,
            self.version,
            self.rank,
            self.flags,
            self.serial,
            self.ttl,
            self.reserved,
            self.timestamp,
        )
    }
}

////////////////////////////////////////////////////////////////////////
// ENVELOPE                                                           //
////////////////////////////////////////////////////////////////////////

/// A decoded `dnsRecord` value: the raw header plus the record it
/// carries.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Envelope {
    pub header: Header,
    pub record: ResourceRecord,
}

/// Encodes `record` into a complete `dnsRecord` attribute value.
///
/// Fails with [`EncodeError::TypeMismatch`] if `record.rr_type` is not
/// the type of `record.data`. Raw (unrecognized or malformed) data is
/// written back unchanged.
pub fn encode(record: &ResourceRecord) -> Result<Vec<u8>, EncodeError> {
    let data_type = record.data.rr_type();
    if record.rr_type != data_type {
        return Err(EncodeError::TypeMismatch {
            rr_type: record.rr_type,
            data_type,
        });
    }
    let mut rdata = Vec::new();
    record.data.write(&mut rdata)?;
    let data_len =
        u16::try_from(rdata.len()).or(Err(EncodeError::RdataTooLong(rdata.len())))?;

    let mut value = Vec::with_capacity(HEADER_LEN + rdata.len());
    Header::new(record.rr_type, record.ttl, data_len).write(&mut value);
    value.extend_from_slice(&rdata);
    Ok(value)
}

/// Decodes a `dnsRecord` attribute value.
///
/// Returns [`None`] if `value` is shorter than the header; callers
/// should then display the raw value. Otherwise the RDATA is taken to be
/// every octet after the header (the header's length field is reported
/// but not trusted) and decoded per [`RecordData::decode`], so this
/// never fails on damaged data.
pub fn decode(value: &[u8]) -> Option<Envelope> {
    let header = Header::read(value)?;
    let rr_type = RecordType::from_code(header.type_code);
    let data = RecordData::decode(rr_type, &value[HEADER_LEN..]);
    Some(Envelope {
        header,
        record: ResourceRecord {
            rr_type,
            ttl: header.ttl,
            data,
        },
    })
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
