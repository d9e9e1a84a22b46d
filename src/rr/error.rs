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

//! Implementation of the [`EncodeError`] type.

use std::fmt;

use super::RecordType;
use crate::name;

/// An error signaling that caller-supplied record input could not be
/// encoded.
///
/// These errors are always raised before anything is written to the
/// directory. Decoding never produces them; damaged stored data is
/// represented by [`RecordData::Malformed`](super::RecordData::Malformed)
/// instead.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EncodeError {
    /// The text is not a valid address literal for the record type.
    InvalidAddress { rr_type: RecordType, text: String },

    /// An embedded domain name could not be encoded.
    InvalidName(name::Error),

    /// An integer field was not a valid unsigned 16-bit integer.
    InvalidInteger { field: &'static str, text: String },

    /// MX data was neither `hostname` nor `priority hostname`.
    MxArity { found: usize },

    /// SRV data was not exactly `priority weight port target`.
    SrvArity { found: usize },

    /// TXT data was longer than 255 octets when encoded as UTF-8.
    TxtTooLong { len: usize },

    /// The record type cannot be encoded.
    UnsupportedType(RecordType),

    /// A record's type does not match the type of its data.
    TypeMismatch {
        rr_type: RecordType,
        data_type: RecordType,
    },

    /// The TTL is larger than 2³¹ - 1.
    TtlOutOfRange(u32),

    /// The encoded RDATA would be longer than 65,535 octets.
    RdataTooLong(usize),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidAddress { rr_type, text } => {
                write!(f, "invalid {} record address: {:?}", rr_type, text)
            }
            Self::InvalidName(err) => write!(f, "invalid domain name: {}", err),
            Self::InvalidInteger { field, text } => {
                write!(f, "invalid {}: {:?} is not an integer from 0 to 65535", field, text)
            }
            Self::MxArity { found } => write!(
                f,
                "MX data must be \"priority hostname\" or \"hostname\" (found {} fields)",
                found
            ),
            Self::SrvArity { found } => write!(
                f,
                "SRV data must be \"priority weight port target\" (found {} fields)",
                found
            ),
            Self::TxtTooLong { len } => {
                write!(f, "TXT data is {} octets long; the limit is 255", len)
            }
            Self::UnsupportedType(rr_type) => write!(f, "unsupported record type: {}", rr_type),
            Self::TypeMismatch { rr_type, data_type } => {
                write!(f, "{} record carries {} data", rr_type, data_type)
            }
            Self::TtlOutOfRange(ttl) => {
                write!(f, "TTL {} is out of range (0 to {})", ttl, i32::MAX)
            }
            Self::RdataTooLong(len) => {
                write!(f, "RDATA is {} octets long; the limit is 65535", len)
            }
        }
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidName(err) => Some(err),
            _ => None,
        }
    }
}

impl From<name::Error> for EncodeError {
    fn from(err: name::Error) -> Self {
        Self::InvalidName(err)
    }
}
