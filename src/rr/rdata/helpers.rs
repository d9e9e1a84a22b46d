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

//! Helpers shared by the RR type-specific parsing and decoding
//! routines.

use crate::name::Name;
use crate::rr::EncodeError;

////////////////////////////////////////////////////////////////////////
// HELPERS FOR TEXT PARSING                                           //
////////////////////////////////////////////////////////////////////////

/// Splits record data text into whitespace-separated fields.
pub fn fields(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Parses a 16-bit integer field, naming the field in the error.
pub fn parse_u16(field: &'static str, text: &str) -> Result<u16, EncodeError> {
    text.parse().map_err(|_| EncodeError::InvalidInteger {
        field,
        text: text.to_owned(),
    })
}

/// Parses an embedded domain name.
pub fn parse_name(text: &str) -> Result<Name, EncodeError> {
    text.parse().map_err(Into::into)
}

////////////////////////////////////////////////////////////////////////
// HELPERS FOR DECODING                                               //
////////////////////////////////////////////////////////////////////////

/// Reads a little-endian `u16` at `offset`, if there are enough octets.
pub fn read_u16_le(octets: &[u8], offset: usize) -> Option<u16> {
    let field = octets.get(offset..offset + 2)?;
    Some(u16::from_le_bytes([field[0], field[1]]))
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
