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

//! Provides the [`ResourceRecord`] structure.

use std::fmt;

use super::{EncodeError, RecordData, RecordType, Ttl};

/// A single DNS record as stored on a directory node: its type, TTL,
/// and type-specific data. (The owner name is the node's name, so it
/// is not part of the record itself.)
///
/// Records are never modified in place; an update produces a new
/// `ResourceRecord` that replaces the stored value.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ResourceRecord {
    pub rr_type: RecordType,
    pub ttl: u32,
    pub data: RecordData,
}

impl ResourceRecord {
    /// Builds a record from caller input: the record type, the textual
    /// data (see [`RecordData::parse`]), and the TTL in seconds.
    pub fn new(rr_type: RecordType, data: &str, ttl: u32) -> Result<Self, EncodeError> {
        let ttl = Ttl::try_from(ttl)?;
        Ok(Self {
            rr_type,
            ttl: ttl.into(),
            data: RecordData::parse(rr_type, data)?,
        })
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.ttl, self.rr_type, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_validates_ttl_before_data() {
        assert_eq!(
            ResourceRecord::new(RecordType::A, "not an address", u32::MAX),
            Err(EncodeError::TtlOutOfRange(u32::MAX))
        );
    }

    #[test]
    fn record_displays_like_a_zone_file_line() {
        let record = ResourceRecord::new(RecordType::Mx, "mail.example.com", 300).unwrap();
        assert_eq!(record.to_string(), "300 MX 10 mail.example.com");
    }
}
