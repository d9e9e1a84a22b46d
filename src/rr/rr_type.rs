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

//! Provides the [`RecordType`] enumeration for DNS RR types.

use std::fmt;
use std::str::FromStr;

use crate::util::Caseless;

////////////////////////////////////////////////////////////////////////
// RR TYPES                                                           //
////////////////////////////////////////////////////////////////////////

/// Represents the RR type of a directory-stored DNS record.
///
/// The types that can be created and edited form a closed set; adding
/// one means adding a variant here, and the compiler will then point
/// out every codec `match` that needs to handle it. Stored records may
/// carry any 16-bit type code, though, so codes outside the set decode
/// to [`RecordType::Unrecognized`] rather than being rejected.
///
/// Use [`RecordType::from_code`] to convert wire values. It never
/// produces `Unrecognized` for a code that has a dedicated variant.
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Ptr,
    Srv,
    Txt,
    Unrecognized(u16),
}

impl RecordType {
    /// All record types that can be encoded, in the order they are
    /// usually presented to operators.
    pub const SUPPORTED: [RecordType; 7] = [
        Self::A,
        Self::Aaaa,
        Self::Cname,
        Self::Mx,
        Self::Ptr,
        Self::Srv,
        Self::Txt,
    ];

    /// Returns the numeric type code used on the wire.
    pub fn code(self) -> u16 {
        match self {
            Self::A => 1,
            Self::Cname => 5,
            Self::Ptr => 12,
            Self::Mx => 15,
            Self::Txt => 16,
            Self::Aaaa => 28,
            Self::Srv => 33,
            Self::Unrecognized(code) => code,
        }
    }

    /// Maps a numeric type code from the wire to a `RecordType`.
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::A,
            5 => Self::Cname,
            12 => Self::Ptr,
            15 => Self::Mx,
            16 => Self::Txt,
            28 => Self::Aaaa,
            33 => Self::Srv,
            _ => Self::Unrecognized(code),
        }
    }

    /// Returns the type's mnemonic, or [`None`] for an unrecognized
    /// code.
    pub fn mnemonic(self) -> Option<&'static str> {
        match self {
            Self::A => Some("A"),
            Self::Aaaa => Some("AAAA"),
            Self::Cname => Some("CNAME"),
            Self::Mx => Some("MX"),
            Self::Ptr => Some("PTR"),
            Self::Srv => Some("SRV"),
            Self::Txt => Some("TXT"),
            Self::Unrecognized(_) => None,
        }
    }

    /// Returns whether records of this type can be encoded.
    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<u16> for RecordType {
    fn from(code: u16) -> Self {
        Self::from_code(code)
    }
}

impl From<RecordType> for u16 {
    fn from(rr_type: RecordType) -> Self {
        rr_type.code()
    }
}

impl FromStr for RecordType {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let caseless = Caseless(text);
        if let Some(rr_type) = Self::SUPPORTED
            .into_iter()
            .find(|rr_type| rr_type.mnemonic().map_or(false, |m| Caseless(m) == caseless))
        {
            Ok(rr_type)
        } else if text
            .get(0..4)
            .map_or(false, |prefix| prefix.eq_ignore_ascii_case("TYPE"))
        {
            text[4..]
                .parse::<u16>()
                .map(Self::from_code)
                .or(Err("type value is not a valid unsigned 16-bit integer"))
        } else {
            Err("unknown type")
        }
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.mnemonic() {
            Some(mnemonic) => f.write_str(mnemonic),
            None => write!(f, "TYPE{}", self.code()), // RFC 3597 § 5
        }
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_iana_assignments() {
        let expected = [1, 28, 5, 15, 12, 33, 16];
        for (rr_type, code) in RecordType::SUPPORTED.iter().zip(expected) {
            assert_eq!(rr_type.code(), code);
            assert_eq!(RecordType::from_code(code), *rr_type);
        }
    }

    #[test]
    fn unknown_codes_are_unrecognized() {
        let soa = RecordType::from_code(6);
        assert_eq!(soa, RecordType::Unrecognized(6));
        assert!(!soa.is_supported());
        assert_eq!(soa.code(), 6);
    }

    #[test]
    fn type_displays_according_to_rfc3597() {
        assert_eq!(RecordType::from_code(0xff00).to_string(), "TYPE65280");
        assert_eq!(RecordType::Aaaa.to_string(), "AAAA");
    }

    #[test]
    fn type_parses_case_insensitively() {
        assert_eq!("mx".parse::<RecordType>(), Ok(RecordType::Mx));
        assert_eq!("Srv".parse::<RecordType>(), Ok(RecordType::Srv));
        assert_eq!("a".parse::<RecordType>(), Ok(RecordType::A));
        for rr_type in RecordType::SUPPORTED {
            let lower = rr_type.to_string().to_ascii_lowercase();
            assert_eq!(lower.parse::<RecordType>(), Ok(rr_type));
        }
        assert_eq!("TYPE1".parse::<RecordType>(), Ok(RecordType::A));
        assert_eq!(
            "TYPE65280".parse::<RecordType>(),
            Ok(RecordType::Unrecognized(65280))
        );
        assert!("SOA".parse::<RecordType>().is_err());
        assert!("TYPE70000".parse::<RecordType>().is_err());
    }
}
