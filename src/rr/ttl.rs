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

//! Provides the [`Ttl`] structure for DNS RR TTLs.

use std::fmt;

use super::EncodeError;

////////////////////////////////////////////////////////////////////////
// TTLS                                                               //
////////////////////////////////////////////////////////////////////////

/// The time to live (TTL) of a record that is about to be written.
///
/// [RFC 2181 § 8] clarified that TTL values are unsigned integers
/// between 0 and 2³¹ - 1, inclusive. A `Ttl` can only be constructed
/// (through [`TryFrom<u32>`]) for values in that range; anything larger
/// fails with [`EncodeError::TtlOutOfRange`] before the record is
/// encoded.
///
/// TTLs read back from the directory are *not* passed through this
/// type. They are reported as the raw `u32` found on the wire, since
/// other tools may have written values we would refuse.
///
/// [RFC 2181 § 8]: https://datatracker.ietf.org/doc/html/rfc2181#section-8
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Ttl(u32);

impl Ttl {
    /// The TTL used when the caller does not provide one (one hour).
    pub const DEFAULT: Ttl = Ttl(3600);

    /// The largest TTL that may be written.
    pub const MAX: Ttl = Ttl(i32::MAX as u32);
}

impl Default for Ttl {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for Ttl {
    type Error = EncodeError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        if raw > Self::MAX.0 {
            Err(EncodeError::TtlOutOfRange(raw))
        } else {
            Ok(Self(raw))
        }
    }
}

impl From<Ttl> for u32 {
    fn from(ttl: Ttl) -> Self {
        ttl.0
    }
}

impl fmt::Debug for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttls_in_range_are_not_modified() {
        let i32_max = i32::MAX as u32;
        assert_eq!(u32::from(Ttl::try_from(0).unwrap()), 0);
        assert_eq!(u32::from(Ttl::try_from(300).unwrap()), 300);
        assert_eq!(u32::from(Ttl::try_from(i32_max).unwrap()), i32_max);
    }

    #[test]
    fn large_ttls_are_rejected() {
        let too_large = i32::MAX as u32 + 1;
        assert_eq!(
            Ttl::try_from(too_large),
            Err(EncodeError::TtlOutOfRange(too_large))
        );
    }

    #[test]
    fn default_ttl_is_one_hour() {
        assert_eq!(u32::from(Ttl::default()), 3600);
    }
}
