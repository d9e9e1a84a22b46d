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

//! Handling of the [RFC 3596] RR type, AAAA.
//!
//! [RFC 3596]: https://datatracker.ietf.org/doc/html/rfc3596

use std::net::Ipv6Addr;

use super::RecordData;
use crate::rr::{EncodeError, RecordType};

////////////////////////////////////////////////////////////////////////
// RFC 3596 §§ 2.1 and 2.2 - IPV6 AAAA RR                             //
////////////////////////////////////////////////////////////////////////

/// Parses an IPv6 address in any of its textual forms.
pub(super) fn parse_aaaa(text: &str) -> Result<RecordData, EncodeError> {
    let text = text.trim();
    text.parse()
        .map(RecordData::Aaaa)
        .map_err(|_| EncodeError::InvalidAddress {
            rr_type: RecordType::Aaaa,
            text: text.to_owned(),
        })
}

/// Serializes an AAAA record into the provided buffer.
pub fn serialize_aaaa(address: Ipv6Addr, buf: &mut Vec<u8>) {
    buf.extend_from_slice(&address.octets());
}

/// Decodes AAAA RDATA. Octets past the first sixteen are ignored.
pub(super) fn decode_aaaa(octets: &[u8]) -> Option<RecordData> {
    let address: [u8; 16] = octets.get(0..16)?.try_into().ok()?;
    Some(RecordData::Aaaa(Ipv6Addr::from(address)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aaaa_decodes_to_canonical_text() {
        let mut buf = Vec::new();
        serialize_aaaa("2001:0db8:0000:0000:0000:0000:0000:0001".parse().unwrap(), &mut buf);
        assert_eq!(buf.len(), 16);
        assert_eq!(decode_aaaa(&buf).unwrap().to_string(), "2001:db8::1");
        assert_eq!(decode_aaaa(&buf[..15]), None);
    }

    #[test]
    fn aaaa_rejects_ipv4_literals() {
        assert!(matches!(
            parse_aaaa("192.0.2.1"),
            Err(EncodeError::InvalidAddress {
                rr_type: RecordType::Aaaa,
                ..
            })
        ));
    }
}
