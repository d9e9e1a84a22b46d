// Copyright 2021 Matthew Ingwersen.
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

//! Implementation of encoding and lenient parsing of on-the-wire
//! names.

use arrayvec::ArrayVec;

use super::{Error, MAX_LABEL_LEN, MAX_WIRE_LEN};

////////////////////////////////////////////////////////////////////////
// ENCODING OF DOTTED NAMES                                           //
////////////////////////////////////////////////////////////////////////

/// Serializes the dotted name `text` into its length-prefixed wire
/// form. This is the implementation of [`Name`](super::Name)'s
/// [`FromStr`](std::str::FromStr) implementation.
///
/// Trailing root dots are stripped first. What remains is split on `.`
/// and each label is emitted as a length octet followed by the label's
/// octets, with a single null label closing the name. An empty string
/// (or just `.`) is the root name, which is only the null label.
pub fn encode_dotted(text: &str) -> Result<ArrayVec<u8, MAX_WIRE_LEN>, Error> {
    let mut wire = ArrayVec::new();
    let relative = text.trim_end_matches('.');
    if !relative.is_empty() {
        for label in relative.split('.') {
            if !label.is_ascii() {
                return Err(Error::NonAsciiLabel);
            } else if label.is_empty() {
                return Err(Error::EmptyLabel);
            } else if label.len() > MAX_LABEL_LEN {
                return Err(Error::LabelTooLong);
            }
            wire.try_push(label.len() as u8)
                .or(Err(Error::NameTooLong))?;
            wire.try_extend_from_slice(label.as_bytes())
                .or(Err(Error::NameTooLong))?;
        }
    }
    wire.try_push(0).or(Err(Error::NameTooLong))?;
    Ok(wire)
}

////////////////////////////////////////////////////////////////////////
// LENIENT PARSING OF ON-THE-WIRE NAMES                               //
////////////////////////////////////////////////////////////////////////

/// Reads a name starting at `start` in `octets`, stopping at the null
/// label or the end of the buffer, whichever comes first. A label whose
/// length octet runs past the end of the buffer is truncated to the
/// octets that are actually present.
///
/// Returns the name's labels, as ranges into `octets`, and the offset
/// just past the last octet consumed. The offset never exceeds
/// `octets.len()`. This never fails: stored names are displayed as best
/// we can, not validated.
pub fn read_labels(octets: &[u8], start: usize) -> (Vec<(usize, usize)>, usize) {
    let mut labels = Vec::new();
    let mut offset = start.min(octets.len());
    while offset < octets.len() {
        let label_len = octets[offset] as usize;
        offset += 1;
        if label_len == 0 {
            break;
        }
        let end = (offset + label_len).min(octets.len());
        labels.push((offset, end));
        offset = end;
    }
    (labels, offset)
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
