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

//! Implementation of data structures related to domain names.

use std::fmt::{self, Write};
use std::str::FromStr;

mod error;
mod wire;
pub use error::Error;

/// The maximum length of the on-the-wire representation of a domain
/// name that we will encode.
const MAX_WIRE_LEN: usize = 255;

/// The maximum length of a label in a domain name (not including the
/// octet that provides the length).
const MAX_LABEL_LEN: usize = 63;

/// The character displayed in place of label octets that are not
/// ASCII.
pub const PLACEHOLDER: char = '\u{fffd}';

////////////////////////////////////////////////////////////////////////
// NAME STRUCTURE                                                     //
////////////////////////////////////////////////////////////////////////

/// A domain name as embedded in directory-stored record data.
///
/// A `Name` owns its on-the-wire representation: each label is a
/// length octet followed by the label's octets, and a null label ends
/// the name. Compression pointers are never used in this format.
///
/// `Name`s can be constructed in two ways:
///
/// * through the [`FromStr`] implementation, which is strict: labels
///   must be ASCII, non-empty (except for the implied root label), and
///   at most 63 octets, and the whole name must fit in 255 octets; and
/// * through [`Name::from_wire`], which is lenient, since it reads data
///   written by other software that may be damaged.
///
/// The [`Display`](fmt::Display) implementation produces the dotted
/// form without a trailing root dot. Octets that are not ASCII are
/// shown as [`PLACEHOLDER`], so damaged names can still be displayed.
///
/// Equality is bitwise on the wire representation, so it is
/// case-sensitive.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Name {
    wire: Vec<u8>,
}

impl Name {
    /// Returns the root name (a lone null label).
    pub fn root() -> Self {
        Self { wire: vec![0] }
    }

    /// Reads a name starting at `offset` in `octets`. Reading stops at
    /// the null label or at the end of the buffer. Returns the name and
    /// the offset just past the octets consumed, so that the caller can
    /// continue parsing whatever follows the name.
    ///
    /// This never fails and never reads out of bounds; the returned
    /// offset is at most `octets.len()`.
    pub fn from_wire(octets: &[u8], offset: usize) -> (Self, usize) {
        let (labels, next) = wire::read_labels(octets, offset);
        let mut repr = Vec::with_capacity(next.saturating_sub(offset) + 1);
        for (start, end) in labels {
            // Truncated labels are re-prefixed with their real length.
            // Lengths above 255 are impossible, since each came from a
            // single octet.
            repr.push((end - start) as u8);
            repr.extend_from_slice(&octets[start..end]);
        }
        repr.push(0);
        (Self { wire: repr }, next)
    }

    /// Returns the on-the-wire representation of the name.
    pub fn wire_repr(&self) -> &[u8] {
        &self.wire
    }

    /// Returns whether this is the root name.
    pub fn is_root(&self) -> bool {
        self.wire.len() == 1
    }

    /// Returns an iterator over the name's non-null labels.
    pub fn labels(&self) -> Labels {
        Labels {
            wire: &self.wire,
            offset: 0,
        }
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        wire::encode_dotted(text).map(|wire| Self {
            wire: wire.to_vec(),
        })
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, label) in self.labels().enumerate() {
            if i > 0 {
                f.write_char('.')?;
            }
            for &octet in label {
                if octet.is_ascii() {
                    f.write_char(char::from(octet))?;
                } else {
                    f.write_char(PLACEHOLDER)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"{}\"", self)
    }
}

/// An iterator over the labels of a [`Name`], excluding the null
/// label. See [`Name::labels`].
pub struct Labels<'a> {
    wire: &'a [u8],
    offset: usize,
}

impl<'a> Iterator for Labels<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let len = *self.wire.get(self.offset)? as usize;
        if len == 0 {
            return None;
        }
        let start = self.offset + 1;
        self.offset = start + len;
        self.wire.get(start..start + len)
    }
}

////////////////////////////////////////////////////////////////////////
// FREE-FUNCTION FORMS                                                //
////////////////////////////////////////////////////////////////////////

/// Encodes the dotted name `text` into its on-the-wire representation.
/// See [`Name`]'s [`FromStr`] implementation for the rules.
pub fn encode_name(text: &str) -> Result<Vec<u8>, Error> {
    text.parse::<Name>().map(|name| name.wire)
}

/// Decodes a name starting at `offset` in `octets` into its dotted form.
/// Returns the dotted form and the offset just past the name. See
/// [`Name::from_wire`].
pub fn decode_name(octets: &[u8], offset: usize) -> (String, usize) {
    let (name, next) = Name::from_wire(octets, offset);
    (name.to_string(), next)
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
