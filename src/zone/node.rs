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

//! Summaries of zone and record objects returned to callers.

use std::fmt;

use log::warn;

use super::Partition;
use crate::directory::{Dn, Entry};
use crate::envelope::{self, Envelope};
use crate::rr::ResourceRecord;
use crate::util::to_hex;

/// The attribute holding a node's records.
pub const DNS_RECORD: &str = "dnsRecord";

/// A zone found by [`ZoneService::list_zones`](super::ZoneService::list_zones).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ZoneSummary {
    pub dn: Dn,
    pub name: String,
    pub partition: Partition,
    pub when_created: Option<String>,
}

impl ZoneSummary {
    pub(super) fn from_entry(entry: &Entry, partition: Partition) -> Self {
        Self {
            dn: entry.dn.clone(),
            name: object_name(entry),
            partition,
            when_created: entry.first_str("whenCreated").map(str::to_owned),
        }
    }
}

/// A record-bearing (`dnsNode`) object and every record stored on it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordNode {
    pub dn: Dn,
    pub name: String,
    pub when_created: Option<String>,
    pub values: Vec<StoredRecord>,
}

impl RecordNode {
    pub(super) fn from_entry(entry: &Entry) -> Self {
        let values: Vec<StoredRecord> = entry
            .values(DNS_RECORD)
            .iter()
            .map(|value| StoredRecord::from_value(value))
            .collect();
        for value in &values {
            if let StoredRecord::Unparseable(raw) = value {
                warn!(
                    "{} holds a {}-octet {} value too short to decode",
                    entry.dn,
                    raw.len(),
                    DNS_RECORD
                );
            }
        }
        Self {
            dn: entry.dn.clone(),
            name: object_name(entry),
            when_created: entry.first_str("whenCreated").map(str::to_owned),
            values,
        }
    }

    /// Iterates over the records that could be decoded.
    pub fn records(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.values.iter().filter_map(StoredRecord::record)
    }
}

/// One value of a node's `dnsRecord` attribute.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoredRecord {
    /// The value had a complete header. (Its data may still be
    /// [malformed](crate::rr::RecordData::Malformed).)
    Decoded(Envelope),

    /// The value was shorter than the header and is kept raw.
    Unparseable(Vec<u8>),
}

impl StoredRecord {
    pub fn from_value(value: &[u8]) -> Self {
        match envelope::decode(value) {
            Some(decoded) => Self::Decoded(decoded),
            None => Self::Unparseable(value.to_vec()),
        }
    }

    pub fn record(&self) -> Option<&ResourceRecord> {
        match self {
            Self::Decoded(envelope) => Some(&envelope.record),
            Self::Unparseable(_) => None,
        }
    }
}

impl fmt::Display for StoredRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Decoded(envelope) => write!(f, "{}", envelope.record),
            Self::Unparseable(raw) => write!(f, "unparseable {}", to_hex(raw)),
        }
    }
}

/// Returns an object's name: its `dc`, else its `name`, else the value
/// of its RDN.
fn object_name(entry: &Entry) -> String {
    entry
        .first_str("dc")
        .or_else(|| entry.first_str("name"))
        .or_else(|| entry.dn.rdn().and_then(|rdn| rdn.split_once('=')).map(|(_, v)| v))
        .unwrap_or_default()
        .to_owned()
}
