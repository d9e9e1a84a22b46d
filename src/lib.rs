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

//! Management of DNS records in Active Directory-integrated zones.
//!
//! Active Directory stores each DNS record as one binary value of the
//! `dnsRecord` attribute of a `dnsNode` object. This crate provides:
//!
//! * the codecs for that binary form, layered as [`name`] (domain
//!   names), [`rr`] (record types and type-specific data), and
//!   [`envelope`] (the fixed header wrapping each record);
//! * the [`directory`] abstraction over the five directory operations
//!   needed to manage records, with a connection [`Pool`](directory::Pool)
//!   and an in-memory implementation; and
//! * the [`zone`] module's [`ZoneService`](zone::ZoneService), which
//!   lists zones and creates, reads, updates, and deletes records.

pub mod directory;
pub mod envelope;
pub mod name;
pub mod rr;
pub mod util;
pub mod zone;
