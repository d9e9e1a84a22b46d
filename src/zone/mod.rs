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

//! Management of directory-integrated zones and their records.
//!
//! The [`ZoneService`] lists zones and performs record CRUD against a
//! [`Directory`]. Zones live in the `MicrosoftDNS` container of one of
//! two application [`Partition`]s. Within a zone, every owner name is a
//! `dnsNode` object named `DC=<name>,<zone DN>`, and each value of its
//! `dnsRecord` attribute is one record in the binary form handled by
//! the [`envelope`](crate::envelope) module.
//!
//! Each mutating operation validates and encodes its input first, then
//! issues exactly one directory call. Nothing protects against two
//! clients updating the same node at once: the last replace wins.

use log::{debug, error, warn};

use crate::directory::{AttributeMap, Directory, Dn, ErrorKind, Filter, Modification};
use crate::envelope;
use crate::name::Name;
use crate::rr::{RecordType, ResourceRecord};

mod error;
mod node;
mod partition;

pub use error::{Error, Operation};
pub use node::{RecordNode, StoredRecord, ZoneSummary, DNS_RECORD};
pub use partition::Partition;

/// The record name that denotes the zone apex.
pub const APEX: &str = "@";

/// Attributes requested when listing zones.
pub const ZONE_ATTRIBUTES: [&str; 4] = ["dc", "name", "distinguishedName", "whenCreated"];

/// Attributes requested when reading record nodes.
pub const NODE_ATTRIBUTES: [&str; 5] =
    ["dc", "name", DNS_RECORD, "distinguishedName", "whenCreated"];

/// Object classes of a newly created record node.
pub const NODE_OBJECT_CLASSES: [&str; 2] = ["top", "dnsNode"];

////////////////////////////////////////////////////////////////////////
// ZONE SERVICE                                                       //
////////////////////////////////////////////////////////////////////////

/// Zone and record operations against a directory.
///
/// The directory handle is injected at construction; usually it is a
/// [`Pool`](crate::directory::Pool) (or an [`Arc`](std::sync::Arc) of
/// one shared with other services). The service itself holds no
/// mutable state.
pub struct ZoneService<D> {
    directory: D,
    base_dn: Dn,
}

impl<D: Directory> ZoneService<D> {
    /// Creates a service for the domain whose naming context is
    /// `base_dn` (e.g. `DC=example,DC=com`).
    pub fn new(directory: D, base_dn: Dn) -> Self {
        Self { directory, base_dn }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn base_dn(&self) -> &Dn {
        &self.base_dn
    }

    /// Returns the DN of the zone named `zone` in `partition`.
    pub fn zone_dn(&self, partition: Partition, zone: &str) -> Dn {
        zone_dn(&self.base_dn, partition, zone)
    }

    /// Lists the zones of both partitions, domain partition first.
    ///
    /// A partition that cannot be searched (because it does not exist,
    /// or its server is unreachable) contributes no zones; the failure
    /// is logged rather than returned.
    pub fn list_zones(&self) -> Vec<ZoneSummary> {
        let filter = Filter::object_class("dnsZone");
        let mut zones = Vec::new();
        for partition in Partition::ALL {
            let container = partition.container(&self.base_dn);
            match self.directory.search(&container, &filter, &ZONE_ATTRIBUTES) {
                Ok(entries) => {
                    debug!("Found {} zone(s) in {} matching {}", entries.len(), container, filter);
                    zones.extend(
                        entries
                            .iter()
                            .map(|entry| ZoneSummary::from_entry(entry, partition)),
                    );
                }
                Err(e) => warn!("Skipping {} partition ({}): {}", partition, container, e),
            }
        }
        zones
    }

    /// Lists the record-bearing nodes of the zone `zone`, decoding every
    /// value of every node. Nodes without a `dnsRecord` value are
    /// skipped.
    pub fn list_records(&self, zone: &Dn) -> Result<Vec<RecordNode>, Error> {
        let filter = record_node_filter();
        let entries = self
            .directory
            .search(zone, &filter, &NODE_ATTRIBUTES)
            .map_err(|e| store_error(Operation::Search, zone, e))?;
        debug!("Found {} record node(s) in {} matching {}", entries.len(), zone, filter);
        Ok(entries.iter().map(RecordNode::from_entry).collect())
    }

    /// Reads the record node at `dn`.
    pub fn get_record(&self, dn: &Dn) -> Result<RecordNode, Error> {
        match self.directory.get(dn, &NODE_ATTRIBUTES) {
            Ok(Some(entry)) => Ok(RecordNode::from_entry(&entry)),
            Ok(None) => Err(Error::RecordNotFound { dn: dn.clone() }),
            Err(e) if e.kind() == ErrorKind::NoSuchObject => {
                Err(Error::RecordNotFound { dn: dn.clone() })
            }
            Err(e) => Err(store_error(Operation::Get, dn, e)),
        }
    }

    /// Creates a node named `name` in the zone `zone` holding a single
    /// record, and returns the node's DN. Fails with
    /// [`Error::DuplicateRecord`] if the node already exists; existing
    /// nodes are never overwritten.
    pub fn create_record(
        &self,
        zone: &Dn,
        name: &str,
        rr_type: RecordType,
        data: &str,
        ttl: u32,
    ) -> Result<Dn, Error> {
        let dn = record_dn(zone, name)?;
        let value = encode_value(rr_type, data, ttl)?;
        debug!("Adding {} record at {}", rr_type, dn);
        let attributes = AttributeMap::new().with(DNS_RECORD, vec![value]);
        match self.directory.add(&dn, &NODE_OBJECT_CLASSES, attributes) {
            Ok(()) => Ok(dn),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(Error::DuplicateRecord { dn }),
            Err(e) => Err(store_error(Operation::Add, &dn, e)),
        }
    }

    /// Replaces every record on the node at `dn` with the single
    /// record described by the arguments.
    pub fn update_record(
        &self,
        dn: &Dn,
        rr_type: RecordType,
        data: &str,
        ttl: u32,
    ) -> Result<(), Error> {
        let value = encode_value(rr_type, data, ttl)?;
        debug!("Replacing records at {} with a {} record", dn, rr_type);
        let change = Modification::Replace(DNS_RECORD.to_owned(), vec![value]);
        self.directory
            .modify(dn, &[change])
            .map_err(|e| not_found_or_store_error(Operation::Modify, dn, e))
    }

    /// Deletes the node at `dn` along with all of its records.
    pub fn delete_record(&self, dn: &Dn) -> Result<(), Error> {
        debug!("Deleting {}", dn);
        self.directory
            .delete(dn)
            .map_err(|e| not_found_or_store_error(Operation::Delete, dn, e))
    }
}

////////////////////////////////////////////////////////////////////////
// HELPERS                                                            //
////////////////////////////////////////////////////////////////////////

/// Returns the DN of the zone named `zone` in `partition` under
/// `base_dn`.
pub fn zone_dn(base_dn: &Dn, partition: Partition, zone: &str) -> Dn {
    partition.container(base_dn).child("DC", zone)
}

/// Returns the DN of the node for `name` in the zone `zone`, after
/// checking that `name` is a usable relative name: non-empty, without
/// whitespace or a trailing dot, and valid as a domain name. [`APEX`]
/// is accepted as is.
pub fn record_dn(zone: &Dn, name: &str) -> Result<Dn, Error> {
    if name != APEX {
        if name.is_empty() || name.ends_with('.') || name.contains(char::is_whitespace) {
            return Err(Error::InvalidRecordName(name.to_owned()));
        }
        name.parse::<Name>()
            .map_err(|e| Error::Encode(e.into()))?;
    }
    Ok(zone.child("DC", name))
}

/// Encodes the `dnsRecord` value for a record from caller input.
pub fn encode_value(rr_type: RecordType, data: &str, ttl: u32) -> Result<Vec<u8>, Error> {
    let record = ResourceRecord::new(rr_type, data, ttl)?;
    Ok(envelope::encode(&record)?)
}

/// Returns the filter `(&(objectClass=dnsNode)(dnsRecord=*))`.
fn record_node_filter() -> Filter {
    Filter::And(vec![
        Filter::object_class("dnsNode"),
        Filter::Present(DNS_RECORD.to_owned()),
    ])
}

fn store_error(operation: Operation, dn: &Dn, source: crate::directory::Error) -> Error {
    error!("Directory {} failed for {}: {}", operation, dn, source);
    Error::Store {
        operation,
        dn: dn.clone(),
        source,
    }
}

fn not_found_or_store_error(
    operation: Operation,
    dn: &Dn,
    source: crate::directory::Error,
) -> Error {
    if source.kind() == ErrorKind::NoSuchObject {
        Error::RecordNotFound { dn: dn.clone() }
    } else {
        store_error(operation, dn, source)
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{Entry, MemoryDirectory, Pool, PoolConfig};
    use crate::name;
    use crate::rr::{EncodeError, RecordData};

    const BASE: &str = "DC=example,DC=com";

    fn container(partition: Partition, class: &str) -> Entry {
        Entry::new(
            partition.container(&Dn::from(BASE)),
            AttributeMap::new().with("objectClass", vec![class.as_bytes().to_vec()]),
        )
    }

    fn zone_entry(partition: Partition, name: &str) -> Entry {
        Entry::new(
            zone_dn(&Dn::from(BASE), partition, name),
            AttributeMap::new()
                .with("objectClass", vec![b"top".to_vec(), b"dnsZone".to_vec()])
                .with("dc", vec![name.as_bytes().to_vec()])
                .with("whenCreated", vec![b"20220101000000.0Z".to_vec()]),
        )
    }

    /// A service over a pooled in-memory directory with the zone
    /// `example.com` in the domain partition and `_msdcs.example.com`
    /// in the forest partition.
    fn service() -> ZoneService<Pool<MemoryDirectory>> {
        let directory = MemoryDirectory::new();
        for partition in Partition::ALL {
            directory.insert(container(partition, "container"));
        }
        directory.insert(zone_entry(Partition::Domain, "example.com"));
        directory.insert(zone_entry(Partition::Forest, "_msdcs.example.com"));
        ZoneService::new(
            Pool::new(directory, PoolConfig::default()),
            Dn::from(BASE),
        )
    }

    fn example_zone<D: Directory>(service: &ZoneService<D>) -> Dn {
        service.zone_dn(Partition::Domain, "example.com")
    }

    fn stored_values(service: &ZoneService<Pool<MemoryDirectory>>, dn: &Dn) -> Vec<Vec<u8>> {
        service
            .directory()
            .manager()
            .entry(dn)
            .unwrap()
            .values(DNS_RECORD)
            .to_vec()
    }

    #[test]
    fn create_stores_exact_envelope() {
        let service = service();
        let zone = example_zone(&service);
        let dn = service
            .create_record(&zone, "www", RecordType::A, "203.0.113.5", 300)
            .unwrap();
        assert_eq!(dn, zone.child("DC", "www"));
        assert_eq!(
            stored_values(&service, &dn),
            vec![vec![
                4, 0, 1, 0, 5, 240, 0, 0, 1, 0, 0, 0, 0, 0, 1, 44, 0, 0, 0, 0, 0, 0, 0, 0, 203, 0,
                113, 5,
            ]]
        );
        let entry = service.directory().manager().entry(&dn).unwrap();
        assert_eq!(
            entry.values("objectClass"),
            &[b"top".to_vec(), b"dnsNode".to_vec()]
        );
    }

    #[test]
    fn created_records_read_back() {
        let service = service();
        let zone = example_zone(&service);
        let dn = service
            .create_record(&zone, "_ldap._tcp", RecordType::Srv, "0 100 389 dc1.example.com", 600)
            .unwrap();
        let node = service.get_record(&dn).unwrap();
        assert_eq!(node.name, "_ldap._tcp");
        let records: Vec<_> = node.records().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].to_string(), "600 SRV 0 100 389 dc1.example.com");
    }

    #[test]
    fn duplicate_create_is_reported_and_leaves_node_alone() {
        let service = service();
        let zone = example_zone(&service);
        let dn = service
            .create_record(&zone, "mail", RecordType::Mx, "mail.example.com", 3600)
            .unwrap();
        let before = stored_values(&service, &dn);
        assert_eq!(
            service.create_record(&zone, "MAIL", RecordType::A, "192.0.2.1", 60),
            Err(Error::DuplicateRecord {
                dn: zone.child("DC", "MAIL")
            })
        );
        assert_eq!(stored_values(&service, &dn), before);
    }

    #[test]
    fn invalid_input_never_reaches_the_directory() {
        let service = service();
        let zone = example_zone(&service);
        let long_txt = "x".repeat(256);
        let cases = [
            ("www", RecordType::A, "203.0.113", 300),
            ("srv", RecordType::Srv, "10 20 25", 300),
            ("txt", RecordType::Txt, long_txt.as_str(), 300),
            ("ttl", RecordType::A, "192.0.2.1", u32::MAX),
            ("bad..name", RecordType::A, "192.0.2.1", 300),
            ("", RecordType::A, "192.0.2.1", 300),
            ("www.example.com.", RecordType::A, "192.0.2.1", 300),
        ];
        for (name, rr_type, data, ttl) in cases {
            assert!(service.create_record(&zone, name, rr_type, data, ttl).is_err());
        }
        let node = zone.child("DC", "www");
        assert!(service.update_record(&node, RecordType::A, "nope", 300).is_err());
        assert_eq!(service.directory().manager().connections_opened(), 0);
    }

    #[test]
    fn record_names_are_validated() {
        let zone = Dn::from("DC=example.com");
        assert_eq!(record_dn(&zone, "@").unwrap().as_str(), "DC=@,DC=example.com");
        assert_eq!(
            record_dn(&zone, "a..b"),
            Err(Error::Encode(EncodeError::InvalidName(name::Error::EmptyLabel)))
        );
        assert_eq!(
            record_dn(&zone, " "),
            Err(Error::InvalidRecordName(" ".to_owned()))
        );
        assert!(record_dn(&zone, "_kerberos._udp").is_ok());
    }

    #[test]
    fn list_records_decodes_every_value() {
        let service = service();
        let zone = example_zone(&service);
        let dn = service
            .create_record(&zone, "www", RecordType::A, "192.0.2.1", 60)
            .unwrap();
        let second = encode_value(RecordType::Aaaa, "2001:db8::1", 60).unwrap();
        let mut truncated = encode_value(RecordType::A, "192.0.2.2", 60).unwrap();
        truncated.truncate(26);
        service
            .directory()
            .modify(
                &dn,
                &[Modification::Add(
                    DNS_RECORD.to_owned(),
                    vec![second, truncated, vec![0xde, 0xad]],
                )],
            )
            .unwrap();

        let nodes = service.list_records(&zone).unwrap();
        assert_eq!(nodes.len(), 1);
        let values = &nodes[0].values;
        assert_eq!(values.len(), 4);
        assert_eq!(values[0].to_string(), "60 A 192.0.2.1");
        assert_eq!(values[1].to_string(), "60 AAAA 2001:db8::1");
        assert!(matches!(
            values[2].record().map(|r| &r.data),
            Some(RecordData::Malformed { .. })
        ));
        assert_eq!(values[3], StoredRecord::Unparseable(vec![0xde, 0xad]));
    }

    #[test]
    fn list_records_skips_nodes_without_records() {
        let service = service();
        let zone = example_zone(&service);
        service
            .create_record(&zone, "www", RecordType::A, "192.0.2.1", 60)
            .unwrap();
        service.directory().manager().insert(Entry::new(
            zone.child("DC", "empty"),
            AttributeMap::new()
                .with("objectClass", vec![b"top".to_vec(), b"dnsNode".to_vec()])
                .with("dc", vec![b"empty".to_vec()]),
        ));

        let nodes = service.list_records(&zone).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].name, "www");
        assert_eq!(
            record_node_filter().to_string(),
            "(&(objectClass=dnsNode)(dnsRecord=*))"
        );
    }

    #[test]
    fn list_records_of_missing_zone_is_a_store_error() {
        let service = service();
        let zone = service.zone_dn(Partition::Domain, "missing.example");
        assert!(matches!(
            service.list_records(&zone),
            Err(Error::Store {
                operation: Operation::Search,
                ..
            })
        ));
    }

    #[test]
    fn update_collapses_to_one_value() {
        let service = service();
        let zone = example_zone(&service);
        let dn = service
            .create_record(&zone, "txt", RecordType::Txt, "first", 60)
            .unwrap();
        service
            .directory()
            .modify(
                &dn,
                &[Modification::Add(
                    DNS_RECORD.to_owned(),
                    vec![encode_value(RecordType::Txt, "second", 60).unwrap()],
                )],
            )
            .unwrap();
        assert_eq!(stored_values(&service, &dn).len(), 2);

        service
            .update_record(&dn, RecordType::Txt, "third", 120)
            .unwrap();
        let node = service.get_record(&dn).unwrap();
        assert_eq!(node.values.len(), 1);
        assert_eq!(node.values[0].to_string(), "120 TXT third");
    }

    #[test]
    fn missing_nodes_are_not_found() {
        let service = service();
        let dn = example_zone(&service).child("DC", "ghost");
        let not_found = Error::RecordNotFound { dn: dn.clone() };
        assert_eq!(service.get_record(&dn).unwrap_err(), not_found);
        assert_eq!(
            service
                .update_record(&dn, RecordType::A, "192.0.2.1", 60)
                .unwrap_err(),
            not_found
        );
        assert_eq!(service.delete_record(&dn).unwrap_err(), not_found);
    }

    #[test]
    fn delete_removes_the_node() {
        let service = service();
        let zone = example_zone(&service);
        let dn = service
            .create_record(&zone, "old", RecordType::Cname, "www.example.com", 60)
            .unwrap();
        service.delete_record(&dn).unwrap();
        assert!(service.directory().manager().entry(&dn).is_none());
        assert!(service.list_records(&zone).unwrap().is_empty());
    }

    #[test]
    fn list_zones_merges_partitions() {
        let service = service();
        let zones = service.list_zones();
        let names: Vec<_> = zones.iter().map(|z| (z.name.as_str(), z.partition)).collect();
        assert_eq!(
            names,
            [
                ("example.com", Partition::Domain),
                ("_msdcs.example.com", Partition::Forest),
            ]
        );
        assert_eq!(zones[0].when_created.as_deref(), Some("20220101000000.0Z"));
    }

    #[test]
    fn list_zones_tolerates_unavailable_partition() {
        let service = service();
        service
            .directory()
            .manager()
            .set_unavailable(&Partition::Forest.container(&Dn::from(BASE)));
        let zones = service.list_zones();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].partition, Partition::Domain);
    }

    #[test]
    fn list_zones_tolerates_missing_partition() {
        let directory = MemoryDirectory::new();
        directory.insert(container(Partition::Domain, "container"));
        directory.insert(zone_entry(Partition::Domain, "example.com"));
        let service = ZoneService::new(
            Pool::new(directory, PoolConfig::default()),
            Dn::from(BASE),
        );
        assert_eq!(service.list_zones().len(), 1);
    }

    #[test]
    fn store_failures_carry_context() {
        let service = service();
        let zone = example_zone(&service);
        service
            .directory()
            .manager()
            .set_unavailable(&Dn::from(BASE));
        match service.create_record(&zone, "www", RecordType::A, "192.0.2.1", 60) {
            Err(Error::Store {
                operation,
                dn,
                source,
            }) => {
                assert_eq!(operation, Operation::Add);
                assert_eq!(dn, zone.child("DC", "www"));
                assert_eq!(source.kind(), ErrorKind::Unavailable);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
