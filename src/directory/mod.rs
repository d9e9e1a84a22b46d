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

//! Access to the directory that stores DNS zones.
//!
//! Active Directory keeps directory-integrated zones as ordinary
//! directory objects: each zone is a `dnsZone` object, and each owner
//! name within it is a `dnsNode` object whose multi-valued `dnsRecord`
//! attribute holds the records. Managing records therefore needs only
//! five directory primitives (search, read, add, modify, and delete),
//! which this module abstracts from the actual transport.
//!
//! ## Connections, pools, and directories
//!
//! The primitives are defined twice. The [`Connection`] trait is
//! implemented by a single session with a server; its methods take
//! `&mut self`, since a session carries one request at a time. The
//! [`Directory`] trait is the shareable handle used by higher layers
//! such as [`ZoneService`](crate::zone::ZoneService); its methods take
//! `&self`.
//!
//! The bridge between the two is the [`Pool`]. A pool owns a
//! [`Manager`], which knows how to open new connections, and hands out
//! connections to callers through [`PooledConnection`] guards. The
//! guard returns its connection when dropped, so a connection is
//! released on every exit path, including early returns through `?`.
//! [`Pool`] implements [`Directory`] by checking out one connection
//! for each operation.
//!
//! ## Provided in-memory directory
//!
//! [`MemoryDirectory`] is a [`Manager`] whose connections all operate
//! on one shared in-memory tree of entries, with the same error
//! behavior as a directory server for the operations used here. It is
//! useful for embedding and for tests.

use std::sync::Arc;

mod dn;
mod entry;
mod error;
mod filter;
mod memory;
mod pool;

pub use dn::{escape_value, Dn, Rdns};
pub use entry::{AttributeMap, Entry, Modification};
pub use error::{Error, ErrorKind};
pub use filter::Filter;
pub use memory::{MemoryConnection, MemoryDirectory};
pub use pool::{Pool, PoolConfig, PooledConnection};

////////////////////////////////////////////////////////////////////////
// TRAITS                                                             //
////////////////////////////////////////////////////////////////////////

/// Trait for a single session with a directory server.
///
/// Searches are subtree searches rooted at `base`. An empty
/// `attributes` list requests every attribute.
pub trait Connection {
    /// Returns the entries at or below `base` that match `filter`.
    fn search(&mut self, base: &Dn, filter: &Filter, attributes: &[&str])
        -> Result<Vec<Entry>, Error>;

    /// Reads the object at `dn`, returning [`None`] if it does not
    /// exist.
    fn get(&mut self, dn: &Dn, attributes: &[&str]) -> Result<Option<Entry>, Error>;

    /// Creates the object `dn` with the given object classes and
    /// attributes. Fails with [`ErrorKind::AlreadyExists`] if it exists.
    fn add(
        &mut self,
        dn: &Dn,
        object_classes: &[&str],
        attributes: AttributeMap,
    ) -> Result<(), Error>;

    /// Applies `changes` to the object `dn` as one atomic update. Fails
    /// with [`ErrorKind::NoSuchObject`] if the object does not exist.
    fn modify(&mut self, dn: &Dn, changes: &[Modification]) -> Result<(), Error>;

    /// Deletes the object `dn`. Fails with [`ErrorKind::NoSuchObject`]
    /// if the object does not exist.
    fn delete(&mut self, dn: &Dn) -> Result<(), Error>;
}

/// Trait for shareable handles to a directory.
///
/// The methods have the same meaning as those of [`Connection`]; an
/// implementation decides which session carries each call.
pub trait Directory {
    fn search(&self, base: &Dn, filter: &Filter, attributes: &[&str]) -> Result<Vec<Entry>, Error>;
    fn get(&self, dn: &Dn, attributes: &[&str]) -> Result<Option<Entry>, Error>;
    fn add(&self, dn: &Dn, object_classes: &[&str], attributes: AttributeMap)
        -> Result<(), Error>;
    fn modify(&self, dn: &Dn, changes: &[Modification]) -> Result<(), Error>;
    fn delete(&self, dn: &Dn) -> Result<(), Error>;
}

/// Trait for factories of [`Connection`]s, used by a [`Pool`].
pub trait Manager {
    type Connection: Connection;

    /// Opens (and, for a real server, binds) a new connection.
    fn connect(&self) -> Result<Self::Connection, Error>;
}

impl<D: Directory + ?Sized> Directory for Arc<D> {
    fn search(&self, base: &Dn, filter: &Filter, attributes: &[&str]) -> Result<Vec<Entry>, Error> {
        (**self).search(base, filter, attributes)
    }

    fn get(&self, dn: &Dn, attributes: &[&str]) -> Result<Option<Entry>, Error> {
        (**self).get(dn, attributes)
    }

    fn add(
        &self,
        dn: &Dn,
        object_classes: &[&str],
        attributes: AttributeMap,
    ) -> Result<(), Error> {
        (**self).add(dn, object_classes, attributes)
    }

    fn modify(&self, dn: &Dn, changes: &[Modification]) -> Result<(), Error> {
        (**self).modify(dn, changes)
    }

    fn delete(&self, dn: &Dn) -> Result<(), Error> {
        (**self).delete(dn)
    }
}
