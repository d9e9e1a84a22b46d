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

//! Provides the [`MemoryDirectory`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{AttributeMap, Connection, Dn, Entry, Error, ErrorKind, Filter, Manager, Modification};

/// An in-memory directory. See the [module-level
/// documentation](super#provided-in-memory-directory).
///
/// Entries are kept in insertion order, which is also the order in
/// which searches return them.
#[derive(Default)]
pub struct MemoryDirectory {
    tree: Arc<Mutex<Tree>>,
    connections_opened: AtomicUsize,
}

#[derive(Default)]
struct Tree {
    entries: Vec<Entry>,
    unavailable: Vec<Dn>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an entry directly, without the checks that
    /// [`Connection::add`] makes. Used to seed the directory.
    pub fn insert(&self, entry: Entry) {
        let mut tree = lock(&self.tree);
        match tree.entries.iter().position(|e| e.dn == entry.dn) {
            Some(i) => tree.entries[i] = entry,
            None => tree.entries.push(entry),
        }
    }

    /// Returns a copy of the entry at `dn`, if any.
    pub fn entry(&self, dn: &Dn) -> Option<Entry> {
        lock(&self.tree).entries.iter().find(|e| e.dn == *dn).cloned()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        lock(&self.tree).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Makes every operation on `base` or its subtree fail with
    /// [`ErrorKind::Unavailable`], as when a partition's server cannot
    /// be reached.
    pub fn set_unavailable(&self, base: &Dn) {
        lock(&self.tree).unavailable.push(base.clone());
    }

    /// Undoes [`MemoryDirectory::set_unavailable`] for `base`.
    pub fn set_available(&self, base: &Dn) {
        lock(&self.tree).unavailable.retain(|dn| dn != base);
    }

    /// Returns the number of connections opened so far.
    pub fn connections_opened(&self) -> usize {
        self.connections_opened.load(Ordering::Relaxed)
    }
}

impl Manager for MemoryDirectory {
    type Connection = MemoryConnection;

    fn connect(&self) -> Result<MemoryConnection, Error> {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
        Ok(MemoryConnection {
            tree: self.tree.clone(),
        })
    }
}

/// A [`Connection`] to a [`MemoryDirectory`].
pub struct MemoryConnection {
    tree: Arc<Mutex<Tree>>,
}

impl MemoryConnection {
    fn lock_available(&self, dn: &Dn) -> Result<MutexGuard<Tree>, Error> {
        let tree = lock(&self.tree);
        if tree.unavailable.iter().any(|base| dn.is_within(base)) {
            Err(Error::new(ErrorKind::Unavailable, dn.to_string()))
        } else {
            Ok(tree)
        }
    }
}

impl Connection for MemoryConnection {
    fn search(
        &mut self,
        base: &Dn,
        filter: &Filter,
        attributes: &[&str],
    ) -> Result<Vec<Entry>, Error> {
        let tree = self.lock_available(base)?;
        if !tree.entries.iter().any(|e| e.dn == *base) {
            return Err(no_such_object(base));
        }
        Ok(tree
            .entries
            .iter()
            .filter(|e| e.dn.is_within(base) && filter.matches(e))
            .map(|e| Entry::new(e.dn.clone(), e.attributes.project(attributes)))
            .collect())
    }

    fn get(&mut self, dn: &Dn, attributes: &[&str]) -> Result<Option<Entry>, Error> {
        let tree = self.lock_available(dn)?;
        Ok(tree
            .entries
            .iter()
            .find(|e| e.dn == *dn)
            .map(|e| Entry::new(e.dn.clone(), e.attributes.project(attributes))))
    }

    fn add(
        &mut self,
        dn: &Dn,
        object_classes: &[&str],
        mut attributes: AttributeMap,
    ) -> Result<(), Error> {
        let mut tree = self.lock_available(dn)?;
        if tree.entries.iter().any(|e| e.dn == *dn) {
            return Err(Error::new(ErrorKind::AlreadyExists, dn.to_string()));
        }
        if let Some(parent) = dn.parent() {
            if !tree.entries.iter().any(|e| e.dn == parent) {
                return Err(no_such_object(&parent));
            }
        }
        attributes.insert(
            "objectClass",
            object_classes.iter().map(|c| c.as_bytes().to_vec()).collect(),
        );
        tree.entries.push(Entry::new(dn.clone(), attributes));
        Ok(())
    }

    fn modify(&mut self, dn: &Dn, changes: &[Modification]) -> Result<(), Error> {
        let mut tree = self.lock_available(dn)?;
        let entry = tree
            .entries
            .iter_mut()
            .find(|e| e.dn == *dn)
            .ok_or_else(|| no_such_object(dn))?;
        let mut updated = entry.attributes.clone();
        for change in changes {
            updated.apply(change);
        }
        entry.attributes = updated;
        Ok(())
    }

    fn delete(&mut self, dn: &Dn) -> Result<(), Error> {
        let mut tree = self.lock_available(dn)?;
        let index = tree
            .entries
            .iter()
            .position(|e| e.dn == *dn)
            .ok_or_else(|| no_such_object(dn))?;
        if tree.entries.iter().any(|e| e.dn.parent().as_ref() == Some(dn)) {
            return Err(Error::new(
                ErrorKind::Other,
                format!("{} has children", dn),
            ));
        }
        tree.entries.remove(index);
        Ok(())
    }
}

fn no_such_object(dn: &Dn) -> Error {
    Error::new(ErrorKind::NoSuchObject, dn.to_string())
}

fn lock(tree: &Mutex<Tree>) -> MutexGuard<Tree> {
    tree.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> (MemoryDirectory, MemoryConnection) {
        let directory = MemoryDirectory::new();
        directory.insert(Entry::new(Dn::from("DC=example,DC=com"), AttributeMap::new()));
        let conn = directory.connect().unwrap();
        (directory, conn)
    }

    #[test]
    fn add_get_modify_delete() {
        let (directory, mut conn) = seeded();
        let dn = Dn::from("DC=www,DC=example,DC=com");
        conn.add(
            &dn,
            &["top", "dnsNode"],
            AttributeMap::new().with("dnsRecord", vec![vec![1]]),
        )
        .unwrap();

        let entry = conn.get(&dn, &["dnsRecord"]).unwrap().unwrap();
        assert_eq!(entry.values("dnsRecord"), &[vec![1u8]]);
        assert!(entry.attributes.get("objectClass").is_none());
        assert_eq!(
            directory.entry(&dn).unwrap().values("objectClass"),
            &[b"top".to_vec(), b"dnsNode".to_vec()]
        );

        conn.modify(
            &dn,
            &[Modification::Replace("dnsRecord".into(), vec![vec![2]])],
        )
        .unwrap();
        assert_eq!(directory.entry(&dn).unwrap().values("dnsRecord"), &[vec![2u8]]);

        conn.delete(&dn).unwrap();
        assert_eq!(conn.get(&dn, &[]).unwrap(), None);
    }

    #[test]
    fn errors_match_directory_server_behavior() {
        let (_directory, mut conn) = seeded();
        let dn = Dn::from("DC=www,DC=example,DC=com");
        let kind = |r: Result<(), Error>| r.unwrap_err().kind();

        assert_eq!(kind(conn.delete(&dn)), ErrorKind::NoSuchObject);
        assert_eq!(kind(conn.modify(&dn, &[])), ErrorKind::NoSuchObject);
        assert_eq!(
            kind(conn.add(&Dn::from("DC=a,DC=missing"), &[], AttributeMap::new())),
            ErrorKind::NoSuchObject
        );
        conn.add(&dn, &[], AttributeMap::new()).unwrap();
        assert_eq!(
            kind(conn.add(&Dn::from("dc=WWW,dc=Example,dc=Com"), &[], AttributeMap::new())),
            ErrorKind::AlreadyExists
        );
        assert_eq!(
            kind(conn.delete(&Dn::from("DC=example,DC=com"))),
            ErrorKind::Other
        );
        assert_eq!(
            conn.search(&Dn::from("DC=missing"), &Filter::And(vec![]), &[])
                .unwrap_err()
                .kind(),
            ErrorKind::NoSuchObject
        );
    }

    #[test]
    fn search_is_subtree_scoped_and_filtered() {
        let (directory, mut conn) = seeded();
        directory.insert(Entry::new(Dn::from("DC=other,DC=com"), AttributeMap::new()));
        for dn in ["DC=a,DC=example,DC=com", "DC=b,DC=other,DC=com"] {
            conn.add(&Dn::from(dn), &["dnsNode"], AttributeMap::new())
                .unwrap();
        }
        let found = conn
            .search(
                &Dn::from("DC=example,DC=com"),
                &Filter::object_class("dnsNode"),
                &[],
            )
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].dn, Dn::from("DC=a,DC=example,DC=com"));
    }

    #[test]
    fn unavailable_subtrees_fail() {
        let (directory, mut conn) = seeded();
        let base = Dn::from("DC=example,DC=com");
        directory.set_unavailable(&base);
        assert_eq!(
            conn.get(&Dn::from("DC=www,DC=example,DC=com"), &[])
                .unwrap_err()
                .kind(),
            ErrorKind::Unavailable
        );
        directory.set_available(&base);
        assert!(conn.get(&base, &[]).unwrap().is_some());
    }
}
