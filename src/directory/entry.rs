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

//! Directory entries, their attributes, and modifications to them.

use super::Dn;
use crate::util::Caseless;

////////////////////////////////////////////////////////////////////////
// ATTRIBUTE MAPS                                                     //
////////////////////////////////////////////////////////////////////////

/// The attributes of a directory object. Attribute names are matched
/// case-insensitively and keep the spelling they were first inserted
/// with. Values are binary, since some attributes (notably
/// `dnsRecord`) are.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AttributeMap {
    attributes: Vec<(String, Vec<Vec<u8>>)>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the values of the attribute `name`, if present.
    pub fn get(&self, name: &str) -> Option<&[Vec<u8>]> {
        self.position(name)
            .map(|i| self.attributes[i].1.as_slice())
    }

    /// Sets the values of the attribute `name`, replacing any existing
    /// values.
    pub fn insert(&mut self, name: &str, values: Vec<Vec<u8>>) {
        match self.position(name) {
            Some(i) => self.attributes[i].1 = values,
            None => self.attributes.push((name.to_owned(), values)),
        }
    }

    /// Builder-style form of [`AttributeMap::insert`].
    pub fn with(mut self, name: &str, values: Vec<Vec<u8>>) -> Self {
        self.insert(name, values);
        self
    }

    /// Removes the attribute `name`, returning its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<Vec<u8>>> {
        self.position(name).map(|i| self.attributes.remove(i).1)
    }

    /// Iterates over `(name, values)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Vec<u8>])> {
        self.attributes
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Returns a copy containing only the attributes named in `names`.
    /// An empty `names` selects every attribute.
    pub fn project(&self, names: &[&str]) -> Self {
        if names.is_empty() {
            return self.clone();
        }
        Self {
            attributes: self
                .attributes
                .iter()
                .filter(|(name, _)| names.iter().any(|n| Caseless(n) == Caseless(name)))
                .cloned()
                .collect(),
        }
    }

    /// Applies `change`, following LDAP modify semantics: `Add` appends
    /// values, `Replace` overwrites them (removing the attribute if no
    /// values are given), and `Delete` removes the listed values (or
    /// the whole attribute if none are listed).
    pub fn apply(&mut self, change: &Modification) {
        match change {
            Modification::Add(name, values) => match self.position(name) {
                Some(i) => {
                    let existing = &mut self.attributes[i].1;
                    for value in values {
                        if !existing.contains(value) {
                            existing.push(value.clone());
                        }
                    }
                }
                None => self.insert(name, values.clone()),
            },
            Modification::Replace(name, values) => {
                if values.is_empty() {
                    self.remove(name);
                } else {
                    self.insert(name, values.clone());
                }
            }
            Modification::Delete(name, values) => {
                if values.is_empty() {
                    self.remove(name);
                } else if let Some(i) = self.position(name) {
                    self.attributes[i].1.retain(|v| !values.contains(v));
                    if self.attributes[i].1.is_empty() {
                        self.attributes.remove(i);
                    }
                }
            }
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.attributes
            .iter()
            .position(|(n, _)| Caseless(n) == Caseless(name))
    }
}

impl<'a> FromIterator<(&'a str, Vec<Vec<u8>>)> for AttributeMap {
    fn from_iter<T: IntoIterator<Item = (&'a str, Vec<Vec<u8>>)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (name, values) in iter {
            map.insert(name, values);
        }
        map
    }
}

////////////////////////////////////////////////////////////////////////
// ENTRIES                                                            //
////////////////////////////////////////////////////////////////////////

/// A directory object as returned by a search or read.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    pub dn: Dn,
    pub attributes: AttributeMap,
}

impl Entry {
    pub fn new(dn: Dn, attributes: AttributeMap) -> Self {
        Self { dn, attributes }
    }

    /// Returns every value of the attribute `name` (none if absent).
    pub fn values(&self, name: &str) -> &[Vec<u8>] {
        self.attributes.get(name).unwrap_or(&[])
    }

    /// Returns the first value of the attribute `name`.
    pub fn first(&self, name: &str) -> Option<&[u8]> {
        self.values(name).first().map(Vec::as_slice)
    }

    /// Returns the first value of the attribute `name` if it is UTF-8.
    pub fn first_str(&self, name: &str) -> Option<&str> {
        self.first(name).and_then(|v| std::str::from_utf8(v).ok())
    }
}

/// One change in a modify request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Modification {
    Add(String, Vec<Vec<u8>>),
    Replace(String, Vec<Vec<u8>>),
    Delete(String, Vec<Vec<u8>>),
}

impl Modification {
    /// Returns the name of the attribute this change affects.
    pub fn attribute(&self) -> &str {
        match self {
            Self::Add(name, _) | Self::Replace(name, _) | Self::Delete(name, _) => name,
        }
    }
}
