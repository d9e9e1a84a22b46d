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

//! Provides the [`Dn`] (distinguished name) type.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A distinguished name in its [RFC 4514] string form, e.g.
/// `DC=www,DC=example.com,CN=MicrosoftDNS,DC=DomainDnsZones,DC=example,DC=com`.
///
/// Comparison and hashing are ASCII-case-insensitive and ignore
/// whitespace around the RDN separators, as directory servers do for
/// the attribute types and values used here. Escaped values are
/// compared as written; no attempt is made to normalize `\,` against
/// `\2C`.
///
/// [RFC 4514]: https://datatracker.ietf.org/doc/html/rfc4514
#[derive(Clone)]
pub struct Dn(String);

impl Dn {
    pub fn new(dn: impl Into<String>) -> Self {
        Self(dn.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Builds the DN of the child `attr=value,<self>`, escaping `value`
    /// as [RFC 4514 § 2.4] requires.
    ///
    /// [RFC 4514 § 2.4]: https://datatracker.ietf.org/doc/html/rfc4514#section-2.4
    pub fn child(&self, attr: &str, value: &str) -> Self {
        let rdn = format!("{}={}", attr, escape_value(value));
        if self.is_empty() {
            Self(rdn)
        } else {
            Self(format!("{},{}", rdn, self.0))
        }
    }

    /// Returns the leftmost RDN, or [`None`] for the empty DN.
    pub fn rdn(&self) -> Option<&str> {
        self.rdns().next()
    }

    /// Returns the DN of this object's parent, or [`None`] if this DN
    /// has a single RDN (or none).
    pub fn parent(&self) -> Option<Self> {
        let split = find_unescaped_comma(&self.0)?;
        Some(Self(self.0[split + 1..].trim_start().to_owned()))
    }

    /// Returns whether this DN is `base` or lies in the subtree below
    /// it.
    pub fn is_within(&self, base: &Dn) -> bool {
        let ours: Vec<&str> = self.rdns().collect();
        let theirs: Vec<&str> = base.rdns().collect();
        ours.len() >= theirs.len()
            && ours[ours.len() - theirs.len()..]
                .iter()
                .zip(&theirs)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }

    /// Iterates over the RDNs of this DN from left (the object itself)
    /// to right (the root of the directory).
    pub fn rdns(&self) -> Rdns {
        Rdns {
            rest: if self.is_empty() { None } else { Some(&self.0) },
        }
    }
}

impl PartialEq for Dn {
    fn eq(&self, other: &Self) -> bool {
        self.rdns()
            .map(Some)
            .chain(std::iter::once(None))
            .zip(other.rdns().map(Some).chain(std::iter::once(None)))
            .all(|pair| match pair {
                (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                (None, None) => true,
                _ => false,
            })
    }
}

impl Eq for Dn {}

impl Hash for Dn {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for rdn in self.rdns() {
            for octet in rdn.bytes() {
                state.write_u8(octet.to_ascii_lowercase());
            }
            state.write_u8(b',');
        }
    }
}

impl From<&str> for Dn {
    fn from(dn: &str) -> Self {
        Self::new(dn)
    }
}

impl From<String> for Dn {
    fn from(dn: String) -> Self {
        Self(dn)
    }
}

impl fmt::Display for Dn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Dn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Dn({:?})", self.0)
    }
}

/// An iterator over the RDNs of a [`Dn`]. See [`Dn::rdns`].
pub struct Rdns<'a> {
    rest: Option<&'a str>,
}

impl<'a> Iterator for Rdns<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest?;
        match find_unescaped_comma(rest) {
            Some(split) => {
                self.rest = Some(&rest[split + 1..]);
                Some(trim_rdn(&rest[..split]))
            }
            None => {
                self.rest = None;
                Some(trim_rdn(rest))
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////
// ESCAPING                                                           //
////////////////////////////////////////////////////////////////////////

/// Escapes an attribute value for use in an RDN.
pub fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let last = value.chars().count().saturating_sub(1);
    for (i, c) in value.chars().enumerate() {
        match c {
            '"' | '+' | ',' | ';' | '<' | '>' | '\\' | '=' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\0' => escaped.push_str("\\00"),
            '#' if i == 0 => escaped.push_str("\\#"),
            ' ' if i == 0 || i == last => escaped.push_str("\\ "),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Trims insignificant whitespace around an RDN, keeping a trailing
/// space that is escaped.
fn trim_rdn(rdn: &str) -> &str {
    let rdn = rdn.trim_start();
    let trimmed = rdn.trim_end();
    let backslashes = trimmed.bytes().rev().take_while(|&b| b == b'\\').count();
    if backslashes % 2 == 1 && trimmed.len() < rdn.len() {
        &rdn[..trimmed.len() + 1]
    } else {
        trimmed
    }
}

/// Finds the byte index of the first RDN separator in `dn`, skipping
/// escaped characters.
fn find_unescaped_comma(dn: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, octet) in dn.bytes().enumerate() {
        if escaped {
            escaped = false;
        } else if octet == b'\\' {
            escaped = true;
        } else if octet == b',' {
            return Some(i);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equality_ignores_case_and_separator_spacing() {
        let a = Dn::from("DC=www,DC=example.com,CN=MicrosoftDNS");
        let b = Dn::from("dc=WWW, dc=Example.COM, cn=microsoftdns");
        assert_eq!(a, b);
        assert_ne!(a, Dn::from("DC=www,DC=example.com"));

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn child_escapes_special_characters() {
        let zone = Dn::from("DC=example.com,CN=MicrosoftDNS");
        assert_eq!(
            zone.child("DC", "a,b+c").as_str(),
            "DC=a\\,b\\+c,DC=example.com,CN=MicrosoftDNS"
        );
        assert_eq!(zone.child("DC", " x ").rdn(), Some("DC=\\ x\\ "));
        assert_eq!(Dn::from("").child("DC", "com").as_str(), "DC=com");
    }

    #[test]
    fn parent_respects_escapes() {
        let dn = Dn::from("DC=a\\,b,DC=example.com,CN=MicrosoftDNS");
        assert_eq!(dn.rdn(), Some("DC=a\\,b"));
        assert_eq!(
            dn.parent(),
            Some(Dn::from("DC=example.com,CN=MicrosoftDNS"))
        );
        assert_eq!(Dn::from("DC=com").parent(), None);
    }

    #[test]
    fn subtree_membership() {
        let base = Dn::from("CN=MicrosoftDNS,DC=DomainDnsZones,DC=example,DC=com");
        let node = base.child("DC", "example.com").child("DC", "www");
        assert!(node.is_within(&base));
        assert!(base.is_within(&base));
        assert!(!base.is_within(&node));
        assert!(!node.is_within(&Dn::from("DC=ForestDnsZones,DC=example,DC=com")));
        assert!(node.is_within(&Dn::from("")));
    }
}
