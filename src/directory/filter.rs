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

//! Provides the [`Filter`] type for search requests.

use std::fmt;

use super::Entry;

/// A search filter. Only the forms needed to find DNS objects are
/// provided.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Filter {
    /// `(attr=value)`, matched ASCII-case-insensitively.
    Equals(String, String),

    /// `(attr=*)`
    Present(String),

    /// `(&...)`; an empty conjunction matches everything.
    And(Vec<Filter>),
}

impl Filter {
    /// Shorthand for `(objectClass=<class>)`.
    pub fn object_class(class: &str) -> Self {
        Self::Equals("objectClass".to_owned(), class.to_owned())
    }

    /// Evaluates the filter against `entry`.
    pub fn matches(&self, entry: &Entry) -> bool {
        match self {
            Self::Equals(attr, value) => entry
                .values(attr)
                .iter()
                .any(|v| v.eq_ignore_ascii_case(value.as_bytes())),
            Self::Present(attr) => !entry.values(attr).is_empty(),
            Self::And(filters) => filters.iter().all(|f| f.matches(entry)),
        }
    }
}

/// Renders the [RFC 4515] string form.
///
/// [RFC 4515]: https://datatracker.ietf.org/doc/html/rfc4515
impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Equals(attr, value) => {
                write!(f, "({}=", attr)?;
                for c in value.chars() {
                    match c {
                        '*' => f.write_str("\\2a")?,
                        '(' => f.write_str("\\28")?,
                        ')' => f.write_str("\\29")?,
                        '\\' => f.write_str("\\5c")?,
                        '\0' => f.write_str("\\00")?,
                        _ => write!(f, "{}", c)?,
                    }
                }
                f.write_str(")")
            }
            Self::Present(attr) => write!(f, "({}=*)", attr),
            Self::And(filters) => {
                f.write_str("(&")?;
                for filter in filters {
                    fmt::Display::fmt(filter, f)?;
                }
                f.write_str(")")
            }
        }
    }
}
