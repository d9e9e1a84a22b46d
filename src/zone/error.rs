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

//! Implementation of the [`Error`] type for zone and record operations.

use std::fmt;

use crate::directory::{self, Dn};
use crate::rr::EncodeError;

/// The directory operation that failed, reported in
/// [`Error::Store`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operation {
    Search,
    Get,
    Add,
    Modify,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Search => "search",
            Self::Get => "read",
            Self::Add => "add",
            Self::Modify => "modify",
            Self::Delete => "delete",
        })
    }
}

/// Errors that arise during operations on a
/// [`ZoneService`](super::ZoneService).
///
/// [`Error::Encode`] and [`Error::InvalidRecordName`] describe bad
/// caller input and are always reported before the directory is
/// contacted. [`Error::DuplicateRecord`] and [`Error::RecordNotFound`]
/// are conditions callers usually want to handle specially (e.g. by
/// offering to edit the existing record instead). Every other directory
/// failure is an [`Error::Store`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    Encode(EncodeError),
    InvalidRecordName(String),
    DuplicateRecord { dn: Dn },
    RecordNotFound { dn: Dn },
    Store {
        operation: Operation,
        dn: Dn,
        source: directory::Error,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Encode(e) => write!(f, "invalid record data: {}", e),
            Self::InvalidRecordName(name) => write!(f, "invalid record name {:?}", name),
            Self::DuplicateRecord { dn } => write!(f, "a record already exists at {}", dn),
            Self::RecordNotFound { dn } => write!(f, "no record exists at {}", dn),
            Self::Store { operation, dn, .. } => {
                write!(f, "directory {} failed for {}", operation, dn)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encode(e) => Some(e),
            Self::Store { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<EncodeError> for Error {
    fn from(error: EncodeError) -> Self {
        Self::Encode(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_errors_name_the_reason() {
        let err = Error::from(EncodeError::SrvArity { found: 3 });
        assert_eq!(
            err.to_string(),
            "invalid record data: SRV data must be \"priority weight port target\" \
             (found 3 fields)"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
