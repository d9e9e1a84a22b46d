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

//! Provides the [`Error`] type for directory operations.

use std::fmt;

/// The broad category of a directory [`Error`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// The target object (or the search base) does not exist.
    NoSuchObject,

    /// An object with the target name already exists.
    AlreadyExists,

    /// The server or partition could not be reached.
    Unavailable,

    /// The operation, or the wait for a pooled connection, timed out.
    Timeout,

    /// Any other failure reported by the server.
    Other,
}

impl ErrorKind {
    /// Returns whether an error of this kind means the connection that
    /// produced it should no longer be used.
    pub fn is_connection_fatal(self) -> bool {
        matches!(self, Self::Unavailable | Self::Timeout)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::NoSuchObject => "no such object",
            Self::AlreadyExists => "object already exists",
            Self::Unavailable => "directory unavailable",
            Self::Timeout => "timed out",
            Self::Other => "directory error",
        })
    }
}

/// An error reported by a [`Connection`](super::Connection) or
/// [`Directory`](super::Directory).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the server's diagnostic message, which may be empty.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.message.is_empty() {
            fmt::Display::fmt(&self.kind, f)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_message_when_present() {
        assert_eq!(
            Error::new(ErrorKind::NoSuchObject, "DC=www").to_string(),
            "no such object: DC=www"
        );
        assert_eq!(Error::new(ErrorKind::Timeout, "").to_string(), "timed out");
    }
}
