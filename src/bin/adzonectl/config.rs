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

//! Implements the configuration file.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::Level::Debug;
use log::{debug, log_enabled};
use paste::paste;
use serde::{de, Deserialize};

use adzone::rr::Ttl;
use adzone::zone::Partition;

////////////////////////////////////////////////////////////////////////
// CONFIGURATION LOADING                                              //
////////////////////////////////////////////////////////////////////////

/// Loads the configuration from the file given by `path`.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let raw_config =
        fs::read_to_string(path.as_ref()).context("failed to read the configuration file")?;
    let config = parse(&raw_config)?;
    log_config_summary(&config);
    Ok(config)
}

/// Parses and validates the text of a configuration file.
fn parse(raw_config: &str) -> Result<Config> {
    let config: Config =
        toml::from_str(raw_config).context("failed to parse the configuration file")?;
    Ttl::try_from(config.default_ttl).context("invalid default_ttl")?;
    Ok(config)
}

/// Summarizes the configuration in the log, if the debug log level is
/// enabled.
fn log_config_summary(config: &Config) {
    if !log_enabled!(Debug) {
        // Don't compute the message if it will never be printed.
        return;
    }
    debug!(
        "Configuration loaded:\n\
         Base DN:     {}\n\
         Partition:   {}\n\
         Default TTL: {}",
        config.base_dn.as_deref().unwrap_or("(not set)"),
        config.partition.0,
        config.default_ttl,
    );
}

////////////////////////////////////////////////////////////////////////
// CONFIGURATION FILE STRUCTURE                                       //
////////////////////////////////////////////////////////////////////////

/// The complete configuration file. Every field is optional, and
/// command-line options take precedence over it.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub base_dn: Option<String>,
    #[serde(default = "default_partition")]
    pub partition: ConfigPartition,
    #[serde(default = "default_ttl")]
    pub default_ttl: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_dn: None,
            partition: default_partition(),
            default_ttl: default_ttl(),
        }
    }
}

fn default_partition() -> ConfigPartition {
    ConfigPartition(Partition::Domain)
}

fn default_ttl() -> u32 {
    Ttl::DEFAULT.into()
}

////////////////////////////////////////////////////////////////////////
// WRAPPERS OVER ADZONE TYPES FOR SERDE                               //
////////////////////////////////////////////////////////////////////////

/// Generates a deserializable `ConfigX` structure wrapping an `X` type
/// from [`adzone`], using its [`FromStr`](std::str::FromStr)
/// implementation.
macro_rules! make_serde_wrapper {
    ($wrapper:ident, $over:ty, $description:literal) => {
        /// A macro-generated deserializable wrapper over an [`adzone`]
        /// type.
        #[derive(Clone, Debug)]
        pub struct $wrapper(pub $over);

        impl<'de> Deserialize<'de> for $wrapper {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: de::Deserializer<'de>,
            {
                deserializer.deserialize_str(paste! { [<$wrapper Visitor>] })
            }
        }

        paste! {
            /// A macro-generated [`Visitor`](de::Visitor).
            #[derive(Debug)]
            struct [<$wrapper Visitor>];
        }

        impl<'de> de::Visitor<'de> for paste! { [<$wrapper Visitor>] } {
            type Value = $wrapper;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str($description)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value
                    .parse()
                    .map($wrapper)
                    .map_err(|e| E::custom(format!("invalid {}: {}", $description, e)))
            }
        }
    };
}

make_serde_wrapper!(ConfigPartition, Partition, "partition");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.base_dn, None);
        assert_eq!(config.partition.0, Partition::Domain);
        assert_eq!(config.default_ttl, 3600);
    }

    #[test]
    fn full_file_is_parsed() {
        let config = parse(
            "base_dn = \"DC=example,DC=com\"\n\
             partition = \"forest\"\n\
             default_ttl = 600\n",
        )
        .unwrap();
        assert_eq!(config.base_dn.as_deref(), Some("DC=example,DC=com"));
        assert_eq!(config.partition.0, Partition::Forest);
        assert_eq!(config.default_ttl, 600);
    }

    #[test]
    fn bad_files_are_rejected() {
        assert!(parse("unknown = 1\n").is_err());
        assert!(parse("partition = \"global\"\n").is_err());
        assert!(parse("default_ttl = 4294967295\n").is_err());
    }
}
