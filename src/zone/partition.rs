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

//! Provides the [`Partition`] type.

use std::fmt;
use std::str::FromStr;

use crate::directory::Dn;
use crate::util::Caseless;

/// An application partition that can hold directory-integrated zones.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Partition {
    /// `DomainDnsZones`, replicated to the domain's DNS servers.
    Domain,

    /// `ForestDnsZones`, replicated to every DNS server in the forest.
    Forest,
}

impl Partition {
    /// Every partition, in the order zones are listed.
    pub const ALL: [Partition; 2] = [Self::Domain, Self::Forest];

    fn dc(self) -> &'static str {
        match self {
            Self::Domain => "DomainDnsZones",
            Self::Forest => "ForestDnsZones",
        }
    }

    /// Returns the DN of the partition's zone container,
    /// `CN=MicrosoftDNS,DC=<partition>,<base>`.
    pub fn container(self, base: &Dn) -> Dn {
        base.child("DC", self.dc()).child("CN", "MicrosoftDNS")
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Domain => "domain",
            Self::Forest => "forest",
        })
    }
}

impl FromStr for Partition {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = Caseless(text);
        if text == Caseless("domain") || text == Caseless("DomainDnsZones") {
            Ok(Self::Domain)
        } else if text == Caseless("forest") || text == Caseless("ForestDnsZones") {
            Ok(Self::Forest)
        } else {
            Err("unknown partition (expected \"domain\" or \"forest\")")
        }
    }
}
