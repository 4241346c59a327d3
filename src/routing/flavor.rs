//! Flavor identifiers.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::routing::error::ConfigurationError;

/// Longest accepted flavor name.
pub const MAX_FLAVOR_NAME_LEN: usize = 64;

/// Name of a target queue / runner pool.
///
/// Flavors are opaque and case-sensitive. A well-formed name is non-empty,
/// at most [`MAX_FLAVOR_NAME_LEN`] bytes, and uses only ASCII letters,
/// digits, `-`, `_` and `.`, so it can double as a queue name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Flavor(String);

impl Flavor {
    /// Validate and wrap a flavor name.
    pub fn parse(name: impl Into<String>) -> Result<Self, ConfigurationError> {
        let name = name.into();
        if is_well_formed(&name) {
            Ok(Self(name))
        } else {
            Err(ConfigurationError::InvalidFlavorName(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_well_formed(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_FLAVOR_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl TryFrom<String> for Flavor {
    type Error = ConfigurationError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::parse(name)
    }
}

impl From<Flavor> for String {
    fn from(flavor: Flavor) -> Self {
        flavor.0
    }
}

impl FromStr for Flavor {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Flavor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets `HashMap<Flavor, _>` and `DashMap<Flavor, _>` be queried with `&str`.
impl Borrow<str> for Flavor {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Flavor {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Flavor {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
