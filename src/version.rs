//! Data version numbering

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;

/// A historical format revision.
///
/// Several revisions can share one public `version` number and are told apart by
/// `sub_version` (e.g. `1451.6`). Ordering follows [`DataVersion::key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DataVersion {
    /// Public data version (e.g. 1451)
    pub version: u32,
    /// Revision within the same public version
    pub sub_version: u32,
}

impl DataVersion {
    /// Create a version without a sub-version
    pub const fn new(version: u32) -> Self {
        Self {
            version,
            sub_version: 0,
        }
    }

    /// Create a version with a sub-version
    pub const fn with_sub(version: u32, sub_version: u32) -> Self {
        Self {
            version,
            sub_version,
        }
    }

    /// Combined sortable key (`version * 10 + sub_version`)
    pub fn key(&self) -> u64 {
        u64::from(self.version) * 10 + u64::from(self.sub_version)
    }

    /// Parse from "1451", "1451.6" or "v1451_6"
    pub fn parse(version_str: &str) -> Result<Self, SchemaError> {
        let trimmed = version_str
            .trim()
            .strip_prefix(['v', 'V'])
            .unwrap_or(version_str.trim());
        let (major, sub) = match trimmed.split_once(['.', '_']) {
            Some((major, sub)) => (major, Some(sub)),
            None => (trimmed, None),
        };

        let invalid = || SchemaError::InvalidVersion(version_str.to_string());
        let version = major.parse::<u32>().map_err(|_| invalid())?;
        let sub_version = match sub {
            Some(sub) => sub.parse::<u32>().map_err(|_| invalid())?,
            None => 0,
        };
        if sub_version > 9 {
            return Err(invalid());
        }

        Ok(Self::with_sub(version, sub_version))
    }
}

impl From<u32> for DataVersion {
    fn from(version: u32) -> Self {
        Self::new(version)
    }
}

impl FromStr for DataVersion {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DataVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sub_version == 0 {
            write!(f, "{}", self.version)
        } else {
            write!(f, "{}.{}", self.version, self.sub_version)
        }
    }
}
