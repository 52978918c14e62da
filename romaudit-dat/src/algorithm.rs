use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DatError;

/// Digest algorithm used to compare file content against the catalog.
///
/// The choice is run-wide: every file in a run is hashed with the same
/// algorithm and looked up under the matching catalog attribute.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[serde(alias = "crc32")]
    Crc,
    Md5,
    #[default]
    Sha1,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 3] = [Self::Crc, Self::Md5, Self::Sha1];

    /// Attribute name used for this hash in DAT files.
    pub fn attr_name(self) -> &'static str {
        match self {
            Self::Crc => "crc",
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
        }
    }

    /// Length of the hex digest in characters.
    pub fn hex_len(self) -> usize {
        match self {
            Self::Crc => 8,
            Self::Md5 => 32,
            Self::Sha1 => 40,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attr_name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = DatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "crc" | "crc32" => Ok(Self::Crc),
            "md5" => Ok(Self::Md5),
            "sha1" | "sha-1" => Ok(Self::Sha1),
            _ => Err(DatError::UnknownAlgorithm(s.to_string())),
        }
    }
}
