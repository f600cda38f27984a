//! Generation modes.
//!
//! - `conservative`: only what the platform needs to boot
//! - `standard`: the default set
//! - `aggressive`: adds USB mapping and input kexts plus extra drivers
//!
//! Names parse case-insensitively; anything else is an [`UnknownMode`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown generation mode: {0} (expected conservative, standard or aggressive)")]
pub struct UnknownMode(pub String);

/// How far synthesis goes beyond the minimum a platform needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    Conservative,
    #[default]
    Standard,
    Aggressive,
}

impl GenerationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Standard => "standard",
            Self::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "conservative" => Ok(Self::Conservative),
            "standard" => Ok(Self::Standard),
            "aggressive" => Ok(Self::Aggressive),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}
