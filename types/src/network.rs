//! Network identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypeError;

/// Identifies which chain network addresses belong to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    /// The production network (`xch` addresses).
    #[default]
    Mainnet,
    /// The public test network (`txch` addresses).
    Testnet,
}

impl NetworkId {
    /// Human-readable part used for bech32m address encoding.
    pub fn address_prefix(&self) -> &'static str {
        match self {
            Self::Mainnet => "xch",
            Self::Testnet => "txch",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" | "xch" => Ok(Self::Mainnet),
            "testnet" | "test" | "txch" => Ok(Self::Testnet),
            other => Err(TypeError::UnknownNetwork(other.to_string())),
        }
    }
}
