//! Chain address type.
//!
//! Address format: `<prefix>1` + 58 bech32 characters, where the prefix is
//! the network's human-readable part (`xch` on mainnet). The 58 characters
//! are 52 for the 32-byte puzzle hash and 6 for the bech32m checksum, so a
//! mainnet address is always 62 characters long.
//!
//! This module only checks the *shape* of an address. Checksum validation
//! and puzzle-hash decoding live in `linkgate-crypto`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{NetworkId, TypeError};

/// The bech32 data alphabet.
pub const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Number of data characters after the `1` separator (52 payload + 6 checksum).
pub const ADDRESS_DATA_CHARS: usize = 58;

/// A chain address that matched the network's address pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainAddress(String);

impl ChainAddress {
    /// Check `raw` against the address pattern for `network`.
    pub fn parse(raw: &str, network: NetworkId) -> Result<Self, TypeError> {
        if matches_pattern(raw, network) {
            Ok(Self(raw.to_string()))
        } else {
            Err(TypeError::InvalidAddress(format!(
                "expected {}1 followed by {ADDRESS_DATA_CHARS} bech32 characters",
                network.address_prefix()
            )))
        }
    }

    /// Wrap an address produced by the encoder. Callers guarantee the format.
    pub fn from_encoded(encoded: String) -> Self {
        Self(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Whether `raw` has the shape `<prefix>1<58 bech32 chars>`.
pub fn matches_pattern(raw: &str, network: NetworkId) -> bool {
    let Some(rest) = raw.strip_prefix(network.address_prefix()) else {
        return false;
    };
    let Some(data) = rest.strip_prefix('1') else {
        return false;
    };
    data.len() == ADDRESS_DATA_CHARS && data.chars().all(|c| BECH32_CHARSET.contains(c))
}

impl fmt::Display for ChainAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for ChainAddress {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
