//! Network identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Which ledger cluster a verification runs against.
///
/// Each network binds a verification to its own mint and decimals; the two
/// are never mixed within one call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// The public development cluster.
    Devnet,
    /// The production cluster.
    Mainnet,
}

impl Network {
    pub const ALL: [Network; 2] = [Network::Devnet, Network::Mainnet];

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Devnet => "devnet",
            Self::Mainnet => "mainnet",
        }
    }

    /// Public RPC endpoint used when no endpoints are configured.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::Devnet => "https://api.devnet.solana.com",
            Self::Mainnet => "https://api.mainnet-beta.solana.com",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "devnet" => Ok(Self::Devnet),
            "mainnet" | "mainnet-beta" => Ok(Self::Mainnet),
            other => Err(TypesError::UnknownNetwork(other.to_string())),
        }
    }
}
