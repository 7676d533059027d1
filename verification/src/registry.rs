//! Mint registry: which mint each network honours, and the decimals of
//! every known mint.
//!
//! Decimals are keyed by mint rather than by network so the burn decoder
//! stays general over any token-program mint.

use burnproof_types::{Network, Pubkey};
use std::collections::HashMap;

use crate::config::VerifierConfig;

/// The mint and decimals a verification on one network is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkProfile {
    pub network: Network,
    pub mint: Pubkey,
    pub decimals: u8,
}

#[derive(Clone, Debug, Default)]
pub struct MintRegistry {
    decimals: HashMap<Pubkey, u8>,
    mints: HashMap<Network, Pubkey>,
}

impl MintRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &VerifierConfig) -> Self {
        let mut registry = Self::new();
        for (network, net) in config.networks.iter() {
            registry.register(network, net.mint, net.decimals);
        }
        registry
    }

    /// Bind `network` to `mint` and record the mint's decimals.
    pub fn register(&mut self, network: Network, mint: Pubkey, decimals: u8) {
        if let Some(previous) = self.decimals.insert(mint, decimals) {
            if previous != decimals {
                tracing::warn!(
                    mint = %mint,
                    previous,
                    decimals,
                    "mint registered twice with different decimals"
                );
            }
        }
        self.mints.insert(network, mint);
    }

    pub fn decimals_of(&self, mint: &Pubkey) -> Option<u8> {
        self.decimals.get(mint).copied()
    }

    pub fn mint_for(&self, network: Network) -> Option<Pubkey> {
        self.mints.get(&network).copied()
    }

    /// Mint and decimals for `network`, if the network is configured.
    pub fn profile(&self, network: Network) -> Option<NetworkProfile> {
        let mint = self.mint_for(network)?;
        let decimals = self.decimals_of(&mint)?;
        Some(NetworkProfile {
            network,
            mint,
            decimals,
        })
    }
}
