//! Verifier configuration with TOML file support.

use burnproof_types::amount::MAX_DECIMALS;
use burnproof_types::{DeploymentMode, Network, Pubkey};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for the burn verifier.
///
/// Can be loaded from a TOML file via [`VerifierConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Deployment flag. Only `development` or `test` enable simulation.
    #[serde(default)]
    pub deployment: DeploymentMode,

    /// Overall bound on one verify call, in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Bound on a single endpoint attempt during failover, in milliseconds.
    #[serde(default = "default_endpoint_timeout_ms")]
    pub endpoint_timeout_ms: u64,

    /// Maximum number of consumed signatures kept in memory.
    #[serde(default = "default_replay_capacity")]
    pub replay_capacity: usize,

    /// How long a consumed signature is remembered, in seconds.
    #[serde(default = "default_replay_ttl_secs")]
    pub replay_ttl_secs: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Per-network endpoints and mint.
    #[serde(default)]
    pub networks: NetworksConfig,
}

/// The `[networks]` table. A network without an entry cannot be verified.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NetworksConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devnet: Option<NetworkConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mainnet: Option<NetworkConfig>,
}

impl NetworksConfig {
    pub fn get(&self, network: Network) -> Option<&NetworkConfig> {
        match network {
            Network::Devnet => self.devnet.as_ref(),
            Network::Mainnet => self.mainnet.as_ref(),
        }
    }

    pub fn set(&mut self, network: Network, config: NetworkConfig) {
        match network {
            Network::Devnet => self.devnet = Some(config),
            Network::Mainnet => self.mainnet = Some(config),
        }
    }

    /// Configured networks, devnet first.
    pub fn iter(&self) -> impl Iterator<Item = (Network, &NetworkConfig)> {
        Network::ALL
            .into_iter()
            .filter_map(move |n| self.get(n).map(|c| (n, c)))
    }
}

/// One network's RPC endpoints and the mint whose burns are honoured.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Ordered endpoint URLs; the first is preferred. Empty means the
    /// network's public endpoint.
    #[serde(default)]
    pub endpoints: Vec<String>,

    /// Mint address (base58).
    pub mint: Pubkey,

    /// Decimals of the mint.
    pub decimals: u8,
}

impl NetworkConfig {
    pub fn new(mint: Pubkey, decimals: u8) -> Self {
        Self {
            endpoints: Vec::new(),
            mint,
            decimals,
        }
    }

    pub fn with_endpoints(mut self, endpoints: Vec<String>) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Configured endpoints, or the network's public endpoint if none.
    pub fn effective_endpoints(&self, network: Network) -> Vec<String> {
        if self.endpoints.is_empty() {
            vec![network.default_endpoint().to_string()]
        } else {
            self.endpoints.clone()
        }
    }
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_endpoint_timeout_ms() -> u64 {
    4_000
}

fn default_replay_capacity() -> usize {
    100_000
}

fn default_replay_ttl_secs() -> u64 {
    7 * 24 * 3600
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl VerifierConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reject settings the verifier cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_ms == 0 || self.endpoint_timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeouts must be non-zero".into()));
        }
        if self.replay_capacity == 0 {
            return Err(ConfigError::Invalid("replay_capacity must be non-zero".into()));
        }
        if self.replay_ttl_secs == 0 {
            return Err(ConfigError::Invalid("replay_ttl_secs must be non-zero".into()));
        }
        if self.networks.iter().next().is_none() {
            return Err(ConfigError::Invalid("no networks configured".into()));
        }
        for (network, net) in self.networks.iter() {
            if net.decimals > MAX_DECIMALS {
                return Err(ConfigError::Invalid(format!(
                    "{network}: decimals {} exceeds {MAX_DECIMALS}",
                    net.decimals
                )));
            }
            if let Some(bad) = net
                .endpoints
                .iter()
                .find(|u| !(u.starts_with("http://") || u.starts_with("https://")))
            {
                return Err(ConfigError::Invalid(format!(
                    "{network}: endpoint {bad:?} is not an http(s) URL"
                )));
            }
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn endpoint_timeout(&self) -> Duration {
        Duration::from_millis(self.endpoint_timeout_ms)
    }

    pub fn replay_ttl(&self) -> Duration {
        Duration::from_secs(self.replay_ttl_secs)
    }
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            deployment: DeploymentMode::default(),
            request_timeout_ms: default_request_timeout_ms(),
            endpoint_timeout_ms: default_endpoint_timeout_ms(),
            replay_capacity: default_replay_capacity(),
            replay_ttl_secs: default_replay_ttl_secs(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            networks: NetworksConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINT: &str = "So11111111111111111111111111111111111111112";

    fn sample() -> VerifierConfig {
        let mut config = VerifierConfig::default();
        config.networks.set(
            Network::Devnet,
            NetworkConfig::new(Pubkey::parse(MINT).unwrap(), 9)
                .with_endpoints(vec!["https://a.example".into(), "https://b.example".into()]),
        );
        config
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = VerifierConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.request_timeout_ms, 10_000);
        assert_eq!(config.deployment, DeploymentMode::Production);
        assert_eq!(config.log_format, "human");
        assert!(config.networks.devnet.is_none());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = sample();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = VerifierConfig::from_toml_str(&toml_str).expect("should parse");
        let devnet = parsed.networks.devnet.unwrap();
        assert_eq!(devnet.endpoints.len(), 2);
        assert_eq!(devnet.mint.to_string(), MINT);
        assert_eq!(devnet.decimals, 9);
    }

    #[test]
    fn parses_networks_and_deployment() {
        let config = VerifierConfig::from_toml_str(&format!(
            r#"
            deployment = "development"
            endpoint_timeout_ms = 1500

            [networks.mainnet]
            endpoints = ["https://rpc-1.example", "https://rpc-2.example"]
            mint = "{MINT}"
            decimals = 6
            "#
        ))
        .unwrap();
        assert_eq!(config.deployment, DeploymentMode::Development);
        assert_eq!(config.endpoint_timeout(), Duration::from_millis(1500));
        let mainnet = config.networks.get(Network::Mainnet).unwrap();
        assert_eq!(mainnet.endpoints[0], "https://rpc-1.example");
        assert!(config.networks.get(Network::Devnet).is_none());
        config.validate().unwrap();
    }

    #[test]
    fn unknown_deployment_flag_is_production() {
        let config = VerifierConfig::from_toml_str(r#"deployment = "staging""#).unwrap();
        assert_eq!(config.deployment, DeploymentMode::Production);
    }

    #[test]
    fn bad_mint_fails_to_parse() {
        let err = VerifierConfig::from_toml_str(
            r#"
            [networks.devnet]
            mint = "not-a-key"
            decimals = 6
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn validate_rejects_bad_settings() {
        assert!(VerifierConfig::default().validate().is_err());

        let mut config = sample();
        config.validate().unwrap();

        config.request_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = sample();
        config.networks.devnet.as_mut().unwrap().decimals = 20;
        assert!(config.validate().is_err());

        let mut config = sample();
        config.networks.devnet.as_mut().unwrap().endpoints = vec!["ftp://x".into()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_endpoints_fall_back_to_public() {
        let net = NetworkConfig::new(Pubkey::parse(MINT).unwrap(), 9);
        assert_eq!(
            net.effective_endpoints(Network::Devnet),
            vec!["https://api.devnet.solana.com".to_string()]
        );
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "replay_capacity = 42").unwrap();
        let config = VerifierConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.replay_capacity, 42);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = VerifierConfig::from_toml_file("/nonexistent/burnproof.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
