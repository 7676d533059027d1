//! Per-network connection manager.

use burnproof_types::Network;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::{FailoverClient, HttpRpcEndpoint, RpcError, TransactionSource};

/// Holds one [`FailoverClient`] per configured network.
#[derive(Clone, Default)]
pub struct ConnectionManager {
    clients: HashMap<Network, FailoverClient>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build HTTP endpoints for every `(network, urls)` pair, preserving URL order.
    pub fn from_urls<I>(networks: I, endpoint_timeout: Duration) -> Result<Self, RpcError>
    where
        I: IntoIterator<Item = (Network, Vec<String>)>,
    {
        let mut manager = Self::new();
        for (network, urls) in networks {
            let endpoints = urls
                .into_iter()
                .map(|url| {
                    HttpRpcEndpoint::new(url, endpoint_timeout)
                        .map(|e| Arc::new(e) as Arc<dyn TransactionSource>)
                })
                .collect::<Result<Vec<_>, _>>()?;
            manager.insert(FailoverClient::new(network, endpoints, endpoint_timeout));
        }
        Ok(manager)
    }

    /// Register (or replace) the client for its network.
    pub fn insert(&mut self, client: FailoverClient) {
        self.clients.insert(client.network(), client);
    }

    /// The client for `network`, or `NoEndpoints` if none is configured.
    pub fn client(&self, network: Network) -> Result<&FailoverClient, RpcError> {
        self.clients
            .get(&network)
            .filter(|c| !c.is_empty())
            .ok_or(RpcError::NoEndpoints(network))
    }

    pub fn networks(&self) -> impl Iterator<Item = Network> + '_ {
        self.clients.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_network_has_no_endpoints() {
        let manager = ConnectionManager::from_urls(
            [(Network::Devnet, vec!["http://127.0.0.1:8899".to_string()])],
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(manager.client(Network::Devnet).unwrap().len(), 1);
        assert!(matches!(
            manager.client(Network::Mainnet),
            Err(RpcError::NoEndpoints(Network::Mainnet))
        ));
    }

    #[test]
    fn empty_url_list_counts_as_unconfigured() {
        let manager =
            ConnectionManager::from_urls([(Network::Devnet, vec![])], Duration::from_secs(1))
                .unwrap();
        assert!(manager.client(Network::Devnet).is_err());
    }
}
