// Outbound calls to neighbor nodes

use crate::core::{Block, LedgerError, TransactionRequest};
use async_trait::async_trait;
use serde::{Serialize, Deserialize};
use std::time::Duration;

/// Body of `GET /chain`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainResponse {
    pub chain: Vec<Block>,
}

/// Everything the node asks of its neighbors.
///
/// Peers are addressed by `host:port`.
#[async_trait]
pub trait PeerClient: Send + Sync {
    /// Fetch a neighbor's full chain
    async fn fetch_chain(&self, peer: &str) -> Result<Vec<Block>, LedgerError>;

    /// Ask a neighbor to run conflict resolution
    async fn notify_consensus(&self, peer: &str) -> Result<(), LedgerError>;

    /// Ask a neighbor to clear its transaction pool
    async fn clear_remote_pool(&self, peer: &str) -> Result<(), LedgerError>;

    /// Forward an accepted transaction to a neighbor
    async fn relay_transaction(&self, peer: &str, tx: &TransactionRequest) -> Result<(), LedgerError>;
}

/// JSON-over-HTTP peer client
#[derive(Debug, Clone)]
pub struct HttpPeerClient {
    client: reqwest::Client,
}

impl HttpPeerClient {
    /// Create a client whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self { client })
    }

    fn url(peer: &str, path: &str) -> String {
        format!("http://{}{}", peer, path)
    }

    fn unreachable(peer: &str, reason: impl std::fmt::Display) -> LedgerError {
        LedgerError::NeighborUnreachable {
            peer: peer.to_string(),
            reason: reason.to_string(),
        }
    }

    async fn send(&self, peer: &str, request: reqwest::RequestBuilder) -> Result<reqwest::Response, LedgerError> {
        let response = request
            .send()
            .await
            .map_err(|e| Self::unreachable(peer, e))?;

        if !response.status().is_success() {
            return Err(Self::unreachable(peer, format!("status {}", response.status())));
        }

        Ok(response)
    }
}

#[async_trait]
impl PeerClient for HttpPeerClient {
    async fn fetch_chain(&self, peer: &str) -> Result<Vec<Block>, LedgerError> {
        let request = self.client.get(Self::url(peer, "/chain"));
        let response = self.send(peer, request).await?;

        let body: ChainResponse = response
            .json()
            .await
            .map_err(|e| Self::unreachable(peer, format!("bad chain body: {}", e)))?;

        Ok(body.chain)
    }

    async fn notify_consensus(&self, peer: &str) -> Result<(), LedgerError> {
        let request = self.client.put(Self::url(peer, "/consensus"));
        self.send(peer, request).await.map(|_| ())
    }

    async fn clear_remote_pool(&self, peer: &str) -> Result<(), LedgerError> {
        let request = self.client.delete(Self::url(peer, "/transactions"));
        self.send(peer, request).await.map(|_| ())
    }

    async fn relay_transaction(&self, peer: &str, tx: &TransactionRequest) -> Result<(), LedgerError> {
        let request = self.client.put(Self::url(peer, "/transactions")).json(tx);
        self.send(peer, request).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url() {
        assert_eq!(HttpPeerClient::url("10.0.0.2:5002", "/chain"), "http://10.0.0.2:5002/chain");
    }

    #[tokio::test]
    async fn test_unreachable_peer() {
        let client = HttpPeerClient::new(Duration::from_millis(200)).unwrap();

        // Bind then drop a listener to get a port nothing is serving on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client.fetch_chain(&addr.to_string()).await.unwrap_err();
        assert!(matches!(err, LedgerError::NeighborUnreachable { .. }));
    }
}
