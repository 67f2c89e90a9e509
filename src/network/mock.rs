// In-memory PeerClient for tests

use crate::core::{Block, LedgerError, TransactionRequest};
use crate::network::PeerClient;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Serves canned chains and records every call
#[derive(Default)]
pub(crate) struct MockPeerClient {
    chains: Mutex<HashMap<String, Vec<Block>>>,
    unreachable: Mutex<HashSet<String>>,
    calls: Mutex<Vec<(&'static str, String)>>,
}

impl MockPeerClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `chain` when `peer` is asked for its chain
    pub fn set_chain(&self, peer: &str, chain: Vec<Block>) {
        self.chains.lock().unwrap().insert(peer.to_string(), chain);
    }

    /// Make every call to `peer` fail
    pub fn set_unreachable(&self, peer: &str) {
        self.unreachable.lock().unwrap().insert(peer.to_string());
    }

    /// Recorded (operation, peer) pairs, in call order
    pub fn calls(&self) -> Vec<(&'static str, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Peers that received `operation`
    pub fn peers_called(&self, operation: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(op, _)| *op == operation)
            .map(|(_, peer)| peer)
            .collect()
    }

    fn record(&self, operation: &'static str, peer: &str) -> Result<(), LedgerError> {
        self.calls.lock().unwrap().push((operation, peer.to_string()));
        if self.unreachable.lock().unwrap().contains(peer) {
            return Err(LedgerError::NeighborUnreachable {
                peer: peer.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PeerClient for MockPeerClient {
    async fn fetch_chain(&self, peer: &str) -> Result<Vec<Block>, LedgerError> {
        self.record("fetch_chain", peer)?;
        self.chains
            .lock()
            .unwrap()
            .get(peer)
            .cloned()
            .ok_or_else(|| LedgerError::NeighborUnreachable {
                peer: peer.to_string(),
                reason: "no chain".to_string(),
            })
    }

    async fn notify_consensus(&self, peer: &str) -> Result<(), LedgerError> {
        self.record("notify_consensus", peer)
    }

    async fn clear_remote_pool(&self, peer: &str) -> Result<(), LedgerError> {
        self.record("clear_remote_pool", peer)
    }

    async fn relay_transaction(&self, peer: &str, _tx: &TransactionRequest) -> Result<(), LedgerError> {
        self.record("relay_transaction", peer)
    }
}
