// Network node - owns the ledger state and drives mining, discovery and consensus

use crate::config::NodeConfig;
use crate::consensus::{select_longest_valid_chain, ChainValidator, Miner};
use crate::core::{Block, LedgerError, Transaction, TransactionRequest, MINING_REWARD, MINING_SENDER};
use crate::network::{discover_neighbors, PeerClient};
use crate::storage::{Chain, TransactionPool};
use crate::wallet::{derive_address, public_key_from_hex, verify_transaction};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;

/// Marks one periodic activity as in flight; released on drop
struct ActivityGuard<'a>(&'a AtomicBool);

impl<'a> ActivityGuard<'a> {
    /// Non-blocking acquire: `None` if the activity is already running
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for ActivityGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Network node
pub struct Node {
    config: NodeConfig,
    /// Address credited with mining rewards
    address: String,
    chain: RwLock<Chain>,
    pool: Mutex<TransactionPool>,
    neighbors: RwLock<Vec<String>>,
    /// Held by block sealing and chain replacement
    chain_mutation: Mutex<()>,
    peers: Arc<dyn PeerClient>,
    validator: ChainValidator,
    mining: AtomicBool,
    syncing: AtomicBool,
    /// Raised on shutdown to abandon an in-flight proof-of-work search
    cancel: Arc<AtomicBool>,
}

impl Node {
    /// Create a new node with a fresh genesis chain
    pub fn new(config: NodeConfig, address: impl Into<String>, peers: Arc<dyn PeerClient>) -> Self {
        Self {
            validator: ChainValidator::new(config.difficulty),
            config,
            address: address.into(),
            chain: RwLock::new(Chain::new()),
            pool: Mutex::new(TransactionPool::new()),
            neighbors: RwLock::new(Vec::new()),
            chain_mutation: Mutex::new(()),
            peers,
            mining: AtomicBool::new(false),
            syncing: AtomicBool::new(false),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Copy of the chain, genesis first
    pub async fn get_chain(&self) -> Vec<Block> {
        self.chain.read().await.blocks().to_vec()
    }

    /// Printable dump of the chain
    pub async fn describe_chain(&self) -> String {
        self.chain.read().await.describe()
    }

    /// Confirmed balance of an address
    pub async fn get_balance(&self, address: &str) -> f64 {
        self.chain.read().await.balance_of(address)
    }

    /// Pending transactions, in arrival order
    pub async fn pool_transactions(&self) -> Vec<Transaction> {
        self.pool.lock().await.snapshot()
    }

    /// Drop every pending transaction
    pub async fn clear_pool(&self) {
        self.pool.lock().await.clear();
        log::info!("Transaction pool cleared");
    }

    /// Current neighbor set
    pub async fn neighbors(&self) -> Vec<String> {
        self.neighbors.read().await.clone()
    }

    /// Replace the neighbor set wholesale
    pub async fn set_neighbors(&self, neighbors: Vec<String>) {
        *self.neighbors.write().await = neighbors;
    }

    /// Accept a transaction into the pool.
    ///
    /// Rewards from the reserved sender go straight in. Anything else needs a
    /// valid signature from the key behind the sender address and enough
    /// confirmed balance to cover the value.
    pub async fn add_transaction(&self, request: &TransactionRequest) -> Result<(), LedgerError> {
        let tx = request.transaction();

        if tx.is_reward() {
            self.pool.lock().await.push(tx);
            return Ok(());
        }

        if !tx.value.is_finite() || tx.value < 0.0 {
            return Err(LedgerError::InvalidValue(tx.value));
        }

        let (Some(public_key), Some(signature)) =
            (request.sender_public_key.as_deref(), request.signature.as_deref())
        else {
            return Err(LedgerError::InvalidSignature("missing public key or signature".to_string()));
        };

        verify_transaction(&tx, public_key, signature)?;

        if derive_address(&public_key_from_hex(public_key)?) != tx.sender {
            return Err(LedgerError::InvalidSignature(
                "public key does not belong to sender address".to_string(),
            ));
        }

        let balance = self.get_balance(&tx.sender).await;
        if balance < tx.value {
            log::error!("Rejected transaction from {}: balance {} < {}", tx.sender, balance, tx.value);
            return Err(LedgerError::InsufficientBalance {
                balance,
                requested: tx.value,
            });
        }

        self.pool.lock().await.push(tx);
        Ok(())
    }

    /// Accept a client transaction and relay it to every neighbor
    pub async fn create_transaction(&self, request: &TransactionRequest) -> Result<(), LedgerError> {
        Self::reject_reserved_sender(request)?;
        self.add_transaction(request).await?;
        self.relay_transaction(request).await;
        Ok(())
    }

    /// Accept a transaction relayed by a neighbor, without relaying it again
    pub async fn receive_transaction(&self, request: &TransactionRequest) -> Result<(), LedgerError> {
        Self::reject_reserved_sender(request)?;
        self.add_transaction(request).await
    }

    fn reject_reserved_sender(request: &TransactionRequest) -> Result<(), LedgerError> {
        if request.is_reward() {
            return Err(LedgerError::InvalidSignature(format!(
                "sender {:?} is reserved for mining rewards",
                MINING_SENDER
            )));
        }
        Ok(())
    }

    /// Best-effort relay; failures are logged and skipped
    async fn relay_transaction(&self, request: &TransactionRequest) {
        for peer in self.neighbors().await {
            if let Err(e) = self.peers.relay_transaction(&peer, request).await {
                log::warn!("Relay to {} failed: {}", peer, e);
            }
        }
    }

    /// Seal the pool into a new block.
    ///
    /// Adds this node's reward, searches for a nonce over the pool snapshot and
    /// the tip hash, appends the block and removes the sealed transactions from
    /// the pool. Neighbors are then told to clear their pools and to run
    /// conflict resolution.
    pub async fn mine(&self) -> Result<Block, LedgerError> {
        let block = {
            let _sealing = self.chain_mutation.lock().await;

            let reward = TransactionRequest::unsigned(MINING_SENDER, self.address.clone(), MINING_REWARD);
            self.add_transaction(&reward).await?;

            let transactions = self.pool.lock().await.snapshot();
            let previous_hash = self.chain.read().await.last_hash();

            let result = match self.proof_of_work(transactions.clone(), previous_hash.clone()).await {
                Ok(result) => result,
                Err(e) => {
                    self.pool.lock().await.remove_included(&[reward.transaction()]);
                    return Err(e);
                }
            };

            let block = Block::new(result.nonce, previous_hash, transactions);
            self.chain.write().await.push(block.clone());
            self.pool.lock().await.remove_included(&block.transactions);

            log::info!(
                "Mined block with {} transactions, nonce {} after {} attempts in {:?}",
                block.transactions.len(),
                result.nonce,
                result.attempts,
                result.duration
            );
            block
        };

        let neighbors = self.neighbors().await;
        for peer in &neighbors {
            if let Err(e) = self.peers.clear_remote_pool(peer).await {
                log::warn!("Clearing pool of {} failed: {}", peer, e);
            }
        }
        for peer in &neighbors {
            if let Err(e) = self.peers.notify_consensus(peer).await {
                log::warn!("Consensus request to {} failed: {}", peer, e);
            }
        }

        Ok(block)
    }

    /// CPU-bound nonce search, off the async workers
    async fn proof_of_work(
        &self,
        transactions: Vec<Transaction>,
        previous_hash: String,
    ) -> Result<crate::consensus::MiningResult, LedgerError> {
        let miner = Miner::new(self.config.difficulty);
        let cancel = Arc::clone(&self.cancel);

        tokio::task::spawn_blocking(move || miner.mine_cancellable(&transactions, &previous_hash, &cancel))
            .await
            .map_err(|e| {
                log::error!("Proof of work task failed: {}", e);
                LedgerError::MiningAborted
            })?
            .ok_or(LedgerError::MiningAborted)
    }

    /// Mine unless a mining attempt is already running.
    /// Returns `None` when the attempt was skipped.
    pub async fn try_mine(&self) -> Option<Result<Block, LedgerError>> {
        let Some(_guard) = ActivityGuard::try_acquire(&self.mining) else {
            log::debug!("Mining already in progress, skipping");
            return None;
        };
        Some(self.mine().await)
    }

    /// Rescan the subnet and replace the neighbor set.
    /// Returns `false` when a scan was already running.
    pub async fn sync_neighbors(&self) -> bool {
        let Some(_guard) = ActivityGuard::try_acquire(&self.syncing) else {
            log::debug!("Neighbor discovery already in progress, skipping");
            return false;
        };

        let found = discover_neighbors(
            &self.config.host,
            self.config.port,
            self.config.ip_offsets.clone(),
            self.config.ports.clone(),
            self.config.probe_timeout,
        )
        .await;

        match found {
            Ok(neighbors) => {
                log::info!("Neighbors: {:?}", neighbors);
                self.set_neighbors(neighbors).await;
            }
            Err(e) => log::error!("Neighbor discovery aborted: {}", e),
        }
        true
    }

    /// Replace the local chain with the longest valid neighbor chain, if one
    /// is strictly longer. Returns whether a replacement happened.
    pub async fn resolve_conflicts(&self) -> bool {
        let mut candidates = Vec::new();
        for peer in self.neighbors().await {
            match self.peers.fetch_chain(&peer).await {
                Ok(chain) => candidates.push((peer, chain)),
                Err(e) => log::warn!("Skipping {} during resolution: {}", peer, e),
            }
        }

        let _replacing = self.chain_mutation.lock().await;
        let local_length = self.chain.read().await.len();

        match select_longest_valid_chain(local_length, candidates, &self.validator) {
            Some(longest) => {
                log::info!("Chain replaced: {} -> {} blocks", local_length, longest.len());
                self.chain.write().await.replace(longest);
                true
            }
            None => {
                log::info!("Chain not replaced");
                false
            }
        }
    }

    /// Start the node: discover neighbors, resolve conflicts once, then run
    /// discovery and mining as periodic tasks until the handle is stopped.
    pub async fn run(self: Arc<Self>) -> NodeHandle {
        self.sync_neighbors().await;
        self.resolve_conflicts().await;

        let (stop_tx, stop_rx) = watch::channel(false);
        let mut tasks = Vec::new();

        let node = Arc::clone(&self);
        tasks.push(spawn_periodic(
            "discovery",
            self.config.discovery_interval,
            true,
            stop_rx.clone(),
            move || {
                let node = Arc::clone(&node);
                async move {
                    node.sync_neighbors().await;
                }
            },
        ));

        if self.config.mining_enabled {
            let node = Arc::clone(&self);
            tasks.push(spawn_periodic(
                "mining",
                self.config.mining_interval,
                false,
                stop_rx,
                move || {
                    let node = Arc::clone(&node);
                    async move {
                        if let Some(Err(e)) = node.try_mine().await {
                            log::error!("Mining failed: {}", e);
                        }
                    }
                },
            ));
        }

        NodeHandle {
            stop_tx,
            cancel: Arc::clone(&self.cancel),
            tasks,
        }
    }
}

/// Run `job`, then wait `interval` after it completes, until stopped
fn spawn_periodic<F, Fut>(
    name: &'static str,
    interval: Duration,
    delay_first: bool,
    mut stop: watch::Receiver<bool>,
    mut job: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut run_now = !delay_first;
        loop {
            if *stop.borrow() {
                break;
            }
            if run_now {
                job().await;
            }
            run_now = true;

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = stop.changed() => break,
            }
        }
        log::info!("{} loop stopped", name);
    })
}

/// Stop handle for the periodic tasks started by [`Node::run`]
pub struct NodeHandle {
    stop_tx: watch::Sender<bool>,
    cancel: Arc<AtomicBool>,
    tasks: Vec<JoinHandle<()>>,
}

impl NodeHandle {
    /// Stop every loop and abandon any proof-of-work in progress
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        self.cancel.store(true, Ordering::Relaxed);

        for task in self.tasks {
            if let Err(e) = task.await {
                log::error!("Periodic task ended abnormally: {}", e);
            }
        }
    }
}
