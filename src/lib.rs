// Peer-replicated proof-of-work ledger

pub mod core;
pub mod consensus;
pub mod storage;
pub mod network;
pub mod wallet;
pub mod config;
pub mod cli;

// Re-exports for convenience
pub use core::{Block, Transaction, TransactionRequest, LedgerError, MINING_SENDER, MINING_REWARD};
pub use consensus::{Miner, ChainValidator, ChainValidationError, MiningResult};
pub use storage::{Chain, TransactionPool};
pub use network::{Node, NodeHandle, PeerClient, HttpPeerClient};
pub use wallet::{Wallet, WalletInfo};
pub use config::NodeConfig;
pub use cli::{Cli, CliHandler};
