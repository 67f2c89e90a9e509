// In-memory ledger state: the chain and the pending transaction pool

mod chain;
mod mempool;

pub use chain::Chain;
pub use mempool::TransactionPool;
