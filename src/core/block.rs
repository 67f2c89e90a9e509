// Block data structures

use serde::{Serialize, Deserialize};
use serde_json::{json, Value};
use crate::core::{Transaction, hash_value, empty_hash};

/// Current time as fractional Unix seconds
pub fn unix_timestamp() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

/// Block - a sealed snapshot of pool transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Sealing time (Unix epoch, fractional seconds)
    pub timestamp: f64,
    /// Proof-of-work solution
    pub nonce: u64,
    /// Hex digest of the previous block
    pub previous_hash: String,
    /// Transactions sealed in this block
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Create a new block stamped with the current time
    pub fn new(nonce: u64, previous_hash: String, transactions: Vec<Transaction>) -> Self {
        Self {
            timestamp: unix_timestamp(),
            nonce,
            previous_hash,
            transactions,
        }
    }

    /// Create the genesis block
    pub fn genesis() -> Self {
        Self::new(0, empty_hash(), Vec::new())
    }

    /// JSON form fed into the canonical encoding
    pub fn canonical_value(&self) -> Value {
        json!({
            "nonce": self.nonce,
            "previous_hash": self.previous_hash,
            "timestamp": self.timestamp,
            "transactions": self
                .transactions
                .iter()
                .map(Transaction::canonical_value)
                .collect::<Vec<_>>(),
        })
    }

    /// Get the block hash
    pub fn hash(&self) -> String {
        hash_value(&self.canonical_value())
    }

    /// Check if this is the genesis block
    pub fn is_genesis(&self) -> bool {
        self.nonce == 0 && self.previous_hash == empty_hash()
    }
}
