// Proof of Work implementation

use crate::core::{Block, Transaction, hash_value};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Leading hex zeros required by default
pub const DEFAULT_DIFFICULTY: usize = 3;

/// How often the search looks at its cancel flag
const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// The structure hashed for a nonce guess
pub fn proof_challenge(transactions: &[Transaction], previous_hash: &str, nonce: u64) -> Value {
    json!({
        "nonce": nonce,
        "previous_hash": previous_hash,
        "transactions": transactions
            .iter()
            .map(Transaction::canonical_value)
            .collect::<Vec<_>>(),
    })
}

/// Check that a hex digest starts with `difficulty` zeros
pub fn meets_difficulty(hash: &str, difficulty: usize) -> bool {
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|b| b == b'0')
}

/// Check a nonce against the transactions and previous hash it seals
pub fn valid_proof(
    transactions: &[Transaction],
    previous_hash: &str,
    nonce: u64,
    difficulty: usize,
) -> bool {
    let hash = hash_value(&proof_challenge(transactions, previous_hash, nonce));
    meets_difficulty(&hash, difficulty)
}

/// Proof of Work miner
#[derive(Debug, Clone, Copy)]
pub struct Miner {
    /// Required number of leading hex zeros
    pub difficulty: usize,
}

impl Miner {
    /// Create a new miner with fixed difficulty
    pub fn new(difficulty: usize) -> Self {
        Self { difficulty }
    }

    /// Search nonces from 0 upward until one satisfies the difficulty.
    /// Unbounded: only returns once a nonce is found.
    pub fn mine(&self, transactions: &[Transaction], previous_hash: &str) -> MiningResult {
        let never = AtomicBool::new(false);
        loop {
            if let Some(result) = self.mine_cancellable(transactions, previous_hash, &never) {
                return result;
            }
        }
    }

    /// Same search as [`Miner::mine`], giving up when `cancel` is raised.
    /// The nonce returned is always the first one meeting the target.
    pub fn mine_cancellable(
        &self,
        transactions: &[Transaction],
        previous_hash: &str,
        cancel: &AtomicBool,
    ) -> Option<MiningResult> {
        let start_time = Instant::now();
        let mut attempts = 0u64;

        for nonce in 0..=u64::MAX {
            if attempts % CANCEL_CHECK_INTERVAL == 0 && cancel.load(Ordering::Relaxed) {
                log::debug!("Proof of work cancelled after {} attempts", attempts);
                return None;
            }

            let hash = hash_value(&proof_challenge(transactions, previous_hash, nonce));
            attempts += 1;

            if meets_difficulty(&hash, self.difficulty) {
                return Some(MiningResult {
                    nonce,
                    hash,
                    attempts,
                    duration: start_time.elapsed(),
                });
            }

            // Progress indicator every 100k attempts
            if attempts % 100_000 == 0 {
                let elapsed = start_time.elapsed();
                log::debug!("Mining attempts: {} ({:.1} KH/s)",
                    attempts,
                    attempts as f64 / elapsed.as_secs_f64() / 1000.0
                );
            }
        }

        None
    }

    /// Verify that a block's nonce satisfies PoW
    pub fn verify(&self, block: &Block) -> bool {
        valid_proof(&block.transactions, &block.previous_hash, block.nonce, self.difficulty)
    }
}

/// Mining result
#[derive(Debug, Clone)]
pub struct MiningResult {
    /// The nonce that was found
    pub nonce: u64,
    /// Hash of the winning challenge
    pub hash: String,
    /// Number of attempts
    pub attempts: u64,
    /// Time taken
    pub duration: Duration,
}

impl MiningResult {
    /// Calculate hash rate (hashes per second)
    pub fn hash_rate(&self) -> f64 {
        self.attempts as f64 / self.duration.as_secs_f64()
    }
}
