// Ordered block sequence, genesis at index 0

use crate::core::Block;
use std::fmt::Write;

/// Chain of blocks
#[derive(Debug, Clone)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// Create a chain holding only a fresh genesis block
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::genesis()],
        }
    }

    /// All blocks, genesis first
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Get number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get the tip of the chain
    pub fn last(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Hash of the tip, the previous hash for the next block
    pub fn last_hash(&self) -> String {
        self.last().map(Block::hash).unwrap_or_default()
    }

    /// Append a sealed block
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Replace the whole chain (conflict resolution only)
    pub fn replace(&mut self, blocks: Vec<Block>) {
        self.blocks = blocks;
    }

    /// Confirmed balance of an address: incoming minus outgoing value
    /// over every transaction of every block
    pub fn balance_of(&self, address: &str) -> f64 {
        let mut total = 0.0;
        for block in &self.blocks {
            for tx in &block.transactions {
                if tx.recipient == address {
                    total += tx.value;
                }
                if tx.sender == address {
                    total -= tx.value;
                }
            }
        }
        total
    }

    /// Human readable dump of the chain
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for (i, block) in self.blocks.iter().enumerate() {
            let _ = writeln!(out, "{} Chain {} {}", "=".repeat(25), i, "=".repeat(25));
            let _ = writeln!(out, "{:<40}: {}", "nonce", block.nonce);
            let _ = writeln!(out, "{:<40}: {}", "previous_hash", block.previous_hash);
            let _ = writeln!(out, "{:<40}: {}", "timestamp", block.timestamp);
            let _ = writeln!(out, "{:<40}:", "transactions");
            for tx in &block.transactions {
                let _ = writeln!(out, "{}", "-".repeat(15));
                let _ = writeln!(out, "{:<40}: {}", "recipient_blockchain_address", tx.recipient);
                let _ = writeln!(out, "{:<40}: {}", "sender_blockchain_address", tx.sender);
                let _ = writeln!(out, "{:<40}: {}", "value", tx.value);
            }
        }
        out.push_str(&"*".repeat(60));
        out
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Transaction;

    fn block_with(transactions: Vec<Transaction>) -> Block {
        Block::new(1, "prev".to_string(), transactions)
    }

    #[test]
    fn test_new_chain_has_genesis() {
        let chain = Chain::new();
        assert_eq!(chain.len(), 1);
        assert!(chain.blocks()[0].is_genesis());
        assert_eq!(chain.last_hash(), chain.blocks()[0].hash());
    }

    #[test]
    fn test_balance_is_incoming_minus_outgoing() {
        let mut chain = Chain::new();
        chain.push(block_with(vec![
            Transaction::reward("alice"),
            Transaction::new("alice", "bob", 0.25),
        ]));
        chain.push(block_with(vec![
            Transaction::reward("alice"),
            Transaction::new("bob", "alice", 0.1),
        ]));

        assert!((chain.balance_of("alice") - 1.85).abs() < 1e-9);
        assert!((chain.balance_of("bob") - 0.15).abs() < 1e-9);
        assert_eq!(chain.balance_of("nobody"), 0.0);
    }

    #[test]
    fn test_reward_sender_is_never_debited_for_others() {
        let mut chain = Chain::new();
        chain.push(block_with(vec![Transaction::reward("miner")]));

        assert_eq!(chain.balance_of("miner"), 1.0);
    }

    #[test]
    fn test_replace() {
        let mut chain = Chain::new();
        let other = Chain::new();
        chain.push(block_with(vec![]));

        chain.replace(other.blocks().to_vec());
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_describe_lists_every_block() {
        let mut chain = Chain::new();
        chain.push(block_with(vec![Transaction::reward("miner")]));

        let text = chain.describe();
        assert!(text.contains("Chain 0"));
        assert!(text.contains("Chain 1"));
        assert!(text.contains("miner"));
    }
}
