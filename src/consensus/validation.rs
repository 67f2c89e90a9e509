// Chain validation

use crate::core::{Block, LedgerError};
use crate::consensus::pow::Miner;

/// Chain validation error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainValidationError {
    /// Chain has no blocks at all
    Empty,
    /// Block's previous hash doesn't match the hash of the block before it
    BrokenLink { index: usize },
    /// Block's nonce doesn't satisfy the difficulty target
    InvalidProofOfWork { index: usize },
}

impl std::fmt::Display for ChainValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ChainValidationError::Empty => write!(f, "Chain has no blocks"),
            ChainValidationError::BrokenLink { index } => {
                write!(f, "Block {} does not link to its predecessor", index)
            }
            ChainValidationError::InvalidProofOfWork { index } => {
                write!(f, "Block {} has an invalid proof of work", index)
            }
        }
    }
}

impl std::error::Error for ChainValidationError {}

impl From<ChainValidationError> for LedgerError {
    fn from(err: ChainValidationError) -> Self {
        LedgerError::InvalidChain(err.to_string())
    }
}

/// Chain validator
#[derive(Debug, Clone, Copy)]
pub struct ChainValidator {
    /// PoW miner for verification
    miner: Miner,
}

impl ChainValidator {
    /// Create a new chain validator with fixed difficulty
    pub fn new(difficulty: usize) -> Self {
        Self {
            miner: Miner::new(difficulty),
        }
    }

    /// Validate every block after genesis: hash linkage first, then proof of work.
    /// The first violation rejects the whole chain.
    pub fn validate_chain(&self, chain: &[Block]) -> Result<(), ChainValidationError> {
        if chain.is_empty() {
            return Err(ChainValidationError::Empty);
        }

        for (index, pair) in chain.windows(2).enumerate() {
            let (previous, block) = (&pair[0], &pair[1]);
            let index = index + 1;

            if block.previous_hash != previous.hash() {
                return Err(ChainValidationError::BrokenLink { index });
            }

            if !self.miner.verify(block) {
                return Err(ChainValidationError::InvalidProofOfWork { index });
            }
        }

        Ok(())
    }

    /// Convenience wrapper returning a bool
    pub fn is_valid(&self, chain: &[Block]) -> bool {
        self.validate_chain(chain).is_ok()
    }
}
