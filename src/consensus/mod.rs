// Consensus: proof-of-work, chain validation and conflict resolution

pub mod pow;
pub mod validation;
pub mod resolver;

pub use pow::{Miner, MiningResult, DEFAULT_DIFFICULTY, valid_proof, proof_challenge};
pub use validation::{ChainValidator, ChainValidationError};
pub use resolver::select_longest_valid_chain;
