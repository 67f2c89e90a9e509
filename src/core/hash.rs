// Hashing utilities for the ledger

use sha2::{Sha256, Digest};

/// Single SHA256 hash
pub fn sha256_hash(data: &[u8]) -> [u8; 32] {
    let hash = Sha256::digest(data);
    let mut result = [0u8; 32];
    result.copy_from_slice(&hash);
    result
}

/// SHA256 double hash
/// hash256 = SHA256(SHA256(data))
pub fn hash256(data: &[u8]) -> [u8; 32] {
    sha256_hash(&sha256_hash(data))
}

/// RIPEMD160(SHA256(data)) - used for address generation
pub fn hash160(data: &[u8]) -> [u8; 20] {
    use ripemd::{Ripemd160, Digest as RipemdDigest};
    let sha = Sha256::digest(data);
    let ripemd = Ripemd160::digest(sha);
    let mut result = [0u8; 20];
    result.copy_from_slice(&ripemd);
    result
}

/// Hex-encoded SHA256 digest
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256_hash(data))
}
