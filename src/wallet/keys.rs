// Key management and transaction signatures

use crate::core::{hash160, hash256, sha256_hash, canonical_string, LedgerError, Transaction, TransactionRequest};
use secp256k1::{ecdsa::Signature, Message, PublicKey, Secp256k1, SecretKey};
use rand::rngs::OsRng;
use serde::{Serialize, Deserialize};

/// Version byte prepended to the public key hash
pub const ADDRESS_VERSION: u8 = 0x00;

/// Derive a blockchain address from a public key
///
/// base58(version || RIPEMD160(SHA256(pubkey)) || checksum), where the
/// checksum is the first 4 bytes of a double SHA256 over the versioned hash.
pub fn derive_address(public_key: &PublicKey) -> String {
    let pubkey_hash = hash160(&public_key.serialize_uncompressed());

    let mut payload = Vec::with_capacity(25);
    payload.push(ADDRESS_VERSION);
    payload.extend_from_slice(&pubkey_hash);

    let checksum = hash256(&payload);
    payload.extend_from_slice(&checksum[..4]);

    bs58::encode(payload).into_string()
}

/// Parse a hex-encoded public key
pub fn public_key_from_hex(public_key_hex: &str) -> Result<PublicKey, LedgerError> {
    let bytes = hex::decode(public_key_hex)
        .map_err(|e| LedgerError::InvalidSignature(format!("public key is not hex: {}", e)))?;
    PublicKey::from_slice(&bytes)
        .map_err(|e| LedgerError::InvalidSignature(format!("malformed public key: {}", e)))
}

/// SHA256 of the canonical {sender, recipient, value} encoding
pub fn transaction_digest(tx: &Transaction) -> [u8; 32] {
    sha256_hash(canonical_string(&tx.canonical_value()).as_bytes())
}

/// Sign a transaction, returning the compact signature as hex
pub fn sign_transaction(tx: &Transaction, secret_key: &SecretKey) -> String {
    let secp = Secp256k1::signing_only();
    let message = Message::from_digest(transaction_digest(tx));
    let signature = secp.sign_ecdsa(&message, secret_key);
    hex::encode(signature.serialize_compact())
}

/// Verify a transaction signature against the claimed public key
pub fn verify_transaction(
    tx: &Transaction,
    public_key_hex: &str,
    signature_hex: &str,
) -> Result<(), LedgerError> {
    let public_key = public_key_from_hex(public_key_hex)?;

    let sig_bytes = hex::decode(signature_hex)
        .map_err(|e| LedgerError::InvalidSignature(format!("signature is not hex: {}", e)))?;
    let signature = Signature::from_compact(&sig_bytes)
        .map_err(|e| LedgerError::InvalidSignature(format!("malformed signature: {}", e)))?;

    let secp = Secp256k1::verification_only();
    let message = Message::from_digest(transaction_digest(tx));
    secp.verify_ecdsa(&message, &signature, &public_key)
        .map_err(|_| LedgerError::InvalidSignature("verification failed".to_string()))
}

/// Exported wallet keys (hex) and address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletInfo {
    pub private_key: String,
    pub public_key: String,
    pub blockchain_address: String,
}

/// Key pair plus its derived address
#[derive(Clone)]
pub struct Wallet {
    secret_key: SecretKey,
    public_key: PublicKey,
    address: String,
}

impl Wallet {
    /// Generate a new wallet
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let mut rng = OsRng;

        let secret_key = SecretKey::new(&mut rng);
        let public_key = secret_key.public_key(&secp);

        Self::from_keys(secret_key, public_key)
    }

    /// Restore a wallet from a hex-encoded private key
    pub fn from_private_key_hex(private_key_hex: &str) -> Result<Self, LedgerError> {
        let bytes = hex::decode(private_key_hex)
            .map_err(|e| LedgerError::InvalidSignature(format!("private key is not hex: {}", e)))?;
        let secret_key = SecretKey::from_slice(&bytes)
            .map_err(|e| LedgerError::InvalidSignature(format!("malformed private key: {}", e)))?;

        let secp = Secp256k1::new();
        let public_key = secret_key.public_key(&secp);

        Ok(Self::from_keys(secret_key, public_key))
    }

    fn from_keys(secret_key: SecretKey, public_key: PublicKey) -> Self {
        Self {
            address: derive_address(&public_key),
            secret_key,
            public_key,
        }
    }

    /// Get the blockchain address
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Private key as hex
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret_key.secret_bytes())
    }

    /// Uncompressed public key as hex
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize_uncompressed())
    }

    /// Sign a transaction with this wallet's key
    pub fn sign(&self, tx: &Transaction) -> String {
        sign_transaction(tx, &self.secret_key)
    }

    /// Build a signed transfer request from this wallet
    pub fn transfer(&self, recipient: &str, value: f64) -> TransactionRequest {
        let request = TransactionRequest::unsigned(self.address.clone(), recipient, value);
        let signature = self.sign(&request.transaction());
        request.with_signature(self.public_key_hex(), signature)
    }

    /// Export keys and address
    pub fn info(&self) -> WalletInfo {
        WalletInfo {
            private_key: self.private_key_hex(),
            public_key: self.public_key_hex(),
            blockchain_address: self.address.clone(),
        }
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Wallet").field("address", &self.address).finish()
    }
}
