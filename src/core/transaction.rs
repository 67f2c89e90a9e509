// Transaction data structures

use serde::{Serialize, Deserialize};
use serde_json::{json, Value};

/// Reserved sender used for mining rewards
pub const MINING_SENDER: &str = "THE BLOCKCHAIN";

/// Fixed reward paid to the miner of each block
pub const MINING_REWARD: f64 = 1.0;

/// Value transfer recorded in the pool and in sealed blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Address paying the value
    #[serde(rename = "sender_blockchain_address")]
    pub sender: String,
    /// Address receiving the value
    #[serde(rename = "recipient_blockchain_address")]
    pub recipient: String,
    /// Amount transferred
    pub value: f64,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, value: f64) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            value,
        }
    }

    /// Create a mining reward transaction
    pub fn reward(recipient: impl Into<String>) -> Self {
        Self::new(MINING_SENDER, recipient, MINING_REWARD)
    }

    /// Check if this is a mining reward
    pub fn is_reward(&self) -> bool {
        self.sender == MINING_SENDER
    }

    /// JSON form fed into the canonical encoding.
    /// Signatures and hashes both cover exactly these three fields.
    pub fn canonical_value(&self) -> Value {
        json!({
            "recipient_blockchain_address": self.recipient,
            "sender_blockchain_address": self.sender,
            "value": self.value,
        })
    }
}

/// Transaction submission as it travels between wallets and nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    #[serde(rename = "sender_blockchain_address")]
    pub sender: String,
    #[serde(rename = "recipient_blockchain_address")]
    pub recipient: String,
    pub value: f64,
    /// Hex-encoded sender public key (absent for rewards)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    /// Hex-encoded signature over the canonical transaction (absent for rewards)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl TransactionRequest {
    /// Create an unsigned request
    pub fn unsigned(sender: impl Into<String>, recipient: impl Into<String>, value: f64) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            value,
            sender_public_key: None,
            signature: None,
        }
    }

    /// Attach the sender's public key and signature
    pub fn with_signature(mut self, public_key_hex: String, signature_hex: String) -> Self {
        self.sender_public_key = Some(public_key_hex);
        self.signature = Some(signature_hex);
        self
    }

    /// The transaction this request asks to record
    pub fn transaction(&self) -> Transaction {
        Transaction::new(self.sender.clone(), self.recipient.clone(), self.value)
    }

    /// Check if this request carries a mining reward
    pub fn is_reward(&self) -> bool {
        self.sender == MINING_SENDER
    }
}
