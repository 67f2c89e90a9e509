// Ledger error taxonomy

/// Errors surfaced by the ledger core
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// Bad key/signature encoding or failed signature verification
    InvalidSignature(String),
    /// Sender's confirmed balance is below the transaction value
    InsufficientBalance { balance: f64, requested: f64 },
    /// Transaction value is negative or not a finite number
    InvalidValue(f64),
    /// A chain failed hash-linkage or proof-of-work validation
    InvalidChain(String),
    /// Network failure while talking to a neighbor
    NeighborUnreachable { peer: String, reason: String },
    /// Self host is not a dotted-quad IPv4 address
    MalformedHostAddress(String),
    /// Proof-of-work search was cancelled before a nonce was found
    MiningAborted,
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            LedgerError::InvalidSignature(reason) => write!(f, "Invalid signature: {}", reason),
            LedgerError::InsufficientBalance { balance, requested } => {
                write!(f, "Insufficient balance: have {}, need {}", balance, requested)
            }
            LedgerError::InvalidValue(value) => write!(f, "Invalid transaction value: {}", value),
            LedgerError::InvalidChain(reason) => write!(f, "Invalid chain: {}", reason),
            LedgerError::NeighborUnreachable { peer, reason } => {
                write!(f, "Neighbor {} unreachable: {}", peer, reason)
            }
            LedgerError::MalformedHostAddress(host) => write!(f, "Malformed host address: {}", host),
            LedgerError::MiningAborted => write!(f, "Mining aborted"),
        }
    }
}

impl std::error::Error for LedgerError {}
