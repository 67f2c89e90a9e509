// Wallet: key pairs, addresses and transaction signatures

mod keys;

pub use keys::{
    Wallet, WalletInfo, derive_address, public_key_from_hex, sign_transaction,
    transaction_digest, verify_transaction, ADDRESS_VERSION,
};
