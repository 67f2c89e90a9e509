// Core ledger data structures

mod error;
mod hash;
mod canonical;
mod transaction;
mod block;

pub use error::*;
pub use hash::*;
pub use canonical::*;
pub use transaction::*;
pub use block::*;
