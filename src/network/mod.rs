// Peer networking: neighbor discovery, peer client and the node itself

mod peer;
mod discovery;
mod node;
pub mod api;

#[cfg(test)]
pub(crate) mod mock;

pub use peer::{PeerClient, HttpPeerClient, ChainResponse};
pub use discovery::{discover_neighbors, probe, parse_host};
pub use node::{Node, NodeHandle};
