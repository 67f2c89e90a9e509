// Longest-valid-chain selection

use crate::core::Block;
use crate::consensus::ChainValidator;

/// Pick the chain that should replace the local one, if any.
///
/// A candidate qualifies only when it is strictly longer than the best length
/// seen so far (starting at `local_length`) and validates. Equal lengths never
/// replace, so the first peer to present a given length wins.
pub fn select_longest_valid_chain<I>(
    local_length: usize,
    candidates: I,
    validator: &ChainValidator,
) -> Option<Vec<Block>>
where
    I: IntoIterator<Item = (String, Vec<Block>)>,
{
    let mut max_length = local_length;
    let mut longest_chain = None;

    for (peer, chain) in candidates {
        if chain.len() <= max_length {
            log::debug!("Chain from {} not longer than {} blocks, skipping", peer, max_length);
            continue;
        }

        match validator.validate_chain(&chain) {
            Ok(()) => {
                max_length = chain.len();
                longest_chain = Some(chain);
            }
            Err(e) => {
                log::warn!("Rejecting chain from {}: {}", peer, e);
            }
        }
    }

    longest_chain
}
