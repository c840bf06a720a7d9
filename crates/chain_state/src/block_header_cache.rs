use std::collections::BTreeMap;

use chain_api::block::{BlockHeader, BlockNumber};
use chain_api::core::Address;

#[cfg(test)]
#[path = "block_header_cache_test.rs"]
mod block_header_cache_test;

/// The most recent block headers of the chain, keyed by height.
///
/// Holds at most `capacity` headers; inserting beyond it evicts the lowest height.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockHeaderCache {
    // The maximum number of headers to retain.
    capacity: usize,
    cache: BTreeMap<BlockNumber, BlockHeader>,
}

impl BlockHeaderCache {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, cache: BTreeMap::new() }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Inserts a header, replacing a previous header at the same height.
    pub fn insert(&mut self, header: BlockHeader) {
        self.cache.insert(header.height, header);
        while self.cache.len() > self.capacity {
            self.cache.pop_first();
        }
    }

    pub fn get(&self, height: BlockNumber) -> Option<&BlockHeader> {
        self.cache.get(&height)
    }

    /// Iterates the headers from the highest height down.
    pub fn iter_descending(&self) -> impl Iterator<Item = &BlockHeader> {
        self.cache.values().rev()
    }

    /// The highest retained header forged by `generator`.
    pub fn find_last_by_generator(&self, generator: &Address) -> Option<&BlockHeader> {
        self.iter_descending().find(|header| &header.generator_address == generator)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
