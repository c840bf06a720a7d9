use chain_api::block::BlockHeader;
use tracing::trace;

use crate::block_header_cache::BlockHeaderCache;
use crate::{StorageKey, StorageReader, StorageResult, StorageValue, WriteBatch};

#[cfg(test)]
#[path = "state_store_test.rs"]
mod state_store_test;

/// Read access to a point-in-time state.
pub trait StateReader {
    fn get(&self, key: &[u8]) -> StorageResult<Option<StorageValue>>;
}

/// The state of a single block being processed: the block's pending writes on top of the
/// committed storage, together with the recent block headers.
pub struct StateStore {
    reader: StorageReader,
    pending: WriteBatch,
    block_headers: BlockHeaderCache,
}

/// A saved state of a [`StateStore`], restorable with [`StateStore::restore_snapshot`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateSnapshot {
    pending: WriteBatch,
    block_headers: BlockHeaderCache,
}

impl StateStore {
    pub fn new(reader: StorageReader, block_headers: BlockHeaderCache) -> Self {
        Self { reader, pending: WriteBatch::default(), block_headers }
    }

    pub fn set(&mut self, key: StorageKey, value: StorageValue) {
        trace!("Setting state key {key:?}.");
        self.pending.put(key, value);
    }

    pub fn append_block_header(&mut self, header: BlockHeader) {
        self.block_headers.insert(header);
    }

    pub fn last_block_headers(&self) -> &BlockHeaderCache {
        &self.block_headers
    }

    pub fn create_snapshot(&self) -> StateSnapshot {
        StateSnapshot { pending: self.pending.clone(), block_headers: self.block_headers.clone() }
    }

    /// Drops every change made since `snapshot` was created.
    pub fn restore_snapshot(&mut self, snapshot: StateSnapshot) {
        self.pending = snapshot.pending;
        self.block_headers = snapshot.block_headers;
    }

    /// Consumes the store, returning the writes to commit and the updated header cache.
    pub fn finalize(self) -> (WriteBatch, BlockHeaderCache) {
        (self.pending, self.block_headers)
    }
}

impl StateReader for StateStore {
    fn get(&self, key: &[u8]) -> StorageResult<Option<StorageValue>> {
        match self.pending.get(key) {
            Some(value) => Ok(Some(value.clone())),
            None => self.reader.get(key),
        }
    }
}
