//! State storage of the chain node.
//!
//! The storage is an ordered byte-oriented key-value map. It is opened with [`open_storage`],
//! which returns a cloneable [`StorageReader`] and a single [`StorageWriter`]. Each block is
//! processed against a [`state_store::StateStore`] that buffers the block's writes on top of a
//! reader; the block processor commits the finalized [`WriteBatch`] through the writer once the
//! block was accepted.
//!
//! # Example
//! ```
//! use chain_state::open_storage;
//! use chain_state::state_store::{StateReader, StateStore};
//! use chain_state::block_header_cache::BlockHeaderCache;
//!
//! let (reader, mut writer) = open_storage();
//! let mut store = StateStore::new(reader.clone(), BlockHeaderCache::new(10));
//! store.set(b"key".to_vec(), b"value".to_vec());
//! let (batch, _headers) = store.finalize();
//! writer.commit(batch)?;
//! assert_eq!(reader.get(b"key")?, Some(b"value".to_vec()));
//! # Ok::<(), chain_state::StorageError>(())
//! ```

pub mod block_header_cache;
pub mod metrics;
pub mod state_store;

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::metrics::{register_metrics, STORAGE_COMMITTED_BATCHES, STORAGE_COMMITTED_KEYS};
use crate::state_store::StateReader;


/// A key in the storage.
pub type StorageKey = Vec<u8>;
/// A value in the storage.
pub type StorageValue = Vec<u8>;

type Db = Arc<RwLock<BTreeMap<StorageKey, StorageValue>>>;

/// Opens an empty storage and returns its reader and writer.
pub fn open_storage() -> (StorageReader, StorageWriter) {
    register_metrics();
    let db = Db::default();
    (StorageReader { db: db.clone() }, StorageWriter { db })
}

/// A handle for reading committed data. Cheap to clone.
#[derive(Clone)]
pub struct StorageReader {
    db: Db,
}

impl StateReader for StorageReader {
    fn get(&self, key: &[u8]) -> StorageResult<Option<StorageValue>> {
        let db = self.db.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(db.get(key).cloned())
    }
}

/// The single writer of the storage.
pub struct StorageWriter {
    db: Db,
}

impl StorageWriter {
    /// Applies all the writes of the batch at once.
    pub fn commit(&mut self, batch: WriteBatch) -> StorageResult<()> {
        let n_keys = batch.len();
        let mut db = self.db.write().map_err(|_| StorageError::LockPoisoned)?;
        db.extend(batch.entries);
        debug!("Committed a write batch of {n_keys} keys.");
        STORAGE_COMMITTED_BATCHES.increment(1);
        STORAGE_COMMITTED_KEYS.increment(u64::try_from(n_keys).unwrap_or(u64::MAX));
        Ok(())
    }
}

/// Writes to apply atomically. A later write of a key replaces an earlier one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteBatch {
    entries: BTreeMap<StorageKey, StorageValue>,
}

impl WriteBatch {
    pub fn put(&mut self, key: StorageKey, value: StorageValue) {
        self.entries.insert(key, value);
    }

    pub fn get(&self, key: &[u8]) -> Option<&StorageValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Errors that may be returned when reading or writing the storage.
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("The storage lock was poisoned by a panicking thread.")]
    LockPoisoned,
}

pub type StorageResult<V> = std::result::Result<V, StorageError>;
