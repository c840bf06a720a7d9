use chain_api::block::{BlockHeader, BlockNumber};
use chain_api::test_utils::block_id;
use rstest::{fixture, rstest};

use crate::block_header_cache::BlockHeaderCache;
use crate::state_store::{StateReader, StateStore};
use crate::{open_storage, StorageReader, StorageWriter, WriteBatch};

#[fixture]
fn storage() -> (StorageReader, StorageWriter) {
    let (reader, mut writer) = open_storage();
    let mut batch = WriteBatch::default();
    batch.put(b"committed".to_vec(), b"old".to_vec());
    writer.commit(batch).unwrap();
    (reader, writer)
}

fn header(height: u64) -> BlockHeader {
    BlockHeader { height: BlockNumber(height), id: block_id(height), ..Default::default() }
}

#[rstest]
fn pending_writes_shadow_storage(storage: (StorageReader, StorageWriter)) {
    let (reader, _writer) = storage;
    let mut store = StateStore::new(reader.clone(), BlockHeaderCache::new(5));
    assert_eq!(store.get(b"committed").unwrap(), Some(b"old".to_vec()));

    store.set(b"committed".to_vec(), b"new".to_vec());
    store.set(b"fresh".to_vec(), b"value".to_vec());
    assert_eq!(store.get(b"committed").unwrap(), Some(b"new".to_vec()));
    assert_eq!(store.get(b"fresh").unwrap(), Some(b"value".to_vec()));

    // Nothing reaches the storage before commit.
    assert_eq!(reader.get(b"committed").unwrap(), Some(b"old".to_vec()));
    assert_eq!(reader.get(b"fresh").unwrap(), None);
}

#[rstest]
fn restore_snapshot_drops_later_changes(storage: (StorageReader, StorageWriter)) {
    let (reader, _writer) = storage;
    let mut store = StateStore::new(reader, BlockHeaderCache::new(5));
    store.set(b"a".to_vec(), b"1".to_vec());
    store.append_block_header(header(1));

    let snapshot = store.create_snapshot();
    store.set(b"a".to_vec(), b"2".to_vec());
    store.set(b"committed".to_vec(), b"new".to_vec());
    store.append_block_header(header(2));

    store.restore_snapshot(snapshot);
    assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));
    assert_eq!(store.get(b"committed").unwrap(), Some(b"old".to_vec()));
    assert_eq!(store.last_block_headers().len(), 1);
    assert!(store.last_block_headers().get(BlockNumber(2)).is_none());
}

#[rstest]
fn finalize_and_commit(storage: (StorageReader, StorageWriter)) {
    let (reader, mut writer) = storage;
    let mut store = StateStore::new(reader.clone(), BlockHeaderCache::new(5));
    store.set(b"fresh".to_vec(), b"value".to_vec());
    store.set(b"committed".to_vec(), b"new".to_vec());
    store.append_block_header(header(7));

    let (batch, headers) = store.finalize();
    assert_eq!(batch.len(), 2);
    assert_eq!(headers.get(BlockNumber(7)).map(|header| header.id), Some(block_id(7)));

    writer.commit(batch).unwrap();
    assert_eq!(reader.get(b"fresh").unwrap(), Some(b"value".to_vec()));
    assert_eq!(reader.get(b"committed").unwrap(), Some(b"new".to_vec()));
}
