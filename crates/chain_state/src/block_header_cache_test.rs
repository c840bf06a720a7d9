use chain_api::block::{BlockHeader, BlockNumber};
use chain_api::test_utils::{address, block_id};
use rstest::rstest;

use crate::block_header_cache::BlockHeaderCache;

fn header(height: u64, generator: u64) -> BlockHeader {
    BlockHeader {
        height: BlockNumber(height),
        id: block_id(height),
        generator_address: address(generator),
        ..Default::default()
    }
}

#[test]
fn evicts_lowest_height() {
    let mut cache = BlockHeaderCache::new(3);
    for height in 1..=5 {
        cache.insert(header(height, height));
    }

    assert_eq!(cache.len(), 3);
    assert_eq!(cache.get(BlockNumber(2)), None);
    assert_eq!(
        cache.iter_descending().map(|header| header.height.0).collect::<Vec<_>>(),
        vec![5, 4, 3]
    );
}

#[test]
fn insert_replaces_same_height() {
    let mut cache = BlockHeaderCache::new(3);
    cache.insert(header(1, 1));
    cache.insert(header(1, 2));

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(BlockNumber(1)).unwrap().generator_address, address(2));
}

#[rstest]
#[case::most_recent(1, Some(4))]
#[case::only_one(2, Some(2))]
#[case::absent(7, None)]
fn find_last_by_generator(#[case] generator: u64, #[case] expected_height: Option<u64>) {
    let mut cache = BlockHeaderCache::new(10);
    cache.insert(header(1, 1));
    cache.insert(header(2, 2));
    cache.insert(header(3, 3));
    cache.insert(header(4, 1));

    assert_eq!(
        cache.find_last_by_generator(&address(generator)).map(|header| header.height.0),
        expected_height
    );
}
