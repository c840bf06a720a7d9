use std::time::Duration;

use chain_api::block::{BftHeaderAsset, BlockHeader, BlockNumber};
use chain_api::test_utils::{address, block_id};
use chain_bft_config::config::{BftConfig, SlotsConfig};
use chain_state::block_header_cache::BlockHeaderCache;
use chain_state::state_store::StateStore;
use chain_state::{open_storage, StorageReader, StorageWriter};
use lazy_static::lazy_static;

use crate::types::Validator;
use crate::validator_registry::StaticValidatorRegistry;

pub const NUMBER_OF_VALIDATORS: u64 = 4;
pub const BLOCK_TIME: u64 = 10;

lazy_static! {
    /// Four consensus participants, active from genesis. The generator index `i` of `bft_header!`
    /// is `VALIDATORS[i - 1]`.
    pub static ref VALIDATORS: Vec<Validator> = (1..=NUMBER_OF_VALIDATORS)
        .map(|i| Validator {
            address: address(i),
            is_consensus_participant: true,
            min_active_height: BlockNumber(0),
        })
        .collect();
    pub static ref TEST_CONFIG: BftConfig = BftConfig {
        number_of_validators: NUMBER_OF_VALIDATORS,
        genesis_height: BlockNumber(0),
        slots: SlotsConfig { genesis_timestamp: 0, block_time: Duration::from_secs(BLOCK_TIME) },
    };
}

/// Builds a header for tests. Generators and ids are indices, see [`address`] and [`block_id`].
///
/// Defaults: `mhpf` and `mhp` are 0, `id` is the height, and the previous block id is the height
/// below it. The timestamp is the start of the slot of the same number as the height.
#[macro_export]
macro_rules! bft_header {
    (height: $height:expr, generator: $generator:expr) => {
        $crate::bft_header!(height: $height, generator: $generator, mhpf: 0, mhp: 0)
    };
    (height: $height:expr, generator: $generator:expr, mhpf: $mhpf:expr) => {
        $crate::bft_header!(height: $height, generator: $generator, mhpf: $mhpf, mhp: 0)
    };
    (height: $height:expr, generator: $generator:expr, mhpf: $mhpf:expr, mhp: $mhp:expr) => {
        $crate::bft_header!(
            height: $height, generator: $generator, mhpf: $mhpf, mhp: $mhp, id: $height
        )
    };
    (height: $height:expr, generator: $generator:expr, mhpf: $mhpf:expr, mhp: $mhp:expr,
        id: $id:expr) => {
        $crate::bft_header!(
            height: $height,
            generator: $generator,
            mhpf: $mhpf,
            mhp: $mhp,
            id: $id,
            previous_id: u64::saturating_sub($height, 1)
        )
    };
    (height: $height:expr, generator: $generator:expr, mhpf: $mhpf:expr, mhp: $mhp:expr,
        id: $id:expr, previous_id: $previous_id:expr) => {
        $crate::test_utils::header($height, $generator, $mhpf, $mhp, $id, $previous_id)
    };
}

pub fn header(
    height: u64,
    generator: u64,
    max_height_previously_forged: u64,
    max_height_prevoted: u64,
    id: u64,
    previous_id: u64,
) -> BlockHeader {
    BlockHeader {
        height: BlockNumber(height),
        id: block_id(id),
        previous_block_id: block_id(previous_id),
        generator_address: address(generator),
        timestamp: height.saturating_mul(BLOCK_TIME),
        reward: 500,
        asset: BftHeaderAsset {
            max_height_previously_forged: BlockNumber(max_height_previously_forged),
            max_height_prevoted: BlockNumber(max_height_prevoted),
        },
    }
}

/// The generator index of `height` when `VALIDATORS` forge in turns, starting with the first.
pub fn round_robin_generator(height: u64) -> u64 {
    (height - 1) % NUMBER_OF_VALIDATORS + 1
}

/// The height of the previous turn of the generator of `height`, 0 during the first round.
pub fn round_robin_previously_forged(height: u64) -> u64 {
    height.saturating_sub(NUMBER_OF_VALIDATORS)
}

pub fn test_registry() -> StaticValidatorRegistry {
    StaticValidatorRegistry::new(VALIDATORS.clone())
}

/// A fresh storage with a state store for the next block.
pub fn test_storage() -> (StorageReader, StorageWriter, StateStore) {
    let (reader, writer) = open_storage();
    let store = StateStore::new(
        reader.clone(),
        BlockHeaderCache::new(usize::try_from(NUMBER_OF_VALIDATORS * 5).unwrap()),
    );
    (reader, writer, store)
}
