use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::core::Address;

#[cfg(test)]
#[path = "block_test.rs"]
mod block_test;

/// The byte length of a [`BlockId`].
pub const BLOCK_ID_LENGTH: usize = 32;

/// The height of a block in the chain. The genesis block has height 0.
#[derive(
    Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize, PartialOrd, Ord,
)]
pub struct BlockNumber(pub u64);

impl BlockNumber {
    /// Returns the next block number, without checking if it's in range.
    pub fn unchecked_next(&self) -> BlockNumber {
        BlockNumber(self.0 + 1)
    }

    /// Returns the next block number, or None if the next block number is out of range.
    pub fn next(&self) -> Option<Self> {
        Some(Self(self.0.checked_add(1)?))
    }

    /// Returns the block number `delta` heights below this one, stopping at the genesis height.
    pub fn saturating_sub(&self, delta: u64) -> BlockNumber {
        BlockNumber(self.0.saturating_sub(delta))
    }

    /// Returns an iterator over the block numbers from self to up_to (exclusive).
    pub fn iter_up_to(&self, up_to: Self) -> impl Iterator<Item = BlockNumber> {
        let range = self.0..up_to.0;
        range.map(Self)
    }

    /// Returns an iterator over the block numbers from self to through (inclusive).
    pub fn iter_through(&self, through: Self) -> impl Iterator<Item = BlockNumber> {
        let range = self.0..=through.0;
        range.map(Self)
    }
}

impl Display for BlockNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The content hash identifying a block.
///
/// Ids are ordered byte-lexicographically, which is the order used to break ties between
/// competing blocks.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Deserialize, Serialize)]
pub struct BlockId(pub [u8; BLOCK_ID_LENGTH]);

impl BlockId {
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; BLOCK_ID_LENGTH]> for BlockId {
    fn from(bytes: [u8; BLOCK_ID_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl Display for BlockId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Debug for BlockId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "BlockId({self})")
    }
}

/// The consensus payload carried by every block header.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct BftHeaderAsset {
    /// The height of the last block forged by the same generator, 0 if there is none.
    pub max_height_previously_forged: BlockNumber,
    /// The generator's view of the chain's prevoted height when it forged the block.
    pub max_height_prevoted: BlockNumber,
}

/// A block header as received from the block processor.
#[derive(Debug, Default, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct BlockHeader {
    pub height: BlockNumber,
    pub id: BlockId,
    pub previous_block_id: BlockId,
    pub generator_address: Address,
    /// Unix time (seconds) at which the block was forged.
    pub timestamp: u64,
    pub reward: u64,
    pub asset: BftHeaderAsset,
}

impl BlockHeader {
    pub fn max_height_previously_forged(&self) -> BlockNumber {
        self.asset.max_height_previously_forged
    }

    pub fn max_height_prevoted(&self) -> BlockNumber {
        self.asset.max_height_prevoted
    }
}
