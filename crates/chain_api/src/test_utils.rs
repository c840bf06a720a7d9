use crate::block::{BlockId, BLOCK_ID_LENGTH};
use crate::core::{Address, ADDRESS_LENGTH};

/// Returns a block id whose byte order matches the numeric order of `n`.
pub fn block_id(n: u64) -> BlockId {
    let mut bytes = [0u8; BLOCK_ID_LENGTH];
    bytes[BLOCK_ID_LENGTH - 8..].copy_from_slice(&n.to_be_bytes());
    BlockId(bytes)
}

/// Returns a deterministic address for the `n`-th test account.
pub fn address(n: u64) -> Address {
    let mut bytes = [0u8; ADDRESS_LENGTH];
    bytes[ADDRESS_LENGTH - 8..].copy_from_slice(&n.to_be_bytes());
    Address(bytes)
}
