//! Forging slot arithmetic.
//!
//! Slot `n` spans `[genesis + n * block_time, genesis + (n + 1) * block_time)`.

use std::time::Duration;

use chain_bft_config::config::SlotsConfig;

use crate::types::{BftError, BftResult};

#[cfg(test)]
#[path = "slots_test.rs"]
mod slots_test;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slots {
    genesis_timestamp: u64,
    // Seconds, never zero.
    block_time: u64,
}

impl Slots {
    pub fn new(genesis_timestamp: u64, block_time: Duration) -> BftResult<Self> {
        let block_time = block_time.as_secs();
        if block_time == 0 {
            return Err(BftError::InvalidConfiguration(
                "Block time must be at least one second.".to_owned(),
            ));
        }
        Ok(Self { genesis_timestamp, block_time })
    }

    pub fn from_config(config: &SlotsConfig) -> BftResult<Self> {
        Self::new(config.genesis_timestamp, config.block_time)
    }

    /// The slot containing `timestamp`. Times before genesis belong to slot 0.
    pub fn slot_number(&self, timestamp: u64) -> u64 {
        timestamp.saturating_sub(self.genesis_timestamp) / self.block_time
    }

    pub fn slot_start(&self, slot: u64) -> u64 {
        self.genesis_timestamp.saturating_add(slot.saturating_mul(self.block_time))
    }

    pub fn is_within_timeslot(&self, slot: u64, time: u64) -> bool {
        time >= self.genesis_timestamp && self.slot_number(time) == slot
    }
}

/// The local view of time a received block is judged against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotContext {
    pub slots: Slots,
    /// Unix time (seconds) at which the candidate block was received.
    pub received_at: u64,
}
