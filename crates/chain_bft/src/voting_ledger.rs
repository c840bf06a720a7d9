//! The persisted vote tallies of the finality gadget.
//!
//! The ledger holds, for every retained height, the number of prevotes and precommits it
//! gathered, and for every validator the highest heights it prevoted and precommitted. It is the
//! only state the gadget persists besides the finalized height marker, and it is stored under
//! [`VOTING_LEDGER_KEY`] as two ordered collections.

use std::collections::BTreeMap;

use chain_api::block::BlockNumber;
use chain_api::core::Address;
use chain_state::state_store::{StateReader, StateStore};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::types::BftResult;

#[cfg(test)]
#[path = "voting_ledger_test.rs"]
mod voting_ledger_test;

/// The state key of the encoded [`VotingLedger`].
pub const VOTING_LEDGER_KEY: &[u8] = b"bft:votingLedger";

/// The vote tallies of a single height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightLedgerEntry {
    pub prevotes: u64,
    pub precommits: u64,
}

/// The voting progress of a single validator. Both heights never decrease.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorVoteState {
    pub max_pre_vote_height: BlockNumber,
    pub max_pre_commit_height: BlockNumber,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingLedger {
    validators: BTreeMap<Address, ValidatorVoteState>,
    ledger: BTreeMap<BlockNumber, HeightLedgerEntry>,
}

impl VotingLedger {
    /// Reads the ledger from `state`. A state without a ledger yields an empty one.
    pub fn load(state: &dyn StateReader) -> BftResult<Self> {
        match state.get(VOTING_LEDGER_KEY)? {
            Some(bytes) => Self::decode(&bytes),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, store: &mut StateStore) -> BftResult<()> {
        let bytes = self.encode()?;
        trace!("Saving a voting ledger of {} heights ({} bytes).", self.ledger.len(), bytes.len());
        store.set(VOTING_LEDGER_KEY.to_vec(), bytes);
        Ok(())
    }

    pub fn encode(&self) -> BftResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> BftResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// The vote state of `address`, zero for a validator that never voted.
    pub fn validator_state(&self, address: &Address) -> ValidatorVoteState {
        self.validators.get(address).copied().unwrap_or_default()
    }

    pub fn set_validator_state(&mut self, address: Address, state: ValidatorVoteState) {
        self.validators.insert(address, state);
    }

    /// The tallies of `height`, zero for a height no vote referenced.
    pub fn height_entry(&self, height: BlockNumber) -> HeightLedgerEntry {
        self.ledger.get(&height).copied().unwrap_or_default()
    }

    pub fn height_entry_mut(&mut self, height: BlockNumber) -> &mut HeightLedgerEntry {
        self.ledger.entry(height).or_default()
    }

    /// The highest height whose entry satisfies `predicate`.
    pub fn highest_height_where(
        &self,
        predicate: impl Fn(&HeightLedgerEntry) -> bool,
    ) -> Option<BlockNumber> {
        self.ledger.iter().rev().find(|(_, entry)| predicate(entry)).map(|(height, _)| *height)
    }

    pub fn highest_height(&self) -> Option<BlockNumber> {
        self.ledger.last_key_value().map(|(height, _)| *height)
    }

    /// Keeps only the `max_heights` highest heights of the ledger.
    pub fn prune(&mut self, max_heights: u64) {
        let Some(highest) = self.highest_height() else {
            return;
        };
        // Heights up to `highest - max_heights` are dropped.
        let Some(first_retained) = highest.0.checked_sub(max_heights).map(|h| BlockNumber(h + 1))
        else {
            return;
        };
        self.ledger = self.ledger.split_off(&first_retained);
    }

    pub fn heights(&self) -> impl Iterator<Item = (BlockNumber, &HeightLedgerEntry)> {
        self.ledger.iter().map(|(height, entry)| (*height, entry))
    }

    pub fn len(&self) -> usize {
        self.ledger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }
}
