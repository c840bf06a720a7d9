//! The stateful core of the finality gadget.
//!
//! The manager applies block headers to the [`VotingLedger`] of the block's state and derives from
//! it the finalized height and the chain's max height prevoted. It performs no locking; the block
//! processor applies headers one at a time.

use chain_api::block::{BlockHeader, BlockNumber};
use chain_state::block_header_cache::BlockHeaderCache;
use chain_state::state_store::{StateReader, StateStore};
use tracing::{debug, info, trace};

use crate::header_utils::are_headers_contradicting;
use crate::types::{BftError, BftResult, Validator, ValidatorRegistry};
use crate::votes_threshold::QuorumThreshold;
use crate::voting_ledger::VotingLedger;

#[cfg(test)]
#[path = "finality_manager_test.rs"]
mod finality_manager_test;

/// The state key of the finalized height marker.
pub const FINALIZED_HEIGHT_KEY: &[u8] = b"bft:finalizedHeight";

/// Reads the finalized height marker, `None` if it was never written.
pub fn load_finalized_height(state: &dyn StateReader) -> BftResult<Option<BlockNumber>> {
    match state.get(FINALIZED_HEIGHT_KEY)? {
        Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
        None => Ok(None),
    }
}

/// The finalized height and the max height prevoted are derived from the finality records of a
/// state. The manager keeps the values of the last state it read or wrote; every header is applied
/// against the records of its own store, so restoring a store snapshot rolls finality back with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FinalityManager {
    genesis_height: BlockNumber,
    finalized_height: BlockNumber,
    max_height_prevoted: BlockNumber,
    pre_vote_threshold: QuorumThreshold,
    pre_commit_threshold: QuorumThreshold,
    // The maximal height span a header may vote over.
    processing_threshold: u64,
    // The number of heights retained in the voting ledger.
    max_headers: u64,
}

impl FinalityManager {
    /// A manager for a state without finality records. The finalized height never drops below
    /// `genesis_height`.
    pub fn new(number_of_validators: u64, genesis_height: BlockNumber) -> BftResult<Self> {
        if number_of_validators == 0 {
            return Err(BftError::InvalidConfiguration(
                "The number of validators must be positive.".to_owned(),
            ));
        }
        let threshold = QuorumThreshold::new(number_of_validators);
        Ok(Self {
            genesis_height,
            finalized_height: genesis_height,
            max_height_prevoted: genesis_height,
            pre_vote_threshold: threshold,
            pre_commit_threshold: threshold,
            processing_threshold: number_of_validators.saturating_mul(3) - 1,
            max_headers: number_of_validators.saturating_mul(5),
        })
    }

    /// Restores a manager from the finality records of `state`.
    pub fn load(
        number_of_validators: u64,
        genesis_height: BlockNumber,
        state: &dyn StateReader,
    ) -> BftResult<Self> {
        let manager = Self::new(number_of_validators, genesis_height)?
            .synced(state, &VotingLedger::load(state)?)?;
        info!(
            "Loaded finality manager: finalized height {}, max height prevoted {}.",
            manager.finalized_height, manager.max_height_prevoted
        );
        Ok(manager)
    }

    /// The finalized height as of the last state the manager read or wrote.
    pub fn finalized_height(&self) -> BlockNumber {
        self.finalized_height
    }

    /// The chain's max height prevoted as of the last state the manager read or wrote.
    pub fn max_height_prevoted(&self) -> BlockNumber {
        self.max_height_prevoted
    }

    pub fn pre_vote_threshold(&self) -> QuorumThreshold {
        self.pre_vote_threshold
    }

    pub fn pre_commit_threshold(&self) -> QuorumThreshold {
        self.pre_commit_threshold
    }

    pub fn processing_threshold(&self) -> u64 {
        self.processing_threshold
    }

    /// The number of heights retained in the voting ledger. The block header cache should retain
    /// as many headers.
    pub fn max_headers(&self) -> u64 {
        self.max_headers
    }

    /// Applies `header` to the voting ledger of `store` and persists the new finalized height.
    /// Returns the finalized height if it advanced past the one recorded in `store`.
    ///
    /// On error neither the manager nor `store` is changed. The header is expected to be appended
    /// to the store's block header cache only after it was applied.
    pub fn add_block_header(
        &mut self,
        header: &BlockHeader,
        store: &mut StateStore,
        registry: &dyn ValidatorRegistry,
    ) -> BftResult<Option<BlockNumber>> {
        debug!("Adding block header {} at height {}.", header.id, header.height);
        let mut ledger = VotingLedger::load(&*store)?;
        // Updated on a copy, which replaces the manager once everything was written.
        let mut updated = self.synced(&*store, &ledger)?;
        updated.check_header(header, store.last_block_headers())?;

        let validators = registry.get_validators(&*store)?;
        updated.update_prevotes_precommits(
            header,
            &mut ledger,
            &validators,
            store.last_block_headers(),
        );

        let previous_finalized_height = updated.finalized_height;
        let advanced = updated.update_finalized_height(&ledger);
        ledger.prune(self.max_headers);
        let finalized_height_bytes =
            if advanced { Some(bincode::serialize(&updated.finalized_height)?) } else { None };
        ledger.save(store)?;
        if let Some(bytes) = finalized_height_bytes {
            store.set(FINALIZED_HEIGHT_KEY.to_vec(), bytes);
        }

        *self = updated;
        if !advanced {
            return Ok(None);
        }
        info!(
            "FINALIZED_HEIGHT_CHANGED: {previous_finalized_height} -> {} by header {} at height \
             {}.",
            self.finalized_height, header.id, header.height
        );
        Ok(Some(self.finalized_height))
    }

    /// Checks that `header` is consistent with the chain's prevoted height and with the previous
    /// header of its generator.
    pub fn verify_block_headers(&self, header: &BlockHeader, store: &StateStore) -> BftResult<()> {
        let ledger = VotingLedger::load(store)?;
        self.synced(store, &ledger)?.check_header(header, store.last_block_headers())
    }

    // Expects the manager to be synced with the state `headers` belong to.
    fn check_header(&self, header: &BlockHeader, headers: &BlockHeaderCache) -> BftResult<()> {
        // The header's claim can only be checked once enough history was accumulated.
        if u64::try_from(headers.len()).unwrap_or(u64::MAX) >= self.processing_threshold
            && header.max_height_prevoted() != self.max_height_prevoted
        {
            return Err(BftError::InvalidAttribute {
                id: header.id,
                expected: self.max_height_prevoted,
                found: header.max_height_prevoted(),
            });
        }

        let Some(previous_header) = headers.find_last_by_generator(&header.generator_address)
        else {
            return Ok(());
        };
        match are_headers_contradicting(previous_header, header) {
            Some(contradiction) => Err(contradiction.into()),
            None => Ok(()),
        }
    }

    /// Counts the votes of `header`: a prevote for every height it acknowledges and a precommit for
    /// every height below it that already has a prevote quorum. Returns whether any vote of the
    /// header could be counted.
    pub fn update_prevotes_precommits(
        &self,
        header: &BlockHeader,
        ledger: &mut VotingLedger,
        validators: &[Validator],
        headers: &BlockHeaderCache,
    ) -> bool {
        if header.max_height_previously_forged() >= header.height {
            debug!(
                "Header {} at height {} claims a previously forged height {}; not counted.",
                header.id,
                header.height,
                header.max_height_previously_forged()
            );
            return false;
        }
        let Some(validator) = validators
            .iter()
            .find(|validator| validator.address == header.generator_address)
            .filter(|validator| validator.is_consensus_participant)
        else {
            debug!(
                "Generator {} of header {} does not participate in consensus.",
                header.generator_address, header.id
            );
            return false;
        };

        let mut validator_state = ledger.validator_state(&header.generator_address);
        let lowest_processed_height = header.height.saturating_sub(self.processing_threshold);

        // A validator whose votes reached the last height has nothing left to vote for.
        if let Some(next_pre_commit_height) = validator_state.max_pre_commit_height.next() {
            let min_pre_commit_height = lowest_processed_height
                .max(validator.min_active_height)
                .max(self.min_valid_height_to_pre_commit(header, headers))
                .max(next_pre_commit_height);
            for height in min_pre_commit_height.iter_up_to(header.height) {
                if self.pre_vote_threshold.is_met(ledger.height_entry(height).prevotes) {
                    ledger.height_entry_mut(height).precommits += 1;
                    validator_state.max_pre_commit_height = height;
                }
            }
        }

        if let Some(next_pre_vote_height) = validator_state.max_pre_vote_height.next() {
            let min_pre_vote_height = validator
                .min_active_height
                .max(header.max_height_previously_forged().unchecked_next())
                .max(next_pre_vote_height)
                .max(lowest_processed_height);
            for height in min_pre_vote_height.iter_through(header.height) {
                ledger.height_entry_mut(height).prevotes += 1;
                validator_state.max_pre_vote_height = height;
            }
        }

        trace!(
            "Votes of {} after header {}: {validator_state:?}.",
            header.generator_address,
            header.id
        );
        ledger.set_validator_state(header.generator_address, validator_state);
        true
    }

    /// Raises the finalized height to the highest height with a precommit quorum, and derives the
    /// max height prevoted. Returns whether the finalized height advanced.
    pub fn update_finalized_height(&mut self, ledger: &VotingLedger) -> bool {
        let highest_precommitted = ledger
            .highest_height_where(|entry| self.pre_commit_threshold.is_met(entry.precommits));
        let advanced = match highest_precommitted {
            Some(height) if height > self.finalized_height => {
                self.finalized_height = height;
                true
            }
            _ => false,
        };
        self.max_height_prevoted = self.max_height_prevoted_of(ledger);
        advanced
    }

    /// Derives the chain's max height prevoted from the finality records of `state`.
    pub fn get_max_height_prevoted(&self, state: &dyn StateReader) -> BftResult<BlockNumber> {
        Ok(self.synced(state, &VotingLedger::load(state)?)?.max_height_prevoted)
    }

    // A copy of the manager reflecting the records of `state`, whose voting ledger is `ledger`.
    fn synced(&self, state: &dyn StateReader, ledger: &VotingLedger) -> BftResult<Self> {
        let mut synced = *self;
        synced.finalized_height =
            load_finalized_height(state)?.unwrap_or_default().max(self.genesis_height);
        synced.max_height_prevoted = synced.max_height_prevoted_of(ledger);
        Ok(synced)
    }

    fn max_height_prevoted_of(&self, ledger: &VotingLedger) -> BlockNumber {
        ledger
            .highest_height_where(|entry| self.pre_vote_threshold.is_met(entry.prevotes))
            .unwrap_or(self.finalized_height)
    }

    // Walks back the forging history of the header's generator within the processing window. The
    // generator may only precommit heights above the first point at which its history leaves the
    // chain, so it cannot be credited for a branch it abandoned.
    fn min_valid_height_to_pre_commit(
        &self,
        header: &BlockHeader,
        headers: &BlockHeaderCache,
    ) -> BlockNumber {
        let lowest_processed_height = header.height.saturating_sub(self.processing_threshold);
        let search_till_height = lowest_processed_height.max(BlockNumber(1));
        let mut needle_height = header.max_height_previously_forged().max(lowest_processed_height);
        let mut previous_block_height = header.max_height_previously_forged();

        while needle_height >= search_till_height {
            if needle_height == previous_block_height {
                let Some(previous_header) = headers.get(needle_height) else {
                    debug!(
                        "Could not find the referenced previous header at height {needle_height} \
                         of header {}; no height can be precommitted.",
                        header.id
                    );
                    return header.height;
                };
                if previous_header.generator_address != header.generator_address
                    || previous_header.max_height_previously_forged() >= needle_height
                {
                    return needle_height.unchecked_next();
                }
                previous_block_height = previous_header.max_height_previously_forged();
            }
            needle_height = needle_height.saturating_sub(1);
        }

        needle_height.unchecked_next().max(search_till_height)
    }
}
