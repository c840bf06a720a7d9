//! The finality gadget as seen by the block processor.
//!
//! For every received block the processor runs [`Bft::fork_choice`] against its tip. Blocks that
//! are accepted are checked with [`Bft::verify_block_header`] and then applied with
//! [`Bft::apply_block_header`] to the state store of the block being processed. Committing that
//! store persists the voting ledger and the finalized height together with the rest of the block's
//! state.

use chain_api::block::{BlockHeader, BlockNumber};
use chain_bft_config::config::BftConfig;
use chain_state::block_header_cache::BlockHeaderCache;
use chain_state::state_store::{StateReader, StateStore};
use tracing::{debug, info, warn};

use crate::finality_manager::FinalityManager;
use crate::fork_choice::{fork_choice, ForkStatus};
use crate::metrics::{
    register_metrics,
    BFT_DOUBLE_FORGING_DETECTED,
    BFT_FINALIZED_HEIGHT,
    BFT_FINALIZED_HEIGHT_CHANGES,
    BFT_HEADERS_APPLIED,
    BFT_HEADERS_REJECTED,
    BFT_MAX_HEIGHT_PREVOTED,
};
use crate::slots::{SlotContext, Slots};
use crate::types::{BftResult, FinalityObserver, ValidatorRegistry};

#[cfg(test)]
#[path = "bft_test.rs"]
mod bft_test;

pub struct Bft<R> {
    config: BftConfig,
    registry: R,
    finality_manager: FinalityManager,
    slots: Slots,
    observers: Vec<Box<dyn FinalityObserver>>,
}

impl<R: ValidatorRegistry> Bft<R> {
    /// Builds the gadget from the last committed state of the chain.
    pub fn init(config: BftConfig, registry: R, state: &dyn StateReader) -> BftResult<Self> {
        register_metrics();
        let finality_manager =
            FinalityManager::load(config.number_of_validators, config.genesis_height, state)?;
        let slots = Slots::from_config(&config.slots)?;
        let bft = Self { config, registry, finality_manager, slots, observers: Vec::new() };
        bft.update_gauges();
        Ok(bft)
    }

    pub fn config(&self) -> &BftConfig {
        &self.config
    }

    pub fn finality_manager(&self) -> &FinalityManager {
        &self.finality_manager
    }

    pub fn finalized_height(&self) -> BlockNumber {
        self.finality_manager.finalized_height()
    }

    pub fn max_height_prevoted(&self) -> BlockNumber {
        self.finality_manager.max_height_prevoted()
    }

    /// Registers an observer notified whenever an applied header advances the finalized height.
    pub fn subscribe(&mut self, observer: Box<dyn FinalityObserver>) {
        self.observers.push(observer);
    }

    /// An empty header cache retaining as many headers as the voting ledger retains heights.
    pub fn new_block_header_cache(&self) -> BlockHeaderCache {
        BlockHeaderCache::new(
            usize::try_from(self.finality_manager.max_headers()).unwrap_or(usize::MAX),
        )
    }

    /// Classifies a block received at `received_at` (Unix seconds) against the current tip.
    pub fn fork_choice(
        &self,
        candidate: &BlockHeader,
        tip: &BlockHeader,
        received_at: u64,
    ) -> ForkStatus {
        let status = fork_choice(candidate, tip, &SlotContext { slots: self.slots, received_at });
        if status == ForkStatus::DoubleForging {
            BFT_DOUBLE_FORGING_DETECTED.increment(1);
            warn!(
                "DOUBLE_FORGING: generator {} forged {} and {} at height {}.",
                candidate.generator_address, tip.id, candidate.id, candidate.height
            );
        } else {
            debug!("Fork choice of block {} against tip {}: {status:?}.", candidate.id, tip.id);
        }
        status
    }

    pub fn verify_block_header(&self, header: &BlockHeader, store: &StateStore) -> BftResult<()> {
        self.finality_manager.verify_block_headers(header, store)
    }

    /// Applies `header` to the voting ledger in `store` and appends it to the store's header
    /// cache. Returns the finalized height if it advanced.
    ///
    /// A rejected header leaves `store` as it was before the call.
    pub fn apply_block_header(
        &mut self,
        header: &BlockHeader,
        store: &mut StateStore,
    ) -> BftResult<Option<BlockNumber>> {
        let snapshot = store.create_snapshot();
        let finalized_height =
            match self.finality_manager.add_block_header(header, store, &self.registry) {
                Ok(finalized_height) => finalized_height,
                Err(err) => {
                    store.restore_snapshot(snapshot);
                    BFT_HEADERS_REJECTED.increment(1);
                    warn!("Rejected block header {} at height {}: {err}", header.id, header.height);
                    return Err(err);
                }
            };
        store.append_block_header(header.clone());

        BFT_HEADERS_APPLIED.increment(1);
        self.update_gauges();
        if let Some(finalized_height) = finalized_height {
            BFT_FINALIZED_HEIGHT_CHANGES.increment(1);
            for observer in &mut self.observers {
                observer.on_finalized_height_changed(finalized_height);
            }
        }
        Ok(finalized_height)
    }

    pub fn get_max_height_prevoted(&self, state: &dyn StateReader) -> BftResult<BlockNumber> {
        self.finality_manager.get_max_height_prevoted(state)
    }

    /// Whether the generator of `header` acknowledged its own previous block in the retained
    /// window. A generator without a block in the window must claim no previous block.
    pub fn is_protocol_compliant(&self, header: &BlockHeader, store: &StateStore) -> bool {
        let previously_forged = header.max_height_previously_forged();
        if previously_forged >= header.height {
            return false;
        }
        let headers = store.last_block_headers();
        if previously_forged == BlockNumber(0) {
            return headers.find_last_by_generator(&header.generator_address).is_none();
        }
        headers
            .get(previously_forged)
            .is_some_and(|previous| previous.generator_address == header.generator_address)
    }

    /// The reward of the block of `header`, halved if the header is not protocol compliant.
    pub fn block_reward(&self, header: &BlockHeader, store: &StateStore) -> u64 {
        if self.is_protocol_compliant(header, store) {
            return header.reward;
        }
        debug!(
            "Block {} at height {} is not protocol compliant; halving its reward.",
            header.id, header.height
        );
        header.reward / 2
    }

    /// Refreshes the reported heights from `state`, after the processor reverted blocks. Headers
    /// are always applied against the finality records of their own store, so this only affects
    /// the accessors and gauges until the next header is applied.
    pub fn reload_finalized_height(&mut self, state: &dyn StateReader) -> BftResult<()> {
        let previous_finalized_height = self.finalized_height();
        self.finality_manager = FinalityManager::load(
            self.config.number_of_validators,
            self.config.genesis_height,
            state,
        )?;
        self.update_gauges();
        info!(
            "Reloaded finalized height: {previous_finalized_height} -> {}.",
            self.finalized_height()
        );
        Ok(())
    }

    fn update_gauges(&self) {
        BFT_FINALIZED_HEIGHT.set_lossy(self.finalized_height().0);
        BFT_MAX_HEIGHT_PREVOTED.set_lossy(self.max_height_prevoted().0);
    }
}
