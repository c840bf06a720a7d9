//! Types for interfacing between the finality gadget and the rest of the node.

use chain_api::block::{BlockId, BlockNumber};
use chain_api::core::Address;
use chain_state::state_store::StateReader;
use chain_state::StorageError;
use serde::{Deserialize, Serialize};

/// A member of the active validator set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    /// The address blocks forged by this validator are attributed to.
    pub address: Address,
    /// Blocks of validators that do not participate in consensus are never counted as votes.
    pub is_consensus_participant: bool,
    /// The first height from which this validator's votes count.
    pub min_active_height: BlockNumber,
}

/// Provides the active validator set of a point-in-time state.
pub trait ValidatorRegistry {
    /// Returns the active validators in `state`.
    fn get_validators(&self, state: &dyn StateReader) -> BftResult<Vec<Validator>>;
}

/// Receives a notification whenever the finalized height advances.
#[cfg_attr(test, mockall::automock)]
pub trait FinalityObserver: Send {
    /// Called after the new finalized height was written to the block's state store.
    fn on_finalized_height_changed(&mut self, finalized_height: BlockNumber);
}

/// The reasons a header may be rejected by the finality gadget.
#[derive(thiserror::Error, Debug)]
pub enum BftError {
    /// The gadget cannot be constructed with the given parameters.
    #[error("Invalid BFT configuration: {0}")]
    InvalidConfiguration(String),
    /// The header's claim about the chain's max height prevoted disagrees with the local ledger.
    #[error("Header {id} has max height prevoted {found}, expected {expected}.")]
    InvalidAttribute {
        id: BlockId,
        expected: BlockNumber,
        found: BlockNumber,
    },
    /// The generator forged two blocks without moving to a chain with a higher prevoted height.
    #[error("Generator {generator} forged {later} without switching chains after {earlier}.")]
    ForkChoiceRuleViolation {
        generator: Address,
        earlier: BlockId,
        later: BlockId,
    },
    /// The later header does not acknowledge the earlier header of the same generator.
    #[error("Generator {generator} forged {later} on a chain disjoint from {earlier}.")]
    ChainDisjoint {
        generator: Address,
        earlier: BlockId,
        later: BlockId,
    },
    /// The later header moved to a chain with a lower prevoted height.
    #[error("Generator {generator} forged {later} on a lower chain branch than {earlier}.")]
    LowerChainBranch {
        generator: Address,
        earlier: BlockId,
        later: BlockId,
    },
    #[error(transparent)]
    StorageError(#[from] StorageError),
    /// A persisted record of the gadget could not be encoded or decoded.
    #[error(transparent)]
    VotingLedgerDecodeError(#[from] bincode::Error),
    /// The active validator set could not be resolved.
    #[error("Validator registry error: {0}")]
    ValidatorRegistry(String),
}

/// The result type of the finality gadget.
pub type BftResult<T> = Result<T, BftError>;
