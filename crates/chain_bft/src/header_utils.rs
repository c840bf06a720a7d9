//! Detection of contradicting headers forged by the same validator.

use chain_api::block::{BlockHeader, BlockId};
use chain_api::core::Address;

use crate::types::BftError;

#[cfg(test)]
#[path = "header_utils_test.rs"]
mod header_utils_test;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContradictionKind {
    /// Both headers claim the same prevoted height, but the later one does not extend the earlier.
    ForkChoiceRuleViolation,
    /// The later header skips the earlier one in its forging history.
    ChainDisjoint,
    /// The later header claims a lower prevoted height.
    LowerChainBranch,
}

/// Two headers of `generator` that cannot both belong to an honest forging history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contradiction {
    pub kind: ContradictionKind,
    pub generator: Address,
    pub earlier: BlockId,
    pub later: BlockId,
}

impl From<Contradiction> for BftError {
    fn from(contradiction: Contradiction) -> Self {
        let Contradiction { kind, generator, earlier, later } = contradiction;
        match kind {
            ContradictionKind::ForkChoiceRuleViolation => {
                BftError::ForkChoiceRuleViolation { generator, earlier, later }
            }
            ContradictionKind::ChainDisjoint => {
                BftError::ChainDisjoint { generator, earlier, later }
            }
            ContradictionKind::LowerChainBranch => {
                BftError::LowerChainBranch { generator, earlier, later }
            }
        }
    }
}

/// Checks whether two headers forged by the same generator contradict each other.
///
/// Headers of different generators never contradict, and neither does a header with itself.
pub fn are_headers_contradicting(a: &BlockHeader, b: &BlockHeader) -> Option<Contradiction> {
    if a.generator_address != b.generator_address || a.id == b.id {
        return None;
    }

    let (earlier, later) = if forged_after(a, b) { (b, a) } else { (a, b) };
    let kind = if earlier.max_height_prevoted() == later.max_height_prevoted()
        && earlier.height >= later.height
    {
        ContradictionKind::ForkChoiceRuleViolation
    } else if earlier.height > later.max_height_previously_forged() {
        ContradictionKind::ChainDisjoint
    } else if earlier.max_height_prevoted() > later.max_height_prevoted() {
        ContradictionKind::LowerChainBranch
    } else {
        return None;
    };

    Some(Contradiction {
        kind,
        generator: a.generator_address,
        earlier: earlier.id,
        later: later.id,
    })
}

// The forging order of two headers of the same generator. Ids only break exact ties.
fn forged_after(a: &BlockHeader, b: &BlockHeader) -> bool {
    (a.max_height_previously_forged(), a.max_height_prevoted(), a.height, a.id)
        > (b.max_height_previously_forged(), b.max_height_prevoted(), b.height, b.id)
}
