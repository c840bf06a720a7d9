//! The fork choice rule: how a received block relates to the current tip of the chain.

use chain_api::block::BlockHeader;

use crate::slots::SlotContext;

#[cfg(test)]
#[path = "fork_choice_test.rs"]
mod fork_choice_test;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForkStatus {
    /// The block extends the tip.
    ValidBlock,
    /// The block is the tip.
    IdenticalBlock,
    /// The tip's generator forged another block at the same height.
    DoubleForging,
    /// A competing block at the tip's height wins the tie; the tip should be replaced by it.
    TieBreak,
    /// The block belongs to a chain with more finality weight; sync to it.
    DifferentChain,
    Discard,
}

/// Classifies `candidate` against the current `tip`. The first matching status in declaration
/// order of [`ForkStatus`] is returned.
pub fn fork_choice(
    candidate: &BlockHeader,
    tip: &BlockHeader,
    context: &SlotContext,
) -> ForkStatus {
    if is_valid_block(candidate, tip) {
        ForkStatus::ValidBlock
    } else if candidate.id == tip.id {
        ForkStatus::IdenticalBlock
    } else if is_double_forging(candidate, tip) {
        ForkStatus::DoubleForging
    } else if is_tie_break(candidate, tip, context) {
        ForkStatus::TieBreak
    } else if is_different_chain(candidate, tip) {
        ForkStatus::DifferentChain
    } else {
        ForkStatus::Discard
    }
}

fn is_valid_block(candidate: &BlockHeader, tip: &BlockHeader) -> bool {
    candidate.previous_block_id == tip.id && tip.height.next() == Some(candidate.height)
}

fn is_double_forging(candidate: &BlockHeader, tip: &BlockHeader) -> bool {
    candidate.height == tip.height && candidate.generator_address == tip.generator_address
}

// Two different blocks on the same parent with the same finality weight. The smaller id wins,
// but only if the candidate was received while its own slot was still running.
fn is_tie_break(candidate: &BlockHeader, tip: &BlockHeader, context: &SlotContext) -> bool {
    let candidate_slot = context.slots.slot_number(candidate.timestamp);
    candidate.height == tip.height
        && candidate.previous_block_id == tip.previous_block_id
        && candidate.max_height_prevoted() == tip.max_height_prevoted()
        && candidate.generator_address != tip.generator_address
        && context.slots.is_within_timeslot(candidate_slot, context.received_at)
        && candidate.id < tip.id
}

fn is_different_chain(candidate: &BlockHeader, tip: &BlockHeader) -> bool {
    (candidate.max_height_prevoted(), candidate.height) > (tip.max_height_prevoted(), tip.height)
}
