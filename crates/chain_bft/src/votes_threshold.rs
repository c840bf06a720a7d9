use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "votes_threshold_test.rs"]
mod votes_threshold_test;

/// The number of votes out of the active validators required to meet a quorum, `ceil(2n / 3)`.
/// Unlike a strict majority threshold, a vote count exactly equal to the quorum size meets it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumThreshold {
    votes: u64,
}

impl QuorumThreshold {
    pub fn new(number_of_validators: u64) -> Self {
        Self { votes: number_of_validators.saturating_mul(2).saturating_add(2) / 3 }
    }

    pub fn votes(&self) -> u64 {
        self.votes
    }

    pub fn is_met(&self, amount: u64) -> bool {
        amount >= self.votes
    }
}
