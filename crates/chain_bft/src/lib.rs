//! A BFT finality gadget for a chain forged by a rotating set of validators.
//!
//! Every block header implicitly votes for the chain it extends. A header prevotes every height
//! between its generator's previously forged block and itself, and precommits the heights below
//! it that already gathered a prevote quorum. A height with a precommit quorum is final.
//!
//! The [`bft::Bft`] facade is the entry point of the block processor: it runs the
//! [`fork_choice`](fork_choice::fork_choice) rule on every received block, and verifies and
//! applies the headers of accepted blocks to the [`finality_manager::FinalityManager`]. The votes
//! are tallied in a [`voting_ledger::VotingLedger`] persisted in the chain state.

pub mod bft;
pub mod finality_manager;
pub mod fork_choice;
pub mod header_utils;
pub mod metrics;
pub mod slots;
#[cfg(any(feature = "testing", test))]
pub mod test_utils;
pub mod types;
pub mod validator_registry;
pub mod votes_threshold;
pub mod voting_ledger;
