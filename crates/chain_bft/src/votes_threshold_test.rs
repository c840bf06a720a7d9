use test_case::test_case;

use crate::votes_threshold::QuorumThreshold;

#[test_case(1, 1; "single validator")]
#[test_case(2, 2; "two validators")]
#[test_case(3, 2; "three validators")]
#[test_case(4, 3; "four validators")]
#[test_case(100, 67; "hundred validators")]
#[test_case(101, 68; "hundred and one validators")]
fn quorum_size(number_of_validators: u64, expected_votes: u64) {
    assert_eq!(QuorumThreshold::new(number_of_validators).votes(), expected_votes);
}

#[test]
fn quorum_is_met() {
    let threshold = QuorumThreshold::new(4);
    assert!(threshold.is_met(3)); // 3 out of 4 votes
    assert!(threshold.is_met(4)); // All votes in favor

    assert!(!threshold.is_met(2)); // 2 out of 4 votes
    assert!(!threshold.is_met(0));
}
