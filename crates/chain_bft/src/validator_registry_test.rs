use assert_matches::assert_matches;
use chain_api::block::BlockNumber;
use chain_api::test_utils::address;

use crate::test_utils::{test_registry, test_storage, VALIDATORS};
use crate::types::{BftError, Validator, ValidatorRegistry};
use crate::validator_registry::StateValidatorRegistry;

#[test]
fn state_registry_reads_written_set() {
    let (_reader, _writer, mut store) = test_storage();
    let mut validators = VALIDATORS.clone();
    validators.push(Validator {
        address: address(9),
        is_consensus_participant: false,
        min_active_height: BlockNumber(20),
    });

    StateValidatorRegistry::set_validators(&mut store, &validators).unwrap();
    assert_eq!(StateValidatorRegistry.get_validators(&store).unwrap(), validators);
}

#[test]
fn state_registry_without_validators() {
    let (_reader, _writer, store) = test_storage();
    assert_matches!(
        StateValidatorRegistry.get_validators(&store),
        Err(BftError::ValidatorRegistry(_))
    );
}

#[test]
fn static_registry_ignores_state() {
    let (_reader, _writer, store) = test_storage();
    assert_eq!(test_registry().get_validators(&store).unwrap(), *VALIDATORS);
}
