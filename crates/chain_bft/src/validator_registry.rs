//! Sources of the active validator set.

use chain_state::state_store::{StateReader, StateStore};

use crate::types::{BftError, BftResult, Validator, ValidatorRegistry};

#[cfg(test)]
#[path = "validator_registry_test.rs"]
mod validator_registry_test;

/// The state key of the encoded active validator set.
pub const VALIDATORS_KEY: &[u8] = b"bft:validators";

/// Reads the active validators written to the state by the validator set rotation.
#[derive(Clone, Copy, Debug, Default)]
pub struct StateValidatorRegistry;

impl StateValidatorRegistry {
    /// Writes the active validator set to the block's state.
    pub fn set_validators(store: &mut StateStore, validators: &[Validator]) -> BftResult<()> {
        store.set(VALIDATORS_KEY.to_vec(), bincode::serialize(validators)?);
        Ok(())
    }
}

impl ValidatorRegistry for StateValidatorRegistry {
    fn get_validators(&self, state: &dyn StateReader) -> BftResult<Vec<Validator>> {
        let bytes = state.get(VALIDATORS_KEY)?.ok_or_else(|| {
            BftError::ValidatorRegistry("No active validator set in the state.".to_owned())
        })?;
        Ok(bincode::deserialize(&bytes)?)
    }
}

/// A fixed validator set, e.g. for a chain without validator rotation.
#[derive(Clone, Debug, Default)]
pub struct StaticValidatorRegistry {
    validators: Vec<Validator>,
}

impl StaticValidatorRegistry {
    pub fn new(validators: Vec<Validator>) -> Self {
        Self { validators }
    }
}

impl ValidatorRegistry for StaticValidatorRegistry {
    fn get_validators(&self, _state: &dyn StateReader) -> BftResult<Vec<Validator>> {
        Ok(self.validators.clone())
    }
}
