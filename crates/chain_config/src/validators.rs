//! Utils for config validations.

use std::time::Duration;

use validator::{Validate, ValidationError, ValidationErrors};

/// Validates the configuration.
pub fn config_validate<T: Validate>(config_struct: &T) -> Result<(), ValidationErrors> {
    config_struct.validate()
}

/// Custom validation for a duration dumped as whole seconds: it must be at least one second.
pub fn validate_whole_seconds_duration(duration: &Duration) -> Result<(), ValidationError> {
    if duration.as_secs() == 0 {
        let mut error = ValidationError::new("sub_second_duration");
        error.message = Some("The duration must be at least one second.".into());
        return Err(error);
    }
    Ok(())
}
