use std::time::Duration;

use assert_matches::assert_matches;
use chain_api::block::BlockNumber;
use chain_config::dumping::SerializeConfig;
use chain_config::loading::{config_map_from_dump, load_and_validate, update_config_map};
use chain_config::ConfigError;
use serde_json::json;
use validator::Validate;

use crate::config::{BftConfig, SlotsConfig};

fn config() -> BftConfig {
    BftConfig {
        number_of_validators: 4,
        genesis_height: BlockNumber(12),
        slots: SlotsConfig { genesis_timestamp: 1_000, block_time: Duration::from_secs(5) },
    }
}

#[test]
fn dump_param_paths() {
    assert_eq!(
        config().dump().into_keys().collect::<Vec<_>>(),
        vec![
            "genesis_height",
            "number_of_validators",
            "slots.block_time",
            "slots.genesis_timestamp"
        ]
    );
}

#[test]
fn load_dumped_config() {
    let config_map = config_map_from_dump(&config().dump());
    assert_eq!(config_map["slots.block_time"], json!(5));

    let loaded: BftConfig = load_and_validate(&config_map).unwrap();
    assert_eq!(loaded, config());
}

#[test]
fn default_config_is_valid() {
    let config_map = config_map_from_dump(&BftConfig::default().dump());
    let loaded: BftConfig = load_and_validate(&config_map).unwrap();
    assert_eq!(loaded, BftConfig::default());
}

#[test]
fn zero_validators_is_invalid() {
    let mut config_map = config_map_from_dump(&config().dump());
    update_config_map(&mut config_map, [("number_of_validators".to_owned(), json!(0))]);
    assert_matches!(
        load_and_validate::<BftConfig>(&config_map),
        Err(ConfigError::ConfigValidationError(errors))
            if errors.field_errors().contains_key("number_of_validators")
    );
}

#[test]
fn zero_block_time_is_invalid() {
    let mut config_map = config_map_from_dump(&config().dump());
    update_config_map(&mut config_map, [("slots.block_time".to_owned(), json!(0))]);
    assert_matches!(
        load_and_validate::<BftConfig>(&config_map),
        Err(ConfigError::ConfigValidationError(_))
    );
}

#[test]
fn sub_second_block_time_is_invalid() {
    let mut config = config();
    config.slots.block_time = Duration::from_millis(500);
    assert_matches!(config.validate(), Err(_));
}
