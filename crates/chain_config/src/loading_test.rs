use std::collections::BTreeMap;
use std::time::Duration;

use assert_matches::assert_matches;
use serde::Deserialize;
use serde_json::json;
use tempfile::TempDir;
use validator::Validate;

use crate::converters::deserialize_seconds_to_duration;
use crate::dumping::{prepend_sub_config_name, ser_param, SerializeConfig};
use crate::loading::{
    config_map_from_dump,
    config_map_from_file,
    load,
    load_and_validate,
    update_config_map,
};
use crate::validators::{config_validate, validate_whole_seconds_duration};
use crate::{ConfigError, ParamPath, ParamPrivacyInput, SerializedParam};

#[derive(Debug, Deserialize, Validate, PartialEq)]
struct TimingConfig {
    #[serde(deserialize_with = "deserialize_seconds_to_duration")]
    #[validate(custom(function = "validate_whole_seconds_duration"))]
    interval: Duration,
}

#[derive(Debug, Deserialize, Validate, PartialEq)]
struct OuterConfig {
    #[validate(range(min = 1))]
    count: u64,
    #[validate(nested)]
    timing: TimingConfig,
}

impl SerializeConfig for OuterConfig {
    fn dump(&self) -> BTreeMap<ParamPath, SerializedParam> {
        let mut dump = BTreeMap::from([ser_param(
            "count",
            &self.count,
            "A count.",
            ParamPrivacyInput::Public,
        )]);
        dump.extend(prepend_sub_config_name(
            BTreeMap::from([ser_param(
                "interval",
                &self.timing.interval.as_secs(),
                "An interval in seconds.",
                ParamPrivacyInput::Public,
            )]),
            "timing",
        ));
        dump
    }
}

fn outer_config() -> OuterConfig {
    OuterConfig { count: 3, timing: TimingConfig { interval: Duration::from_secs(10) } }
}

#[test]
fn load_nested_config_from_dump() {
    let config_map = config_map_from_dump(&outer_config().dump());
    let loaded: OuterConfig = load_and_validate(&config_map).unwrap();
    assert_eq!(loaded, outer_config());
}

#[test]
fn dump_and_load_file() {
    let dir = TempDir::new().unwrap();
    let file_path = dir.path().join("config.json");
    let file_path = file_path.to_str().unwrap();

    outer_config().dump_to_file(file_path).unwrap();
    let config_map = config_map_from_file(file_path).unwrap();
    let loaded: OuterConfig = load_and_validate(&config_map).unwrap();
    assert_eq!(loaded, outer_config());
}

#[test]
fn override_value() {
    let mut config_map = config_map_from_dump(&outer_config().dump());
    update_config_map(&mut config_map, [("timing.interval".to_owned(), json!(4))]);
    let loaded: OuterConfig = load(&config_map).unwrap();
    assert_eq!(loaded.timing.interval, Duration::from_secs(4));
}

#[test]
fn validation_failures() {
    let mut config_map = config_map_from_dump(&outer_config().dump());
    update_config_map(&mut config_map, [("count".to_owned(), json!(0))]);
    assert_matches!(
        load_and_validate::<OuterConfig>(&config_map),
        Err(ConfigError::ConfigValidationError(_))
    );

    let mut config_map = config_map_from_dump(&outer_config().dump());
    update_config_map(&mut config_map, [("timing.interval".to_owned(), json!(0))]);
    assert_matches!(
        load_and_validate::<OuterConfig>(&config_map),
        Err(ConfigError::ConfigValidationError(_))
    );
}

#[test]
fn missing_param() {
    let mut config_map = config_map_from_dump(&outer_config().dump());
    config_map.remove("count");
    assert_matches!(load::<OuterConfig>(&config_map), Err(ConfigError::MissingParam(_)));
}

#[test]
fn param_path_collision() {
    let config_map = BTreeMap::from([
        ("timing".to_owned(), json!(5)),
        ("timing.interval".to_owned(), json!(4)),
    ]);
    assert_matches!(
        load::<OuterConfig>(&config_map),
        Err(ConfigError::ParamPathCollision { param_path }) if param_path == "timing.interval"
    );
}

#[test]
fn sub_second_interval_is_invalid() {
    let config =
        OuterConfig { count: 3, timing: TimingConfig { interval: Duration::from_millis(500) } };
    assert_matches!(config_validate(&config), Err(_));
    assert!(validate_whole_seconds_duration(&Duration::from_millis(1_500)).is_ok());
}
