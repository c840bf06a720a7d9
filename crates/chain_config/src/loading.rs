//! Loading configuration from a flat map of dotted param paths.
//!
//! The map is either the values of a [`SerializeConfig::dump`](crate::dumping::SerializeConfig)
//! or the content of a file written by
//! [`SerializeConfig::dump_to_file`](crate::dumping::SerializeConfig::dump_to_file). Individual
//! values can be overridden before loading.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use validator::Validate;

use crate::validators::config_validate;
use crate::{ConfigError, ParamPath, SerializedContent, SerializedParam, FIELD_SEPARATOR};

#[cfg(test)]
#[path = "loading_test.rs"]
mod loading_test;

/// Extracts the values of a dumped config.
pub fn config_map_from_dump(
    dumped_config: &BTreeMap<ParamPath, SerializedParam>,
) -> BTreeMap<ParamPath, Value> {
    dumped_config
        .iter()
        .map(|(param_path, serialized_param)| {
            let SerializedContent::DefaultValue(value) = &serialized_param.content;
            (param_path.clone(), value.clone())
        })
        .collect()
}

/// Reads a file written by `dump_to_file` into a config map.
pub fn config_map_from_file(file_path: &str) -> Result<BTreeMap<ParamPath, Value>, ConfigError> {
    let reader = BufReader::new(File::open(file_path)?);
    let dumped_config: BTreeMap<ParamPath, SerializedParam> = serde_json::from_reader(reader)?;
    Ok(config_map_from_dump(&dumped_config))
}

/// Replaces the values of the given params.
pub fn update_config_map(
    config_map: &mut BTreeMap<ParamPath, Value>,
    overrides: impl IntoIterator<Item = (ParamPath, Value)>,
) {
    config_map.extend(overrides);
}

/// Deserializes a config from a flat map of dotted param paths.
pub fn load<T: DeserializeOwned>(
    config_map: &BTreeMap<ParamPath, Value>,
) -> Result<T, ConfigError> {
    let mut nested_map = json!({});
    for (param_path, value) in config_map {
        let mut entry = &mut nested_map;
        for config_name in param_path.split(FIELD_SEPARATOR) {
            let Some(nested_config) = entry.as_object_mut() else {
                return Err(ConfigError::ParamPathCollision { param_path: param_path.clone() });
            };
            entry = nested_config.entry(config_name).or_insert(json!({}));
        }
        *entry = value.clone();
    }
    Ok(serde_json::from_value(nested_map)?)
}

/// Deserializes a config from a flat map and validates it.
pub fn load_and_validate<T: DeserializeOwned + Validate>(
    config_map: &BTreeMap<ParamPath, Value>,
) -> Result<T, ConfigError> {
    let loaded_config = load::<T>(config_map)?;
    config_validate(&loaded_config)?;
    Ok(loaded_config)
}
