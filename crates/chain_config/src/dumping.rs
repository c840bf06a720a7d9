//! Utils for serializing config objects into a flatten map and a json file.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};

use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::{
    ConfigError,
    ParamPath,
    ParamPrivacyInput,
    SerializedContent,
    SerializedParam,
    FIELD_SEPARATOR,
};

#[cfg(test)]
#[path = "dumping_test.rs"]
mod dumping_test;

/// Serialization for configs.
pub trait SerializeConfig {
    /// Conversion of a configuration to a mapping of flattened parameters to their descriptions and
    /// values.
    fn dump(&self) -> BTreeMap<ParamPath, SerializedParam>;

    /// Serialization of a configuration into a JSON file.
    fn dump_to_file(&self, file_path: &str) -> Result<(), ConfigError> {
        let file = File::create(file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.dump())?;
        writer.flush()?;
        info!("Dumped config to {file_path}");
        Ok(())
    }
}

/// Prepends `sub_config_name` to the ParamPath for each entry in `sub_config_dump`.
/// In order to load from a dump properly, `sub_config_name` must match the field's name for the
/// struct this function is called from.
pub fn prepend_sub_config_name(
    sub_config_dump: BTreeMap<ParamPath, SerializedParam>,
    sub_config_name: &str,
) -> BTreeMap<ParamPath, SerializedParam> {
    BTreeMap::from_iter(
        sub_config_dump.into_iter().map(|(field_name, val)| {
            (format!("{sub_config_name}{FIELD_SEPARATOR}{field_name}"), val)
        }),
    )
}

/// Serializes a single param of a config.
/// The returned pair is designed to be an input to a dumped config map.
pub fn ser_param<T: Serialize>(
    name: &str,
    value: &T,
    description: &str,
    privacy: ParamPrivacyInput,
) -> (String, SerializedParam) {
    (
        name.to_owned(),
        SerializedParam {
            description: description.to_owned(),
            content: SerializedContent::DefaultValue(json!(value)),
            privacy: privacy.into(),
        },
    )
}
