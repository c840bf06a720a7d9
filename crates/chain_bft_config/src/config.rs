//! This module contains the configuration of the BFT finality gadget, including the `BftConfig`
//! struct and its implementation of the `SerializeConfig` trait. The configuration includes the
//! number of active validators, the height from which BFT voting starts, and the slot timing.

use std::collections::BTreeMap;
use std::time::Duration;

use chain_api::block::BlockNumber;
use chain_config::converters::{deserialize_seconds_to_duration, serialize_duration_as_seconds};
use chain_config::dumping::{prepend_sub_config_name, ser_param, SerializeConfig};
use chain_config::validators::validate_whole_seconds_duration;
use chain_config::{ParamPath, ParamPrivacyInput, SerializedParam};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Configuration for the BFT finality gadget.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Validate)]
pub struct BftConfig {
    /// The number of active validators in every round.
    #[validate(range(min = 1))]
    pub number_of_validators: u64,
    /// The finalized height the chain starts from before any vote was counted.
    pub genesis_height: BlockNumber,
    /// Slot timing configuration.
    #[validate(nested)]
    pub slots: SlotsConfig,
}

impl SerializeConfig for BftConfig {
    fn dump(&self) -> BTreeMap<ParamPath, SerializedParam> {
        let mut config = BTreeMap::from_iter([
            ser_param(
                "number_of_validators",
                &self.number_of_validators,
                "The number of active validators in every round.",
                ParamPrivacyInput::Public,
            ),
            ser_param(
                "genesis_height",
                &self.genesis_height,
                "The finalized height the chain starts from before any vote was counted.",
                ParamPrivacyInput::Public,
            ),
        ]);
        config.extend(prepend_sub_config_name(self.slots.dump(), "slots"));
        config
    }
}

impl Default for BftConfig {
    fn default() -> Self {
        Self {
            number_of_validators: 101,
            genesis_height: BlockNumber(0),
            slots: SlotsConfig::default(),
        }
    }
}

/// Configuration for the forging slots.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Validate)]
pub struct SlotsConfig {
    /// Unix time (seconds) at which slot 0 starts.
    pub genesis_timestamp: u64,
    /// The length (seconds) of a forging slot.
    #[serde(
        deserialize_with = "deserialize_seconds_to_duration",
        serialize_with = "serialize_duration_as_seconds"
    )]
    #[validate(custom(function = "validate_whole_seconds_duration"))]
    pub block_time: Duration,
}

impl SerializeConfig for SlotsConfig {
    fn dump(&self) -> BTreeMap<ParamPath, SerializedParam> {
        BTreeMap::from_iter([
            ser_param(
                "genesis_timestamp",
                &self.genesis_timestamp,
                "Unix time (seconds) at which slot 0 starts.",
                ParamPrivacyInput::Public,
            ),
            ser_param(
                "block_time",
                &self.block_time.as_secs(),
                "The length (seconds) of a forging slot.",
                ParamPrivacyInput::Public,
            ),
        ])
    }
}

impl Default for SlotsConfig {
    fn default() -> Self {
        Self { genesis_timestamp: 0, block_time: Duration::from_secs(10) }
    }
}
