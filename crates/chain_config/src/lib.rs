#![warn(missing_docs)]
//! Configuration utilities for the chain node components.
//!
//! A component config is dumped into a flat map from a dotted [`ParamPath`] to a
//! [`SerializedParam`], written to a JSON file, and loaded back into the typed config:
//!
//! ```json
//! "conf1.conf2.param_name": {
//!     "description": "Param description.",
//!     "value": json_value,
//!     "privacy": "Public"
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::ValidationErrors;

pub mod converters;
pub mod dumping;
pub mod loading;
pub mod validators;

/// A nested path of a configuration parameter.
pub type ParamPath = String;
/// A description of a configuration parameter.
pub type Description = String;

/// The separator between the names of nested configs in a [`ParamPath`].
pub const FIELD_SEPARATOR: &str = ".";

/// A serialized content of a configuration parameter.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum SerializedContent {
    /// Serialized JSON default value.
    #[serde(rename = "value")]
    DefaultValue(Value),
}

/// A description and serialized content of a configuration parameter.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SerializedParam {
    /// The description of the parameter.
    pub description: Description,
    /// The content of the parameter.
    #[serde(flatten)]
    pub content: SerializedContent,
    /// Whether the parameter may be shared in logs and dumps.
    pub privacy: ParamPrivacy,
}

/// The privacy level of a config parameter, that received as input to the configs.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ParamPrivacyInput {
    /// The field is visible only by a secret.
    Private,
    /// The field is visible only to node's users.
    Public,
}

/// The privacy level of a config parameter.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ParamPrivacy {
    /// The field is visible only by a secret.
    Private,
    /// The field is visible only to node's users.
    Public,
}

impl From<ParamPrivacyInput> for ParamPrivacy {
    fn from(user_param_privacy: ParamPrivacyInput) -> Self {
        match user_param_privacy {
            ParamPrivacyInput::Private => ParamPrivacy::Private,
            ParamPrivacyInput::Public => ParamPrivacy::Public,
        }
    }
}

/// Errors at the configuration dumping and loading process.
#[allow(missing_docs)]
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error(transparent)]
    MissingParam(#[from] serde_json::Error),
    #[error("Param path {param_path} collides with a param of a parent config.")]
    ParamPathCollision { param_path: ParamPath },
    #[error(transparent)]
    ConfigValidationError(#[from] ValidationErrors),
}
