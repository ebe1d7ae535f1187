//! Message envelopes of the device protocol.
//!
//! Only the message shapes live here; sending them is up to the caller.

use crate::wire::{ConfigTree, OutputCentricConfig};
use serde::{Deserialize, Serialize};

/// A request to the device: `{id, type, msg}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Correlation token echoed in the response.
    pub id: String,
    /// Message type, e.g. `get_config` or `set_config`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The payload.
    pub msg: T,
}

impl<T> Envelope<T> {
    /// Wraps a payload.
    pub fn new(id: impl Into<String>, kind: impl Into<String>, msg: T) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            msg,
        }
    }
}

/// A response from the device; carries `error` and `error_code` on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    /// Correlation token of the request.
    pub id: String,
    /// Message type of the request.
    #[serde(rename = "type")]
    pub kind: String,
    /// The payload, absent on failure.
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub msg: Option<T>,
    /// Error description, if the request failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Numeric error code, if the request failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,
}

impl<T> ResponseEnvelope<T> {
    /// Returns `true` if the device reported an error.
    pub fn is_error(&self) -> bool {
        self.error.is_some() || self.error_code.is_some()
    }
}

/// Payload of a `set_config` request: `{entity: [device, cluster], config}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetConfigRequest {
    /// Device id followed by cluster index.
    pub entity: Vec<String>,
    /// The block configuration.
    pub config: ConfigTree,
}

impl SetConfigRequest {
    /// Addresses an output-centric configuration to a device cluster.
    pub fn new(device: impl Into<String>, cluster: impl Into<String>, output: OutputCentricConfig) -> Self {
        Self {
            entity: vec![device.into(), cluster.into()],
            config: output.config,
        }
    }

    /// Returns the output-centric configuration this request carries.
    pub fn to_output(&self) -> OutputCentricConfig {
        OutputCentricConfig {
            entity: serde_json::Value::from(self.entity.clone()),
            config: self.config.clone(),
        }
    }
}
