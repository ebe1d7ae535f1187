//! Persisted circuit files.
//!
//! A circuit file holds one of three shapes: a physical routing table, a
//! lane-indexed cluster configuration, or a raw `set_config` payload. The
//! shape is recognized from the keys present.

use crate::alt_signals::UBlockAltSignals;
use crate::envelope::SetConfigRequest;
use crate::error::CodecError;
use crate::route::PhysicalRoute;
use crate::wire::{ClusterConfig, MIntConfig};
use serde::{Deserialize, Serialize};

/// A physical routing table with optional metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutesFile {
    /// Circuit title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// The routes.
    pub routes: Vec<PhysicalRoute>,
    /// Alternative signal switches the routes rely on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_signals: Option<UBlockAltSignals>,
    /// Integrator state.
    #[serde(rename = "MIntConfig", default, skip_serializing_if = "Option::is_none")]
    pub mint: Option<MIntConfig>,
}

/// Any of the accepted circuit file shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CircuitFile {
    /// `{routes, alt_signals?, MIntConfig?}`.
    Routes(RoutesFile),
    /// `{u, c, i, MInt, Ualt}`.
    Cluster(ClusterConfig),
    /// `{entity, config}`.
    SetConfig(SetConfigRequest),
}

impl CircuitFile {
    /// Parses a circuit file.
    pub fn from_json(json: &str) -> Result<CircuitFile, CodecError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the file as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns a short name of the file's shape.
    pub fn shape(&self) -> &'static str {
        match self {
            CircuitFile::Routes(_) => "routes",
            CircuitFile::Cluster(_) => "cluster config",
            CircuitFile::SetConfig(_) => "set_config",
        }
    }
}
