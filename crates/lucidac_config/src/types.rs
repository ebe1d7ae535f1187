//! Configuration types deserialized from `lucidac.toml`.

use lucidac_codec::DEFAULT_K0;
use serde::Deserialize;

/// The top-level configuration parsed from `lucidac.toml`.
///
/// Every section is optional; an empty file describes the standard LUCIDAC.
#[derive(Debug, Default, Deserialize)]
pub struct LucidacConfig {
    /// Which M-blocks are plugged in, and which cluster is addressed.
    #[serde(default)]
    pub hardware: HardwareConfig,
    /// Default state of every integrator.
    #[serde(default)]
    pub integrators: IntegratorDefaults,
}

/// Hardware setup of the addressed cluster.
#[derive(Debug, Deserialize)]
pub struct HardwareConfig {
    /// M-block kind per slot, slot 0 first (`"Mul"` or `"Int"`).
    #[serde(default = "default_slots")]
    pub slots: Vec<String>,
    /// Cluster index used in `set_config` entities.
    #[serde(default = "default_cluster")]
    pub cluster: String,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            slots: default_slots(),
            cluster: default_cluster(),
        }
    }
}

fn default_slots() -> Vec<String> {
    vec!["Mul".to_string(), "Int".to_string()]
}

fn default_cluster() -> String {
    "0".to_string()
}

/// Initial condition and time-scale factor applied to every integrator.
#[derive(Debug, Deserialize)]
pub struct IntegratorDefaults {
    /// Initial condition, in `[-1, 1]`.
    #[serde(default)]
    pub ic: f64,
    /// Time-scale factor `k0`.
    #[serde(default = "default_k")]
    pub k: u32,
}

impl Default for IntegratorDefaults {
    fn default() -> Self {
        Self {
            ic: 0.0,
            k: default_k(),
        }
    }
}

fn default_k() -> u32 {
    DEFAULT_K0
}
