//! Hardware resolution: turning the configuration into catalog and codec types.

use crate::error::ConfigError;
use crate::types::LucidacConfig;
use lucidac_catalog::{MBlockKind, SlotLayout};
use lucidac_codec::{IntState, MIntConfig};
use lucidac_common::NUM_SLOTS;

/// The hardware a configuration describes, ready for the compiler and codec.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedHardware {
    /// M-block layout of the cluster.
    pub layout: SlotLayout,
    /// Integrator state used when a circuit sets none.
    pub mint: MIntConfig,
    /// Cluster index for `set_config` entities.
    pub cluster: String,
}

/// Resolves a validated configuration into a slot layout and default
/// integrator state.
pub fn resolve_hardware(config: &LucidacConfig) -> Result<ResolvedHardware, ConfigError> {
    let hw = &config.hardware;
    let slots: [MBlockKind; NUM_SLOTS] = match hw.slots.as_slice() {
        [first, second] => [parse_block_kind(first)?, parse_block_kind(second)?],
        other => {
            return Err(ConfigError::ValidationError(format!(
                "hardware.slots needs {NUM_SLOTS} entries, found {}",
                other.len()
            )))
        }
    };

    let state = IntState {
        ic: config.integrators.ic,
        k: Some(config.integrators.k),
    };

    Ok(ResolvedHardware {
        layout: SlotLayout::new(slots),
        mint: [state; lucidac_common::NUM_INTEGRATORS],
        cluster: hw.cluster.clone(),
    })
}

/// Parses an M-block kind name.
pub(crate) fn parse_block_kind(name: &str) -> Result<MBlockKind, ConfigError> {
    match name {
        "Mul" => Ok(MBlockKind::Mul),
        "Int" => Ok(MBlockKind::Int),
        other => Err(ConfigError::UnknownBlockKind(other.to_string())),
    }
}
