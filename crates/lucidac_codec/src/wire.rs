//! The firmware's output-centric configuration format.
//!
//! `get_config` returns and `set_config` accepts a JSON tree keyed by block
//! paths: `/0` is the cluster, `/M0` and `/M1` its M-block slots, `/U`, `/C`
//! and `/I` the three matrix blocks. [`ClusterConfig`] is the flat,
//! lane-indexed equivalent used everywhere else.

use crate::alt_signals::UBlockAltSignals;
use crate::error::{CodecError, DoubleAllocation};
use crate::matrix::ReducedConfig;
use crate::transpose::{input_to_output, output_to_input_lenient, LaneGroup};
use lucidac_catalog::SlotLayout;
use lucidac_common::{Clane, NUM_INTEGRATORS, NUM_LANES, NUM_SLOTS};
use serde::{Deserialize, Serialize};

/// Time-scale factor integrators start with.
pub const DEFAULT_K0: u32 = 1000;

/// Initial condition and time-scale factor of one integrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntState {
    /// Initial condition, in `[-1, 1]`.
    pub ic: f64,
    /// Time-scale factor `k0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<u32>,
}

impl Default for IntState {
    fn default() -> Self {
        Self {
            ic: 0.0,
            k: Some(DEFAULT_K0),
        }
    }
}

/// Integrator block state, one entry per integrator.
pub type MIntConfig = [IntState; NUM_INTEGRATORS];

/// Returns the integrator state of a freshly reset block.
pub fn default_mint() -> MIntConfig {
    [IntState::default(); NUM_INTEGRATORS]
}

/// Block state that is not part of the U-C-I matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuxConfig {
    /// Integrator block state.
    #[serde(rename = "MInt")]
    pub mint: MIntConfig,
    /// U-block alternative signal switches.
    #[serde(rename = "Ualt")]
    pub alt_signals: UBlockAltSignals,
}

impl Default for AuxConfig {
    fn default() -> Self {
        Self {
            mint: default_mint(),
            alt_signals: UBlockAltSignals::new(),
        }
    }
}

/// A complete cluster configuration in lane-indexed form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// The U-C-I matrix.
    #[serde(flatten)]
    pub matrix: ReducedConfig,
    /// Integrator state and alt signals.
    #[serde(flatten)]
    pub aux: AuxConfig,
}

/// Returns an empty cluster: no lane in use, integrators reset, alt signals off.
pub fn default_empty_cluster_config() -> ClusterConfig {
    ClusterConfig::default()
}

/// The state of one M-block slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MBlockConfig {
    /// Element state; only integrator blocks carry any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<IntState>>,
}

/// The U-block: one input cross-lane per lane.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UBlockConfig {
    /// Cross-lane feeding each lane, `null` for unused lanes.
    pub outputs: Vec<Option<u32>>,
    /// Alternative signal switches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_signals: Option<UBlockAltSignals>,
}

/// The C-block: one coefficient per lane.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CBlockConfig {
    /// Lane coefficients.
    pub elements: Vec<f64>,
}

/// The I-block: the lanes summed into each cross-lane.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IBlockConfig {
    /// Lanes per output cross-lane.
    pub outputs: Vec<Option<LaneGroup>>,
}

/// All blocks of cluster `/0`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClusterBlocks {
    /// M-block slot 0.
    #[serde(rename = "/M0", default)]
    pub m0: MBlockConfig,
    /// M-block slot 1.
    #[serde(rename = "/M1", default)]
    pub m1: MBlockConfig,
    /// U-block.
    #[serde(rename = "/U")]
    pub u: UBlockConfig,
    /// C-block.
    #[serde(rename = "/C")]
    pub c: CBlockConfig,
    /// I-block.
    #[serde(rename = "/I")]
    pub i: IBlockConfig,
}

impl ClusterBlocks {
    fn slot(&self, slot: usize) -> &MBlockConfig {
        if slot == 0 {
            &self.m0
        } else {
            &self.m1
        }
    }

    fn slot_mut(&mut self, slot: usize) -> &mut MBlockConfig {
        if slot == 0 {
            &mut self.m0
        } else {
            &mut self.m1
        }
    }
}

/// The `config` part of a `get_config`/`set_config` payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigTree {
    /// The single cluster of a LUCIDAC.
    #[serde(rename = "/0")]
    pub cluster: ClusterBlocks,
}

/// The firmware's configuration payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputCentricConfig {
    /// The addressed entity (device MAC, or `[device, cluster]`).
    pub entity: serde_json::Value,
    /// The block configuration.
    pub config: ConfigTree,
}

/// Encodes a lane-indexed cluster configuration for the firmware.
///
/// The integrator state goes to the `/M{slot}` block of the layout's
/// integrator slot.
pub fn reduced_to_output(
    matrix: &ReducedConfig,
    aux: &AuxConfig,
    layout: &SlotLayout,
    entity: serde_json::Value,
) -> OutputCentricConfig {
    let mut cluster = ClusterBlocks {
        u: UBlockConfig {
            outputs: matrix.u.iter().map(|c| c.map(|c| c.as_raw() as u32)).collect(),
            alt_signals: Some(aux.alt_signals),
        },
        c: CBlockConfig {
            elements: matrix.c.to_vec(),
        },
        i: IBlockConfig {
            outputs: input_to_output(&matrix.i),
        },
        ..ClusterBlocks::default()
    };
    if let Some(slot) = layout.integrator_slot() {
        cluster.slot_mut(slot).elements = Some(aux.mint.to_vec());
    }
    OutputCentricConfig {
        entity,
        config: ConfigTree { cluster },
    }
}

/// Decodes a firmware payload into its lane-indexed form.
///
/// Fails on any double allocation in the `/I` block.
pub fn output_to_reduced(output: &OutputCentricConfig) -> Result<ClusterConfig, CodecError> {
    let (cluster, conflicts) = output_to_reduced_lenient(output)?;
    match conflicts.into_iter().next() {
        Some(conflict) => Err(conflict.into()),
        None => Ok(cluster),
    }
}

/// Like [`output_to_reduced`], but keeps the first claim of a doubly
/// allocated lane and reports the rejected ones.
pub fn output_to_reduced_lenient(
    output: &OutputCentricConfig,
) -> Result<(ClusterConfig, Vec<DoubleAllocation>), CodecError> {
    let blocks = &output.config.cluster;
    let mut matrix = ReducedConfig::default();

    check_len("/U outputs", blocks.u.outputs.len())?;
    for (lane, raw) in blocks.u.outputs.iter().enumerate() {
        if let Some(raw) = *raw {
            let clane = Clane::new(raw as usize).ok_or(CodecError::ClaneOutOfRange {
                field: "/U outputs",
                clane: raw,
            })?;
            matrix.u[lane] = Some(clane);
        }
    }

    check_len("/C elements", blocks.c.elements.len())?;
    for (lane, &cval) in blocks.c.elements.iter().enumerate() {
        matrix.c[lane] = cval;
    }

    let (input, conflicts) = output_to_input_lenient(&blocks.i.outputs)?;
    matrix.i = input;

    let mut aux = AuxConfig::default();
    if let Some(alt) = blocks.u.alt_signals {
        aux.alt_signals = alt;
    }
    if let Some(elements) = (0..NUM_SLOTS).find_map(|slot| blocks.slot(slot).elements.as_ref()) {
        check_len_of("/M elements", elements.len(), NUM_INTEGRATORS)?;
        for (slot, state) in aux.mint.iter_mut().zip(elements) {
            *slot = *state;
        }
    }

    tracing::debug!(
        lanes = matrix.c.iter().filter(|&&c| c != 0.0).count(),
        conflicts = conflicts.len(),
        "decoded output-centric config"
    );
    Ok((ClusterConfig { matrix, aux }, conflicts))
}

fn check_len(field: &'static str, found: usize) -> Result<(), CodecError> {
    check_len_of(field, found, NUM_LANES)
}

fn check_len_of(field: &'static str, found: usize, max: usize) -> Result<(), CodecError> {
    if found > max {
        return Err(CodecError::TooManyEntries { field, max, found });
    }
    Ok(())
}
