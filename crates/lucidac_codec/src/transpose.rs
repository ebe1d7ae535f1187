//! Transpose between the input-centric and output-centric I-block views.
//!
//! The reduced configuration stores one output cross-lane per lane
//! (input-centric). The firmware describes the I-block per cross-lane
//! (output-centric): each cross-lane lists the lanes summed into it. Both
//! describe the same sparse matrix.

use crate::error::{CodecError, DoubleAllocation};
use lucidac_common::{Clane, Lane, NUM_CLANES, NUM_LANES};
use serde::{Deserialize, Serialize};

/// Input-centric I-block: the output cross-lane of every lane.
pub type InputCentric = [Option<Clane>; NUM_LANES];

/// The lanes feeding one cross-lane, in the firmware's shorthand.
///
/// A single lane is written as a bare number, several as a list. An
/// unused cross-lane is `null` and is represented by `None` around this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LaneGroup {
    /// Exactly one lane.
    Single(u32),
    /// Any number of lanes.
    Many(Vec<u32>),
}

impl LaneGroup {
    /// Returns the raw lane numbers of this group.
    pub fn lanes(&self) -> &[u32] {
        match self {
            LaneGroup::Single(lane) => std::slice::from_ref(lane),
            LaneGroup::Many(lanes) => lanes,
        }
    }

    fn from_lanes(mut lanes: Vec<u32>) -> Option<LaneGroup> {
        match lanes.len() {
            0 => None,
            1 => lanes.pop().map(LaneGroup::Single),
            _ => Some(LaneGroup::Many(lanes)),
        }
    }
}

/// Groups lanes by the cross-lane they feed.
///
/// Returns one entry per cross-lane: `None` if no lane feeds it, a bare lane
/// if exactly one does, a list otherwise. Cannot fail, since every lane feeds
/// at most one cross-lane.
pub fn input_to_output(input: &InputCentric) -> Vec<Option<LaneGroup>> {
    let mut groups: Vec<Vec<u32>> = vec![Vec::new(); NUM_CLANES];
    for (lane, clane) in input.iter().enumerate() {
        if let Some(clane) = clane {
            groups[clane.index()].push(lane as u32);
        }
    }
    groups.into_iter().map(LaneGroup::from_lanes).collect()
}

/// Inverts [`input_to_output`].
///
/// Fails with [`CodecError::DoubleAllocation`] on the first lane claimed by
/// two cross-lanes, and with a range error for lanes or cross-lanes outside
/// the hardware.
pub fn output_to_input(output: &[Option<LaneGroup>]) -> Result<InputCentric, CodecError> {
    transpose(output, true).map(|(input, _)| input)
}

/// Like [`output_to_input`], but resolves double allocations.
///
/// The first cross-lane claiming a lane keeps it; every rejected claim is
/// returned alongside the transposed array.
pub fn output_to_input_lenient(
    output: &[Option<LaneGroup>],
) -> Result<(InputCentric, Vec<DoubleAllocation>), CodecError> {
    transpose(output, false)
}

fn transpose(
    output: &[Option<LaneGroup>],
    strict: bool,
) -> Result<(InputCentric, Vec<DoubleAllocation>), CodecError> {
    if output.len() > NUM_CLANES {
        return Err(CodecError::TooManyEntries {
            field: "/I outputs",
            max: NUM_CLANES,
            found: output.len(),
        });
    }

    let mut input: InputCentric = [None; NUM_LANES];
    let mut conflicts = Vec::new();
    for (idx, group) in output.iter().enumerate() {
        let Some(group) = group else { continue };
        let clane = Clane::checked(idx).map_err(|_| CodecError::ClaneOutOfRange {
            field: "/I outputs",
            clane: idx as u32,
        })?;
        for &raw in group.lanes() {
            let lane = Lane::new(raw as usize).ok_or(CodecError::LaneOutOfRange {
                field: "/I outputs",
                lane: raw,
            })?;
            match input[lane.index()] {
                None => input[lane.index()] = Some(clane),
                Some(first) => {
                    let conflict = DoubleAllocation {
                        lane,
                        first,
                        second: clane,
                    };
                    if strict {
                        return Err(conflict.into());
                    }
                    tracing::warn!(%conflict, "dropping double allocation");
                    conflicts.push(conflict);
                }
            }
        }
    }
    Ok((input, conflicts))
}
