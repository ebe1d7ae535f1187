//! Error types for the matrix codec and wire format.

use lucidac_common::{Clane, Lane};

/// Two cross-lanes of an output-centric `/I` block claim the same lane.
///
/// The input-centric representation holds one cross-lane per lane, so such
/// a configuration has no input-centric equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("lane {lane} is claimed by cross-lane {first} and cross-lane {second}; double allocation not representable")]
pub struct DoubleAllocation {
    /// The doubly claimed lane.
    pub lane: Lane,
    /// The cross-lane that claimed the lane first.
    pub first: Clane,
    /// The cross-lane whose claim was rejected.
    pub second: Clane,
}

/// Errors that can occur when decoding matrix or wire data.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The output-centric `/I` block cannot be transposed.
    #[error(transparent)]
    DoubleAllocation(#[from] DoubleAllocation),

    /// A lane number is outside `0..32`.
    #[error("{field}: lane {lane} out of range 0..32")]
    LaneOutOfRange {
        /// The wire field the lane was read from.
        field: &'static str,
        /// The offending lane number.
        lane: u32,
    },

    /// A cross-lane number is outside `0..16`.
    #[error("{field}: cross-lane {clane} out of range 0..16")]
    ClaneOutOfRange {
        /// The wire field the cross-lane was read from.
        field: &'static str,
        /// The offending cross-lane number.
        clane: u32,
    },

    /// A fixed-size wire array has more entries than the hardware provides.
    #[error("{field}: expected at most {max} entries, found {found}")]
    TooManyEntries {
        /// The wire field.
        field: &'static str,
        /// The hardware size of the array.
        max: usize,
        /// The number of entries present.
        found: usize,
    },

    /// An external input channel outside `0..8` was addressed.
    #[error("external input channel {0} out of range 0..8")]
    AclOutOfRange(u32),

    /// JSON (de)serialization failed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
