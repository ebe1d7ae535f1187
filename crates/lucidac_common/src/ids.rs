//! Bounded index newtypes for lanes and cross-lanes.
//!
//! [`Lane`] and [`Clane`] are thin `u8` wrappers that can only hold values
//! inside the hardware range. They serialize as bare integers and reject
//! out-of-range integers on deserialization.

use crate::hardware::{NUM_CLANES, NUM_LANES};
use serde::{Deserialize, Serialize};

/// An index outside the range of the addressed hardware resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{resource} index {index} out of range 0..{bound}")]
pub struct IndexOutOfRange {
    /// The kind of resource that was addressed ("lane" or "cross-lane").
    pub resource: &'static str,
    /// The offending index.
    pub index: usize,
    /// The exclusive upper bound.
    pub bound: usize,
}

macro_rules! define_index {
    ($(#[$meta:meta])* $name:ident, $bound:expr, $resource:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        pub struct $name(u8);

        impl $name {
            /// Number of distinct values of this index.
            pub const COUNT: usize = $bound;

            /// Creates an index, or `None` if `index` is out of range.
            pub fn new(index: usize) -> Option<Self> {
                (index < $bound).then(|| Self(index as u8))
            }

            /// Creates an index from a value fixed by the hardware.
            ///
            /// Panics if `index` is out of range; in a `const` item that is a
            /// compile error.
            pub const fn from_raw(index: u8) -> Self {
                assert!((index as usize) < $bound, "index out of range");
                Self(index)
            }

            /// Creates an index, failing with [`IndexOutOfRange`] if out of range.
            pub fn checked(index: usize) -> Result<Self, IndexOutOfRange> {
                Self::new(index).ok_or(IndexOutOfRange {
                    resource: $resource,
                    index,
                    bound: $bound,
                })
            }

            /// Returns the raw `u8` value.
            pub fn as_raw(self) -> u8 {
                self.0
            }

            /// Returns the value as a `usize`, suitable for array indexing.
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Iterates over every value in ascending order.
            pub fn all() -> impl Iterator<Item = Self> {
                (0..$bound as u8).map(Self)
            }
        }

        impl TryFrom<u8> for $name {
            type Error = IndexOutOfRange;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                Self::checked(value as usize)
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_index!(
    /// One of the 32 coefficient-weighted lanes of the C block.
    Lane,
    NUM_LANES,
    "lane"
);

define_index!(
    /// One of the 16 cross-lanes on the input or output side of the matrix.
    Clane,
    NUM_CLANES,
    "cross-lane"
);
