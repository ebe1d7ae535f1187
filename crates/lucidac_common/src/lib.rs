//! Shared foundational types for the LUCIDAC routing toolchain.
//!
//! This crate provides the bounded lane and cross-lane indices that every
//! other crate addresses the crossbar with, the fixed hardware dimensions,
//! and the error raised when an index falls outside them.

#![warn(missing_docs)]

pub mod hardware;
pub mod ids;

pub use hardware::{
    CLANES_PER_SLOT, MAX_COEFFICIENT, NUM_CLANES, NUM_INTEGRATORS, NUM_LANES, NUM_SLOTS,
};
pub use ids::{Clane, IndexOutOfRange, Lane};
