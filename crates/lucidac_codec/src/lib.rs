//! Matrix codec and wire format for LUCIDAC cluster configurations.
//!
//! This crate converts between the sparse list of [`PhysicalRoute`]s a
//! compiler produces, the dense lane-indexed [`ReducedConfig`] matrix, and
//! the firmware's [`OutputCentricConfig`] JSON tree. It also defines the
//! device message envelopes and the persisted [`CircuitFile`] shapes.
//!
//! # Usage
//!
//! ```
//! use lucidac_codec::{matrix_to_routes, routes_to_matrix, PhysicalRoute};
//! use lucidac_common::{Clane, Lane};
//!
//! let route = PhysicalRoute::new(Lane::new(0).unwrap(), Clane::new(8).unwrap(), 1.0, Clane::new(2));
//! let matrix = routes_to_matrix(&[route]);
//! assert_eq!(matrix_to_routes(&matrix), vec![route]);
//! ```

#![warn(missing_docs)]

pub mod alt_signals;
pub mod envelope;
pub mod error;
pub mod file;
pub mod matrix;
pub mod route;
pub mod transpose;
pub mod wire;

pub use alt_signals::{UBlockAltSignals, REF_HALF_CLANE};
pub use envelope::{Envelope, ResponseEnvelope, SetConfigRequest};
pub use error::{CodecError, DoubleAllocation};
pub use file::{CircuitFile, RoutesFile};
pub use matrix::{matrix_to_routes, routes_to_matrix, ReducedConfig};
pub use route::PhysicalRoute;
pub use transpose::{input_to_output, output_to_input, output_to_input_lenient, InputCentric, LaneGroup};
pub use wire::{
    default_empty_cluster_config, default_mint, output_to_reduced, output_to_reduced_lenient,
    reduced_to_output, AuxConfig, ClusterConfig, IntState, MIntConfig, OutputCentricConfig,
    DEFAULT_K0,
};
