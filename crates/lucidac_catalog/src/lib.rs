//! Compute-element catalog and M-block slot layouts for the LUCIDAC.
//!
//! This crate describes what can be wired on a cluster: the fixed set of
//! [`ElementKind`]s with their ports, numbered instances of them
//! ([`AssignedElement`], [`AssignedElementPort`]), and the [`MBlockSetup`]
//! trait that maps physical element ports onto matrix cross-lanes.
//!
//! # Usage
//!
//! ```
//! use lucidac_catalog::{AssignedElementPort, MBlockSetup, SlotLayout};
//!
//! let port: AssignedElementPort = "Mul1b".parse().unwrap();
//! let clane = SlotLayout::standard().port_to_clane(&port).unwrap();
//! assert_eq!(clane.index(), 3);
//! ```

#![warn(missing_docs)]

pub mod assigned;
pub mod element;
pub mod error;
pub mod layout;

pub use assigned::{AssignedElement, AssignedElementPort, ElementState};
pub use element::{lookup, Direction, ElementDescription, ElementKind, EXTIN_CHANNELS};
pub use error::CatalogError;
pub use layout::{MBlockKind, MBlockSetup, SlotLayout};
