//! Routing compiler for the LUCIDAC analog crossbar.
//!
//! This crate translates between the two views of a LUCIDAC circuit:
//!
//! - the **logical** view, a graph of [`LogicalConnection`]s between
//!   element ports in which lane coefficients appear as potentiometer
//!   nodes, and
//! - the **physical** view, a [`PhysicalRouting`] of lanes with their input
//!   and output cross-lanes, as the `lucidac_codec` crate encodes it for the
//!   firmware.
//!
//! [`logical_to_physical`] assigns lanes ("pick & place");
//! [`physical_to_logical`] reconstructs a graph from a routing table.
//! Connections that cannot be routed do not abort compilation; they are
//! returned as [`RoutingError`]s next to the routes that succeeded.
//!
//! # Usage
//!
//! ```
//! use lucidac_catalog::SlotLayout;
//! use lucidac_route::{logical_to_physical, parse_connections};
//!
//! let connections = parse_connections([("Int0out", "Pot3in"), ("Pot3out", "Int1in")])?;
//! let routing = logical_to_physical(&connections, &SlotLayout::standard())?;
//! assert!(routing.is_complete());
//! assert_eq!(routing.routes[0].lane.index(), 3);
//! # Ok::<(), lucidac_route::RoutingFault>(())
//! ```

#![warn(missing_docs)]

pub mod compile;
pub mod error;
pub mod expand;
pub mod load;
pub mod logical;
pub mod routing;
pub mod state;

pub use compile::logical_to_physical;
pub use error::{codes, ErrorAggregator, RoutingError, RoutingFault, RoutingSubject};
pub use expand::physical_to_logical;
pub use load::{load_circuit, LoadedCircuit};
pub use logical::{parse_connections, LogicalConnection};
pub use routing::{config_to_routing, routing_to_config, PhysicalRouting};
pub use state::collect_integrator_states;
