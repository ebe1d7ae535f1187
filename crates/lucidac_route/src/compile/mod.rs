//! Logical to physical routing ("pick & place").
//!
//! Compilation runs in four phases:
//!
//! 1. **Resolve**: validate connections and join potentiometer halves
//!    (`potentiometers`).
//! 2. **Pin**: place routes touching a virtual element on the lanes and
//!    cross-lanes the hardware reserves for it, then settle collisions
//!    among them (`pinning`).
//! 3. **Place**: map the remaining physical routes to cross-lanes through
//!    the M-block setup (`flexible`).
//! 4. **Correct**: move flexible routes off pinned lanes and off each
//!    other, lowest free lane first.
//!
//! Routes whose source cross-lane is taken over by an enabled auxiliary
//! signal are dropped between phases 2 and 3.

mod flexible;
mod lanes;
mod pinning;
mod potentiometers;

use crate::error::{codes, ErrorAggregator, RoutingError, RoutingFault, RoutingSubject};
use crate::logical::LogicalConnection;
use crate::routing::PhysicalRouting;
use lanes::LaneSet;
use lucidac_catalog::{ElementKind, MBlockSetup};
use lucidac_codec::{PhysicalRoute, UBlockAltSignals, REF_HALF_CLANE};
use lucidac_common::{Clane, Lane};
use tracing::debug;

/// A route with its cross-lanes known and its lane possibly still open.
#[derive(Debug, Clone)]
pub(crate) struct Placement {
    pub lane: Option<Lane>,
    pub uin: Clane,
    pub cval: f64,
    pub iout: Option<Clane>,
    /// The resolved connection, for error reporting.
    pub connection: LogicalConnection,
}

impl Placement {
    fn subject(&self) -> RoutingSubject {
        RoutingSubject::Route {
            connection: self.connection.clone(),
            lane: self.lane.map(|lane| u32::from(lane.as_raw())),
        }
    }

    fn into_route(self) -> Option<PhysicalRoute> {
        self.lane
            .map(|lane| PhysicalRoute::new(lane, self.uin, self.cval, self.iout))
    }

    /// Names the auxiliary signal occupying this route's source cross-lane,
    /// unless the route's source is that signal.
    fn shadowed_by(&self, alt_signals: &UBlockAltSignals) -> Option<&'static str> {
        let source = &self.connection.source;
        if let Some(channel) = alt_signals.active_acl(self.uin) {
            if source.kind() != ElementKind::Extin || source.id() != channel {
                return Some("external input");
            }
        }
        if alt_signals.has_ref_half() && self.uin == REF_HALF_CLANE && source.kind() != ElementKind::Const
        {
            return Some("constant reference");
        }
        None
    }
}

/// Drops placements whose source cross-lane carries an auxiliary signal instead.
fn drop_shadowed(
    placements: Vec<Placement>,
    alt_signals: &UBlockAltSignals,
    errors: &mut ErrorAggregator,
) -> Vec<Placement> {
    placements
        .into_iter()
        .filter(|placement| match placement.shadowed_by(alt_signals) {
            Some(signal) => {
                errors.push(RoutingError::new(
                    codes::SHADOWED_SOURCE,
                    format!(
                        "cross-lane {} carries the {signal}, not {}",
                        placement.uin, placement.connection.source
                    ),
                    placement.subject(),
                ));
                false
            }
            None => true,
        })
        .collect()
}

/// Compiles logical connections into a physical routing.
///
/// Connections that cannot be routed are dropped and reported in
/// [`PhysicalRouting::errors`]; the rest of the batch still compiles. The
/// call fails only on a [`RoutingFault`], i.e. a virtual sink reached
/// through a non-trivial coefficient.
///
/// Pinned routes come first in the output, followed by the flexible ones,
/// each in input order.
pub fn logical_to_physical(
    connections: &[LogicalConnection],
    setup: &dyn MBlockSetup,
) -> Result<PhysicalRouting, RoutingFault> {
    let mut errors = ErrorAggregator::new();
    let mut alt_signals = UBlockAltSignals::new();

    let routes = potentiometers::resolve(connections, &mut errors);
    let (virtual_routes, physical_routes): (Vec<_>, Vec<_>) =
        routes.into_iter().partition(|route| route.is_virtual());
    debug!(
        connections = connections.len(),
        pinned = virtual_routes.len(),
        flexible = physical_routes.len(),
        "resolved potentiometers"
    );

    let pinned = pinning::place(&virtual_routes, setup, &mut alt_signals, &mut errors)?;
    let pinned = drop_shadowed(pinned, &alt_signals, &mut errors);
    let pinned = pinning::settle(pinned, &mut errors);
    let pinned_lanes: LaneSet = pinned.iter().map(|route| route.lane).collect();
    debug!(lanes = pinned_lanes.len(), "pinned virtual routes");

    let flexible = flexible::place(&physical_routes, setup, &mut errors);
    let flexible = drop_shadowed(flexible, &alt_signals, &mut errors);
    let flexible = flexible::correct(flexible, pinned_lanes, &mut errors);
    debug!(
        routes = pinned.len() + flexible.len(),
        errors = errors.len(),
        "routing complete"
    );

    Ok(PhysicalRouting {
        routes: pinned.into_iter().chain(flexible).collect(),
        errors: errors.into_errors(),
        alt_signals,
    })
}
