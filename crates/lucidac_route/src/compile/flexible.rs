//! Placement of routes between physical elements.

use super::lanes::LaneSet;
use super::Placement;
use crate::error::{codes, ErrorAggregator, RoutingError, RoutingSubject};
use crate::logical::LogicalRoute;
use lucidac_catalog::MBlockSetup;
use lucidac_codec::PhysicalRoute;
use lucidac_common::Lane;
use tracing::trace;

/// Maps physical routes to cross-lanes.
///
/// A route keeps the lane of its potentiometer; otherwise it takes its
/// position in `routes` as a provisional lane, which may be out of range.
pub(super) fn place(
    routes: &[LogicalRoute],
    setup: &dyn MBlockSetup,
    errors: &mut ErrorAggregator,
) -> Vec<Placement> {
    routes
        .iter()
        .enumerate()
        .filter_map(|(position, route)| {
            let connection = route.connection();
            let lane = route.pot.or_else(|| Lane::new(position));
            let subject = || RoutingSubject::Route {
                connection: connection.clone(),
                lane: lane.map(|lane| u32::from(lane.as_raw())),
            };
            let Some(uin) = setup.port_to_clane(&connection.source) else {
                errors.push(RoutingError::new(
                    codes::SOURCE_NOT_ASSIGNABLE,
                    format!("physical source {} not assignable", connection.source),
                    subject(),
                ));
                return None;
            };
            let Some(iout) = setup.port_to_clane(&connection.target) else {
                errors.push(RoutingError::new(
                    codes::TARGET_NOT_ASSIGNABLE,
                    format!("physical target {} not assignable", connection.target),
                    subject(),
                ));
                return None;
            };
            Some(Placement {
                lane,
                uin,
                cval: route.coefficient(),
                iout: Some(iout),
                connection,
            })
        })
        .collect()
}

/// Moves flexible routes off pinned lanes and off each other.
///
/// The first route on a lane keeps it unless the lane is pinned. Every
/// other route takes the lowest lane used neither by a pinned route nor by
/// any flexible route.
pub(super) fn correct(
    placements: Vec<Placement>,
    pinned: LaneSet,
    errors: &mut ErrorAggregator,
) -> Vec<PhysicalRoute> {
    let mut occupied = pinned;
    for lane in placements.iter().filter_map(|p| p.lane) {
        occupied.insert(lane);
    }

    let mut kept = LaneSet::new();
    let mut placements = placements;
    for placement in &mut placements {
        match placement.lane {
            Some(lane) if !pinned.contains(lane) && kept.insert(lane) => continue,
            _ => {}
        }
        match occupied.lowest_free() {
            Some(lane) => {
                trace!(from = ?placement.lane, to = %lane, connection = %placement.connection, "reassigned flexible lane");
                occupied.insert(lane);
                kept.insert(lane);
                placement.lane = Some(lane);
            }
            None => {
                errors.push(RoutingError::new(
                    codes::NO_FREE_LANE,
                    "no free lane left",
                    placement.subject(),
                ));
                placement.lane = None;
            }
        }
    }

    placements
        .into_iter()
        .filter_map(Placement::into_route)
        .collect()
}
