//! Placement of routes touching a virtual element.
//!
//! Virtual elements have no cross-lane of their own. ADC channels and
//! external outputs listen on a reserved lane, external inputs and the
//! constant reference are injected on fixed cross-lanes through the
//! U-block's auxiliary signals.

use super::lanes::LaneSet;
use super::Placement;
use crate::error::{codes, ErrorAggregator, RoutingError, RoutingFault, RoutingSubject};
use crate::logical::LogicalRoute;
use lucidac_catalog::{ElementKind, MBlockSetup};
use lucidac_codec::{PhysicalRoute, UBlockAltSignals, REF_HALF_CLANE};
use lucidac_diagnostics::DiagnosticCode;
use tracing::trace;

/// Places every virtual route on its reserved lane or cross-lane.
///
/// Enables the auxiliary signals the placed routes need. Fails only on a
/// virtual sink with a non-trivial coefficient.
pub(super) fn place(
    routes: &[LogicalRoute],
    setup: &dyn MBlockSetup,
    alt_signals: &mut UBlockAltSignals,
    errors: &mut ErrorAggregator,
) -> Result<Vec<Placement>, RoutingFault> {
    let mut placed = Vec::with_capacity(routes.len());
    for route in routes {
        let placement = place_one(route, setup, alt_signals)?;
        placed.extend(errors.collect(placement));
    }
    Ok(placed)
}

/// A placement or a soft error, inside the hard fault tier.
type Placed = Result<Result<Placement, RoutingError>, RoutingFault>;

fn place_one(
    route: &LogicalRoute,
    setup: &dyn MBlockSetup,
    alt_signals: &mut UBlockAltSignals,
) -> Placed {
    let connection = route.connection();
    let (source, target) = (&connection.source, &connection.target);
    let fail = |code: DiagnosticCode, message: String| -> Placed {
        Ok(Err(RoutingError::new(
            code,
            message,
            RoutingSubject::Route {
                connection: connection.clone(),
                lane: route.pot.map(|lane| u32::from(lane.as_raw())),
            },
        )))
    };

    match (source.kind(), target.kind()) {
        (_, ElementKind::Daq | ElementKind::Extout) => {
            if let Some(coeff) = route.coeff.filter(|&c| c != 0.0 && c != 1.0) {
                return Err(RoutingFault::SinkCoefficient {
                    sink: target.to_string(),
                    coeff,
                });
            }
            let Some(lane) = target.kind().reserved_lane(target.id()) else {
                return fail(
                    codes::VIRTUAL_OUT_OF_RANGE,
                    format!("{} has no channel {}", target.kind(), target.id()),
                );
            };
            let Some(uin) = setup.port_to_clane(source) else {
                return fail(
                    codes::SOURCE_NOT_ASSIGNABLE,
                    format!("source {source} not assignable"),
                );
            };
            Ok(Ok(Placement {
                lane: Some(lane),
                uin,
                cval: 0.0,
                iout: None,
                connection,
            }))
        }
        (ElementKind::Extin, _) => {
            let channel = source.id();
            let (Some(lane), Some(uin)) = (
                ElementKind::Extin.injection_lane(channel),
                ElementKind::Extin.injection_clane(channel),
            ) else {
                return fail(
                    codes::VIRTUAL_OUT_OF_RANGE,
                    format!("Extin has no channel {channel}"),
                );
            };
            let Some(iout) = setup.port_to_clane(target) else {
                return fail(
                    codes::TARGET_NOT_ASSIGNABLE,
                    format!("target {target} not assignable"),
                );
            };
            alt_signals.set_acl(channel, true)?;
            Ok(Ok(Placement {
                lane: Some(lane),
                uin,
                cval: route.coefficient(),
                iout: Some(iout),
                connection,
            }))
        }
        (ElementKind::Const, _) => {
            let Some(iout) = setup.port_to_clane(target) else {
                return fail(
                    codes::TARGET_NOT_ASSIGNABLE,
                    format!("target {target} not assignable"),
                );
            };
            alt_signals.set_ref_half(true);
            Ok(Ok(Placement {
                lane: route.pot,
                uin: REF_HALF_CLANE,
                cval: route.coefficient(),
                iout: Some(iout),
                connection,
            }))
        }
        (source_kind, target_kind) => fail(
            codes::ILLEGAL_VIRTUAL,
            format!("cannot route {source_kind} to {target_kind}"),
        ),
    }
}

/// Gives every pinned placement a distinct lane.
///
/// Placements holding a lane claim it in order. Later claimants of a taken
/// lane, and placements without a lane, move to the lowest free lane.
pub(super) fn settle(placements: Vec<Placement>, errors: &mut ErrorAggregator) -> Vec<PhysicalRoute> {
    let mut claimed = LaneSet::new();
    let mut moved = Vec::new();
    for (idx, placement) in placements.iter().enumerate() {
        match placement.lane {
            Some(lane) if claimed.insert(lane) => {}
            _ => moved.push(idx),
        }
    }

    let mut placements = placements;
    for idx in moved {
        let placement = &mut placements[idx];
        match claimed.lowest_free() {
            Some(lane) => {
                trace!(from = ?placement.lane, to = %lane, connection = %placement.connection, "reassigned pinned lane");
                claimed.insert(lane);
                placement.lane = Some(lane);
            }
            None => {
                errors.push(RoutingError::new(
                    codes::NO_FREE_LANE,
                    "no free lane for pinned route",
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
