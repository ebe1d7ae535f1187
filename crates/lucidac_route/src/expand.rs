//! Physical to logical expansion.
//!
//! Every physical route becomes two connections through the potentiometer
//! of its lane, `source -> Pot(lane).in` and `Pot(lane).out -> target`, the
//! shape [`logical_to_physical`](crate::logical_to_physical) resolves. No
//! potentiometers are shared, so fan-out shows as one potentiometer per lane.

use crate::logical::LogicalConnection;
use lucidac_catalog::{AssignedElementPort, Direction, ElementKind, ElementState, MBlockSetup};
use lucidac_codec::{PhysicalRoute, UBlockAltSignals, REF_HALF_CLANE};
use tracing::{debug, warn};

/// Reconstructs logical connections from a routing table.
///
/// Sources on a cross-lane replaced by an enabled external input become
/// that input; sources on the reference cross-lane become constants,
/// numbered in order of appearance when the reference is enabled. Routes
/// without an output cross-lane end at the ADC channel or external output
/// listening on their lane.
pub fn physical_to_logical(
    routes: &[PhysicalRoute],
    alt_signals: &UBlockAltSignals,
    setup: &dyn MBlockSetup,
) -> Vec<LogicalConnection> {
    let mut constants = 0;
    let mut connections = Vec::with_capacity(2 * routes.len());

    for route in routes {
        let Some(target) = target_of(route, setup) else {
            warn!(%route, "route without output cross-lane on a lane no sink listens to");
            continue;
        };
        let source = if let Some(channel) = alt_signals.active_acl(route.uin) {
            AssignedElementPort::extin(channel)
        } else if alt_signals.has_ref_half() && route.uin == REF_HALF_CLANE {
            constants += 1;
            AssignedElementPort::constant(constants - 1)
        } else {
            setup.clane_to_port(route.uin, Direction::Source)
        };

        let lane = u32::from(route.lane.as_raw());
        let state = ElementState::Pot { coeff: route.cval };
        connections.push(LogicalConnection {
            source,
            target: AssignedElementPort::potentiometer(lane, Direction::Sink).with_state(state),
        });
        connections.push(LogicalConnection {
            source: AssignedElementPort::potentiometer(lane, Direction::Source).with_state(state),
            target,
        });
    }

    debug!(
        routes = routes.len(),
        connections = connections.len(),
        constants,
        "expanded routing"
    );
    connections
}

fn target_of(route: &PhysicalRoute, setup: &dyn MBlockSetup) -> Option<AssignedElementPort> {
    if let Some(iout) = route.iout {
        return Some(setup.clane_to_port(iout, Direction::Sink));
    }
    let lane = u32::from(route.lane.as_raw());
    [ElementKind::Daq, ElementKind::Extout]
        .into_iter()
        .find_map(|kind| {
            let base = kind.reserved_lane(0)?.as_raw() as u32;
            let channel = lane.checked_sub(base)?;
            (kind.reserved_lane(channel)? == route.lane).then_some((kind, channel))
        })
        .map(|(kind, channel)| match kind {
            ElementKind::Daq => AssignedElementPort::daq(channel),
            _ => AssignedElementPort::extout(channel),
        })
}
