//! Connection validation and potentiometer resolution.
//!
//! A potentiometer splits a route into a left half `X -> Pot(n).in` and a
//! right half `Pot(n).out -> Y`. Every right half takes the source of the
//! first left half on the same potentiometer, so one left half may feed
//! several right halves (fan-out). Left halves that fed someone are dropped;
//! whatever half is still open afterwards is unconnected.

use crate::error::{codes, ErrorAggregator, RoutingError, RoutingSubject};
use crate::logical::{LogicalConnection, LogicalRoute};
use lucidac_catalog::ElementKind;
use lucidac_common::{Lane, MAX_COEFFICIENT};

/// Turns connections into complete routes, recording what cannot be routed.
pub(crate) fn resolve(
    connections: &[LogicalConnection],
    errors: &mut ErrorAggregator,
) -> Vec<LogicalRoute> {
    let mut halves: Vec<(LogicalRoute, bool)> = connections
        .iter()
        .filter_map(|connection| errors.collect(split(connection)))
        .map(|route| (route, false))
        .collect();

    for right in 0..halves.len() {
        if halves[right].0.source.is_some() {
            continue;
        }
        let pot = halves[right].0.pot;
        let Some(left) = halves
            .iter()
            .position(|(half, _)| half.target.is_none() && half.pot == pot)
        else {
            continue;
        };
        let (source, coeff) = (halves[left].0.source.clone(), halves[left].0.coeff);
        halves[left].1 = true;
        let route = &mut halves[right].0;
        route.source = source;
        route.coeff = route.coeff.or(coeff);
    }

    halves
        .into_iter()
        .filter(|(_, used)| !used)
        .filter_map(|(route, _)| {
            if route.source.is_some() && route.target.is_some() {
                return Some(route);
            }
            errors.push(RoutingError::new(
                codes::UNCONNECTED_POTENTIOMETER,
                "unconnected potentiometer",
                RoutingSubject::Route {
                    lane: route.pot.map(|lane| u32::from(lane.as_raw())),
                    connection: route.origin,
                },
            ));
            None
        })
        .collect()
}

/// Validates one connection and turns it into a route or potentiometer half.
fn split(connection: &LogicalConnection) -> Result<LogicalRoute, RoutingError> {
    if let Some(reason) = connection.shape_fault() {
        return Err(RoutingError::new(
            codes::ILLEGAL_CONNECTION,
            reason,
            RoutingSubject::Connection(connection.clone()),
        ));
    }

    let (source, target) = (&connection.source, &connection.target);
    let pot = match (source.kind(), target.kind()) {
        (ElementKind::Pot, _) => Some(source),
        (_, ElementKind::Pot) => Some(target),
        _ => None,
    };
    let Some(pot) = pot else {
        return Ok(LogicalRoute {
            source: Some(source.clone()),
            target: Some(target.clone()),
            coeff: None,
            pot: None,
            origin: connection.clone(),
        });
    };

    let subject = || RoutingSubject::Route {
        connection: connection.clone(),
        lane: Some(pot.id()),
    };
    let lane = Lane::new(pot.id() as usize).ok_or_else(|| {
        RoutingError::new(
            codes::POTENTIOMETER_OUT_OF_RANGE,
            format!("potentiometer {} is not a lane", pot.id()),
            subject(),
        )
    })?;
    let coeff = pot.element().pot_coefficient();
    if let Some(coeff) = coeff.filter(|c| !(-MAX_COEFFICIENT..=MAX_COEFFICIENT).contains(c)) {
        return Err(RoutingError::new(
            codes::COEFFICIENT_OUT_OF_RANGE,
            format!("coefficient {coeff} outside [-{MAX_COEFFICIENT}, {MAX_COEFFICIENT}]"),
            subject(),
        ));
    }

    Ok(LogicalRoute {
        source: (source.kind() != ElementKind::Pot).then(|| source.clone()),
        target: (target.kind() != ElementKind::Pot).then(|| target.clone()),
        coeff,
        pot: Some(lane),
        origin: connection.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lucidac_catalog::{AssignedElementPort, ElementState};

    fn port(s: &str) -> AssignedElementPort {
        s.parse().unwrap()
    }

    fn conn(source: &str, target: &str) -> LogicalConnection {
        LogicalConnection {
            source: port(source),
            target: port(target),
        }
    }

    fn pot(s: &str, coeff: f64) -> AssignedElementPort {
        port(s).with_state(ElementState::Pot { coeff })
    }

    fn run(connections: &[LogicalConnection]) -> (Vec<LogicalRoute>, Vec<RoutingError>) {
        let mut errors = ErrorAggregator::new();
        let routes = resolve(connections, &mut errors);
        (routes, errors.into_errors())
    }

    #[test]
    fn direct_physical_connection() {
        let (routes, errors) = run(&[conn("Int0out", "Mul0a")]);
        assert!(errors.is_empty());
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].coefficient(), 1.0);
        assert_eq!(routes[0].pot, None);
    }

    #[test]
    fn halves_join_on_potentiometer() {
        let (routes, errors) = run(&[
            LogicalConnection {
                source: port("Int0out"),
                target: pot("Pot5in", -2.5),
            },
            conn("Pot5out", "Int1in"),
        ]);
        assert!(errors.is_empty());
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].connection(), conn("Int0out", "Int1in"));
        assert_eq!(routes[0].coefficient(), -2.5);
        assert_eq!(routes[0].pot, Lane::new(5));
    }

    #[test]
    fn right_half_coefficient_wins() {
        let (routes, _) = run(&[
            LogicalConnection {
                source: port("Int0out"),
                target: pot("Pot5in", 2.0),
            },
            LogicalConnection {
                source: pot("Pot5out", 3.0),
                target: port("Int1in"),
            },
        ]);
        assert_eq!(routes[0].coefficient(), 3.0);
    }

    #[test]
    fn fan_out_through_one_potentiometer() {
        let (routes, errors) = run(&[
            conn("Int0out", "Pot2in"),
            conn("Pot2out", "Int1in"),
            conn("Pot2out", "Int2in"),
        ]);
        assert!(errors.is_empty());
        let targets: Vec<String> = routes.iter().map(|r| r.connection().to_string()).collect();
        assert_eq!(targets, ["Int0out -> Int1in", "Int0out -> Int2in"]);
    }

    #[test]
    fn unconnected_half_references_lane() {
        let (routes, errors) = run(&[conn("Int0out", "Pot5in")]);
        assert!(routes.is_empty());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, codes::UNCONNECTED_POTENTIOMETER);
        assert_eq!(errors[0].subject.lane(), Some(5));
    }

    #[test]
    fn second_left_half_is_unconnected() {
        let (routes, errors) = run(&[
            conn("Int0out", "Pot1in"),
            conn("Int1out", "Pot1in"),
            conn("Pot1out", "Int2in"),
        ]);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].connection(), conn("Int0out", "Int2in"));
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].subject,
            RoutingSubject::Route {
                connection: conn("Int1out", "Pot1in"),
                lane: Some(1),
            }
        );
    }

    #[test]
    fn illegal_shapes_are_soft() {
        let (routes, errors) = run(&[
            conn("Daq0sink", "Int0in"),
            conn("Extin0source", "Extout0sink"),
            conn("Int0out", "Int1in"),
        ]);
        assert_eq!(routes.len(), 1);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.code == codes::ILLEGAL_CONNECTION));
    }

    #[test]
    fn virtual_source_through_potentiometer() {
        let (routes, errors) = run(&[conn("Extin1source", "Pot3in"), conn("Pot3out", "Int0in")]);
        assert!(errors.is_empty());
        assert_eq!(routes[0].connection(), conn("Extin1source", "Int0in"));
    }

    #[test]
    fn out_of_range_potentiometer_and_coefficient() {
        let (routes, errors) = run(&[
            conn("Int0out", "Pot40in"),
            LogicalConnection {
                source: port("Int0out"),
                target: pot("Pot3in", 25.0),
            },
        ]);
        assert!(routes.is_empty());
        assert_eq!(errors[0].code, codes::POTENTIOMETER_OUT_OF_RANGE);
        assert_eq!(errors[0].subject.lane(), Some(40));
        assert_eq!(errors[1].code, codes::COEFFICIENT_OUT_OF_RANGE);
    }

    #[test]
    fn nan_coefficient_is_out_of_range() {
        let (routes, errors) = run(&[
            LogicalConnection {
                source: port("Int0out"),
                target: pot("Pot3in", f64::NAN),
            },
            conn("Pot3out", "Int1in"),
        ]);
        assert!(routes.is_empty());
        let found: Vec<_> = errors.iter().map(|e| e.code).collect();
        assert_eq!(
            found,
            [codes::COEFFICIENT_OUT_OF_RANGE, codes::UNCONNECTED_POTENTIOMETER]
        );
    }
}
