//! The compiler's result and its conversion to and from cluster configs.

use crate::error::RoutingError;
use lucidac_codec::{
    matrix_to_routes, routes_to_matrix, AuxConfig, ClusterConfig, MIntConfig, PhysicalRoute,
    UBlockAltSignals,
};
use lucidac_diagnostics::DiagnosticSink;

/// A routed circuit: the lanes in use, what failed to route, and the
/// auxiliary signals the routes depend on.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhysicalRouting {
    /// Routes with distinct lanes.
    pub routes: Vec<PhysicalRoute>,
    /// Soft errors, in the order they were found.
    pub errors: Vec<RoutingError>,
    /// External input and reference switches.
    pub alt_signals: UBlockAltSignals,
}

impl PhysicalRouting {
    /// Returns `true` if every connection was routed.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Emits every soft error into a diagnostic sink.
    pub fn report(&self, sink: &DiagnosticSink) {
        for error in &self.errors {
            sink.emit(error.to_diagnostic());
        }
    }
}

/// Builds a cluster configuration from a routing, ignoring its errors.
pub fn routing_to_config(routing: &PhysicalRouting, mint: &MIntConfig) -> ClusterConfig {
    ClusterConfig {
        matrix: routes_to_matrix(&routing.routes),
        aux: AuxConfig {
            mint: *mint,
            alt_signals: routing.alt_signals,
        },
    }
}

/// Reads the routes of a cluster configuration back.
pub fn config_to_routing(config: &ClusterConfig) -> PhysicalRouting {
    PhysicalRouting {
        routes: matrix_to_routes(&config.matrix),
        errors: Vec::new(),
        alt_signals: config.aux.alt_signals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{codes, RoutingSubject};
    use lucidac_codec::default_mint;
    use lucidac_common::{Clane, Lane};

    fn route(lane: u8, uin: u8, cval: f64, iout: Option<u8>) -> PhysicalRoute {
        PhysicalRoute::new(
            Lane::from_raw(lane),
            Clane::from_raw(uin),
            cval,
            iout.map(Clane::from_raw),
        )
    }

    #[test]
    fn config_round_trip() {
        let mut alt_signals = UBlockAltSignals::new();
        alt_signals.set_ref_half(true);
        let routing = PhysicalRouting {
            routes: vec![route(0, 8, 1.0, Some(2)), route(1, 9, -1.0, Some(2))],
            errors: Vec::new(),
            alt_signals,
        };
        let config = routing_to_config(&routing, &default_mint());
        assert_eq!(config.matrix.c[0], 1.0);
        assert_eq!(config.matrix.i[1], Some(Clane::from_raw(2)));
        assert!(config.aux.alt_signals.has_ref_half());
        assert_eq!(config_to_routing(&config), routing);
    }

    #[test]
    fn errors_are_not_encoded() {
        let routing = PhysicalRouting {
            routes: vec![route(3, 8, 0.5, Some(9))],
            errors: vec![RoutingError::new(
                codes::NO_FREE_LANE,
                "no free lane",
                RoutingSubject::Lane(Lane::from_raw(3)),
            )],
            alt_signals: UBlockAltSignals::new(),
        };
        assert!(!routing.is_complete());

        let sink = DiagnosticSink::new();
        routing.report(&sink);
        assert_eq!(sink.error_count(), 1);

        let back = config_to_routing(&routing_to_config(&routing, &default_mint()));
        assert!(back.is_complete());
        assert_eq!(back.routes, routing.routes);
    }

    #[test]
    fn sink_routes_vanish_in_config() {
        let routing = PhysicalRouting {
            routes: vec![route(0, 8, 0.0, None)],
            ..PhysicalRouting::default()
        };
        let config = routing_to_config(&routing, &default_mint());
        assert!(config.matrix.is_empty());
        assert!(config_to_routing(&config).routes.is_empty());
    }
}
