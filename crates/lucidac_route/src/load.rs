//! Loading persisted circuit files into a routing.

use crate::error::{codes, RoutingError, RoutingFault, RoutingSubject};
use crate::expand::physical_to_logical;
use crate::logical::LogicalConnection;
use crate::routing::{config_to_routing, PhysicalRouting};
use lucidac_catalog::MBlockSetup;
use lucidac_codec::{default_mint, output_to_reduced_lenient, CircuitFile, MIntConfig};
use tracing::debug;

/// A circuit read from a file, in both physical and logical form.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCircuit {
    /// The routing table, with decoding problems as errors.
    pub routing: PhysicalRouting,
    /// Integrator state.
    pub mint: MIntConfig,
    /// The routing expanded into logical connections.
    pub connections: Vec<LogicalConnection>,
}

/// Loads any circuit file shape.
///
/// A doubly allocated lane in a `set_config` payload keeps its first claim
/// and is reported as a routing error. Malformed payloads fail.
pub fn load_circuit(
    file: &CircuitFile,
    setup: &dyn MBlockSetup,
) -> Result<LoadedCircuit, RoutingFault> {
    let (routing, mint) = match file {
        CircuitFile::Routes(routes) => (
            PhysicalRouting {
                routes: routes.routes.clone(),
                errors: Vec::new(),
                alt_signals: routes.alt_signals.unwrap_or_default(),
            },
            routes.mint.unwrap_or_else(default_mint),
        ),
        CircuitFile::Cluster(cluster) => (config_to_routing(cluster), cluster.aux.mint),
        CircuitFile::SetConfig(request) => {
            let (cluster, conflicts) = output_to_reduced_lenient(&request.to_output())?;
            let mut routing = config_to_routing(&cluster);
            routing.errors = conflicts
                .into_iter()
                .map(|conflict| {
                    RoutingError::new(
                        codes::DOUBLE_ALLOCATION,
                        conflict.to_string(),
                        RoutingSubject::Lane(conflict.lane),
                    )
                })
                .collect();
            (routing, cluster.aux.mint)
        }
    };

    let connections = physical_to_logical(&routing.routes, &routing.alt_signals, setup);
    debug!(
        shape = file.shape(),
        routes = routing.routes.len(),
        errors = routing.errors.len(),
        "loaded circuit"
    );
    Ok(LoadedCircuit {
        routing,
        mint,
        connections,
    })
}
