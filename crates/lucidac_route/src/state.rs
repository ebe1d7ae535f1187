//! Integrator state carried by the logical graph.

use crate::logical::LogicalConnection;
use lucidac_catalog::{ElementKind, ElementState};
use lucidac_codec::{IntState, MIntConfig};

/// Fills the integrator block state from integrator ports found in
/// `connections`.
///
/// Integrators without state keep their entry of `defaults`, as does the
/// time-scale factor of a state that leaves it unset. Ids beyond the
/// integrator block are ignored.
pub fn collect_integrator_states(
    connections: &[LogicalConnection],
    defaults: &MIntConfig,
) -> MIntConfig {
    let mut mint = *defaults;
    let ports = connections
        .iter()
        .flat_map(|connection| [&connection.source, &connection.target]);
    for port in ports {
        let element = port.element();
        let (ElementKind::Int, Some(ElementState::Int { ic, k })) = (element.kind, element.state)
        else {
            continue;
        };
        if let Some(entry) = mint.get_mut(element.id as usize) {
            *entry = IntState {
                ic,
                k: k.or(defaults[element.id as usize].k),
            };
        }
    }
    mint
}

#[cfg(test)]
mod tests {
    use super::*;
    use lucidac_catalog::AssignedElementPort;
    use lucidac_codec::default_mint;

    fn int(s: &str, ic: f64, k: Option<u32>) -> AssignedElementPort {
        s.parse::<AssignedElementPort>()
            .unwrap()
            .with_state(ElementState::Int { ic, k })
    }

    #[test]
    fn states_are_collected() {
        let connections = vec![
            LogicalConnection {
                source: int("Int2out", 0.5, Some(100)),
                target: "Mul0a".parse().unwrap(),
            },
            LogicalConnection {
                source: "Mul0out".parse().unwrap(),
                target: int("Int5in", -1.0, None),
            },
        ];
        let mint = collect_integrator_states(&connections, &default_mint());
        assert_eq!(mint[2], IntState { ic: 0.5, k: Some(100) });
        assert_eq!(mint[5], IntState { ic: -1.0, k: Some(1000) });
        assert_eq!(mint[0], IntState::default());
    }

    #[test]
    fn out_of_block_ids_are_ignored() {
        let connections = vec![LogicalConnection {
            source: int("Int9out", 0.5, None),
            target: "Int0in".parse().unwrap(),
        }];
        let mint = collect_integrator_states(&connections, &default_mint());
        assert_eq!(mint, default_mint());
    }
}
