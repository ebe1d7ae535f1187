//! End-to-end: compile a circuit, encode it for the firmware, decode the
//! payload, expand it and compile again.

use lucidac_catalog::{AssignedElementPort, ElementState};
use lucidac_codec::{reduced_to_output, CircuitFile, PhysicalRoute, SetConfigRequest};
use lucidac_config::{load_config_from_str, resolve_hardware, ResolvedHardware};
use lucidac_route::{
    collect_integrator_states, load_circuit, logical_to_physical, routing_to_config,
    LogicalConnection, PhysicalRouting,
};

fn port(id: &str) -> AssignedElementPort {
    id.parse().unwrap()
}

fn pot(id: &str, coeff: f64) -> AssignedElementPort {
    port(id).with_state(ElementState::Pot { coeff })
}

fn edge(source: AssignedElementPort, target: AssignedElementPort) -> LogicalConnection {
    LogicalConnection { source, target }
}

fn hardware(toml: &str) -> ResolvedHardware {
    resolve_hardware(&load_config_from_str(toml).unwrap()).unwrap()
}

/// Routes that survive the matrix encoding, in lane order.
fn encoded(routing: &PhysicalRouting) -> Vec<PhysicalRoute> {
    let mut routes: Vec<PhysicalRoute> = routing
        .routes
        .iter()
        .copied()
        .filter(|r| r.cval != 0.0)
        .collect();
    routes.sort_by_key(|r| r.lane);
    routes
}

/// A damped oscillator fed by an external input and a constant offset,
/// observed on ADC channel 0.
fn oscillator() -> Vec<LogicalConnection> {
    vec![
        edge(
            port("Int0out").with_state(ElementState::Int { ic: 0.1, k: None }),
            pot("Pot0in", -1.0),
        ),
        edge(port("Pot0out"), port("Int1in")),
        edge(port("Int1out"), pot("Pot1in", 1.0)),
        edge(port("Pot1out"), port("Int0in")),
        edge(port("Extin2source"), pot("Pot5in", 0.5)),
        edge(port("Pot5out"), port("Mul0a")),
        edge(port("Const0source"), pot("Pot6in", 0.25)),
        edge(port("Pot6out"), port("Mul0b")),
        edge(port("Mul0out"), port("Int3in")),
        edge(port("Int0out"), port("Daq0sink")),
    ]
}

fn round_trip(connections: &[LogicalConnection], hw: &ResolvedHardware) -> (PhysicalRouting, PhysicalRouting) {
    let first = logical_to_physical(connections, &hw.layout).unwrap();
    assert!(first.is_complete(), "{:?}", first.errors);

    let mint = collect_integrator_states(connections, &hw.mint);
    let config = routing_to_config(&first, &mint);
    let output = reduced_to_output(&config.matrix, &config.aux, &hw.layout, serde_json::json!("dev"));
    let request = SetConfigRequest::new("dev", hw.cluster.clone(), output);
    let json = CircuitFile::SetConfig(request).to_json().unwrap();

    let loaded = load_circuit(&CircuitFile::from_json(&json).unwrap(), &hw.layout).unwrap();
    assert!(loaded.routing.is_complete());
    assert_eq!(loaded.mint, mint);
    assert_eq!(loaded.routing.alt_signals, first.alt_signals);

    let second = logical_to_physical(&loaded.connections, &hw.layout).unwrap();
    assert!(second.is_complete(), "{:?}", second.errors);
    (first, second)
}

#[test]
fn oscillator_survives_the_firmware_format() {
    let hw = hardware("");
    let (first, second) = round_trip(&oscillator(), &hw);

    assert_eq!(encoded(&first), encoded(&second));
    assert_eq!(second.alt_signals, first.alt_signals);
    assert!(first.alt_signals.has_acl(2));
    assert!(first.alt_signals.has_ref_half());

    // The ADC tap pins lane 0, pushing the first integrator route to lane 3.
    let lanes: Vec<u8> = first.routes.iter().map(|r| r.lane.as_raw()).collect();
    assert_eq!(lanes, [18, 6, 0, 3, 1, 2]);
    // The tap itself is invisible in the matrix.
    assert_eq!(encoded(&first).len(), 5);
}

#[test]
fn integrator_state_reaches_the_payload() {
    let hw = hardware("[integrators]\nk = 100\n");
    let connections = oscillator();
    let mint = collect_integrator_states(&connections, &hw.mint);
    assert_eq!(mint[0].ic, 0.1);
    assert_eq!(mint[0].k, Some(100));
    assert_eq!(mint[1].ic, 0.0);
    round_trip(&connections, &hw);
}

#[test]
fn swapped_layout_round_trip() {
    let hw = hardware("[hardware]\nslots = [\"Int\", \"Mul\"]\ncluster = \"0\"\n");
    let connections = vec![
        edge(port("Int0out"), pot("Pot4in", -2.0)),
        edge(port("Pot4out"), port("Mul1b")),
        edge(port("Mul1out"), port("Int7in")),
        edge(port("Int7out"), port("Int0in")),
    ];
    let (first, second) = round_trip(&connections, &hw);
    assert_eq!(first.routes[0].uin.as_raw(), 0);
    assert_eq!(first.routes[0].iout.map(|c| c.as_raw()), Some(11));
    assert_eq!(encoded(&first), encoded(&second));
}

#[test]
fn fan_out_expands_to_one_potentiometer_per_lane() {
    let hw = hardware("");
    let connections = vec![
        edge(port("Int0out"), pot("Pot9in", 0.75)),
        edge(port("Pot9out"), port("Int1in")),
        edge(port("Pot9out"), port("Int2in")),
    ];
    let (first, second) = round_trip(&connections, &hw);
    assert_eq!(first.routes.len(), 2);
    assert!(first.routes.iter().all(|r| r.cval == 0.75));
    assert_eq!(encoded(&first), encoded(&second));
}
