//! Codec and compiler properties on small hand-written circuits.

use lucidac_catalog::SlotLayout;
use lucidac_codec::{
    input_to_output, matrix_to_routes, output_to_input, routes_to_matrix, CodecError, LaneGroup,
    PhysicalRoute, ReducedConfig, REF_HALF_CLANE,
};
use lucidac_common::{Clane, Lane};
use lucidac_diagnostics::{DiagnosticSink, TerminalRenderer};
use lucidac_route::{codes, logical_to_physical, parse_connections, PhysicalRouting};

fn compile(edges: &[(&str, &str)]) -> PhysicalRouting {
    let connections = parse_connections(edges.iter().copied()).unwrap();
    logical_to_physical(&connections, &SlotLayout::standard()).unwrap()
}

fn route(lane: u8, uin: u8, cval: f64, iout: u8) -> PhysicalRoute {
    PhysicalRoute::new(
        Lane::from_raw(lane),
        Clane::from_raw(uin),
        cval,
        Some(Clane::from_raw(iout)),
    )
}

#[test]
fn matrix_round_trip_keeps_nonzero_lanes() {
    let mut matrix = ReducedConfig::default();
    for lane in 0..32u8 {
        let idx = lane as usize;
        matrix.u[idx] = Some(Clane::from_raw(lane % 16));
        matrix.i[idx] = (lane % 3 != 0).then(|| Clane::from_raw(15 - lane % 16));
        matrix.c[idx] = match lane % 4 {
            0 => 0.0,
            1 => 20.0,
            2 => -0.125,
            _ => -20.0,
        };
    }
    let back = routes_to_matrix(&matrix_to_routes(&matrix));
    assert_eq!(back, matrix.masked());
    assert!(back.u[0].is_none());
    assert_eq!(back.c[1], 20.0);
}

#[test]
fn transpose_round_trip() {
    let mut input = [None; 32];
    for lane in [0usize, 3, 4, 17, 31] {
        input[lane] = Some(Clane::from_raw((lane % 5) as u8));
    }
    input[5] = Some(Clane::from_raw(0));
    let output = input_to_output(&input);
    assert_eq!(output[0], Some(LaneGroup::Many(vec![0, 5])));
    assert_eq!(output[3], Some(LaneGroup::Single(3)));
    assert_eq!(output_to_input(&output).unwrap(), input);
}

#[test]
fn doubly_claimed_lane_is_rejected() {
    let mut output = vec![None; 16];
    output[0] = Some(LaneGroup::Single(10));
    output[1] = Some(LaneGroup::Single(10));
    match output_to_input(&output) {
        Err(CodecError::DoubleAllocation(conflict)) => {
            assert_eq!(conflict.lane, Lane::from_raw(10));
            assert_eq!(conflict.first, Clane::from_raw(0));
            assert_eq!(conflict.second, Clane::from_raw(1));
        }
        other => panic!("expected a double allocation, got {other:?}"),
    }
}

#[test]
fn example_routes_survive_matrix() {
    let routes = vec![route(0, 8, 1.0, 2), route(1, 9, -1.0, 2)];
    assert_eq!(matrix_to_routes(&routes_to_matrix(&routes)), routes);
}

#[test]
fn two_physical_ports_compile_to_one_route() {
    let routing = compile(&[("Int0out", "Mul0a")]);
    assert!(routing.errors.is_empty());
    assert_eq!(routing.routes, [route(0, 8, 1.0, 0)]);
}

#[test]
fn constant_source_pins_reference() {
    let edges = [("Const0source", "Int3in"), ("Int3out", "Mul2b")];
    let first = compile(&edges);
    assert!(first.errors.is_empty());
    assert!(first.alt_signals.has_ref_half());
    assert_eq!(first.routes[0].uin, REF_HALF_CLANE);
    assert_eq!(compile(&edges).alt_signals, first.alt_signals);
}

#[test]
fn shared_sink_instance_gets_distinct_lanes() {
    let routing = compile(&[("Int0out", "Extout0sink"), ("Int1out", "Extout0sink")]);
    assert!(routing.errors.is_empty());
    assert_eq!(routing.routes.len(), 2);
    assert_eq!(routing.routes[0].lane, Lane::from_raw(8));
    assert_ne!(routing.routes[1].lane, routing.routes[0].lane);
}

#[test]
fn open_potentiometer_half_is_one_error() {
    let routing = compile(&[("Int0out", "Pot5in")]);
    assert!(routing.routes.is_empty());
    assert_eq!(routing.errors.len(), 1);
    assert_eq!(routing.errors[0].code, codes::UNCONNECTED_POTENTIOMETER);
    assert_eq!(routing.errors[0].subject.lane(), Some(5));
}

#[test]
fn ports_used_against_their_direction_are_illegal() {
    let routing = compile(&[
        ("Mul0b", "Int0in"),
        ("Int0out", "Int1out"),
        ("Int0in", "Daq0sink"),
        ("Int0out", "Pot5out"),
        ("Pot5in", "Int1in"),
    ]);
    assert!(routing.routes.is_empty());
    assert_eq!(routing.errors.len(), 5);
    assert!(routing
        .errors
        .iter()
        .all(|e| e.code == codes::ILLEGAL_CONNECTION));
}

#[test]
fn errors_do_not_stop_the_batch() {
    let routing = compile(&[
        ("Daq0sink", "Int0in"),
        ("Int0out", "Pot40in"),
        ("Extin9source", "Int1in"),
        ("Int4out", "Int5in"),
        ("Int5out", "Daq3sink"),
    ]);
    let found: Vec<_> = routing.errors.iter().map(|e| e.code).collect();
    assert_eq!(
        found,
        [
            codes::ILLEGAL_CONNECTION,
            codes::POTENTIOMETER_OUT_OF_RANGE,
            codes::VIRTUAL_OUT_OF_RANGE
        ]
    );
    assert_eq!(routing.routes.len(), 2);
    assert_eq!(routing.routes[0].lane, Lane::from_raw(3));
}

#[test]
fn every_lane_can_be_filled() {
    let sources: Vec<String> = (0..8).map(|n| format!("Int{n}out")).collect();
    let targets: Vec<String> = (0..8).map(|n| format!("Int{n}in")).collect();
    let mut edges = Vec::new();
    for (s, source) in sources.iter().enumerate() {
        for target in targets.iter().skip(s % 2).step_by(2) {
            edges.push((source.as_str(), target.as_str()));
        }
    }
    assert_eq!(edges.len(), 32);
    edges.push(("Mul0out", "Mul1a"));

    let routing = compile(&edges);
    assert_eq!(routing.routes.len(), 32);
    assert_eq!(routing.errors.len(), 1);
    assert_eq!(routing.errors[0].code, codes::NO_FREE_LANE);
}

#[test]
fn soft_and_hard_errors_share_one_report() {
    let sink = DiagnosticSink::new();
    compile(&[("Int0out", "Pot5in"), ("Mul0b", "Int0in")]).report(&sink);
    let fault = parse_connections([("Int0out", "Mul0c")]).unwrap_err();
    sink.emit(fault.to_diagnostic());

    assert_eq!(sink.error_count(), 3);
    assert_eq!(sink.count(codes::ILLEGAL_CONNECTION), 1);
    let text = sink.render(&TerminalRenderer::new(false));
    assert!(text.contains("error[R101]: unconnected potentiometer"));
    assert!(text.contains("  --> Int0out -> Pot5in (lane 5)"));
    assert!(text.contains("error[R102]: an input port cannot drive a signal"));
    assert!(text.contains("error[K302]: element kind Mul has no port 'c'"));
}
