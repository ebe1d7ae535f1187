//! The fixed catalog of compute-element kinds.
//!
//! The catalog only models elements that exist on M-blocks plus the virtual
//! elements a circuit view needs to express I/O: external inputs and outputs,
//! ADC channels, constants, and the potentiometer standing in for a lane
//! coefficient. Implicit summation in the U-C-I matrix has no element.

use crate::error::CatalogError;
use lucidac_common::{Clane, Lane};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of external input channels (ACL_IN) on a cluster.
pub const EXTIN_CHANNELS: u32 = 8;

/// Number of ADC (`Daq`) channels and external output (`Extout`) channels.
const SINK_CHANNELS: u32 = 8;

/// Cross-lane carrying the constant reference when its alt signal is on.
const REF_HALF_CLANE: usize = 7;

/// Whether a port receives information (input) or emits it (output).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Direction {
    /// An input port; the element consumes a signal here.
    Sink,
    /// An output port; the element produces a signal here.
    Source,
}

/// Every kind of element a circuit can contain.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum ElementKind {
    /// A multiplier, computes `out = -(a * b)`.
    Mul,
    /// An integrator, computes `out = +∫ in`.
    Int,
    /// An ADC channel listening on a fixed lane.
    Daq,
    /// An external analog output (ACL_OUT) on a fixed lane.
    Extout,
    /// An external analog input (ACL_IN) injected through an alt signal.
    Extin,
    /// A constant reference source.
    Const,
    /// A digital potentiometer, i.e. the coefficient of one lane.
    Pot,
}

/// Immutable catalog entry describing the ports of an element kind.
#[derive(Debug, PartialEq, Eq)]
pub struct ElementDescription {
    /// Canonical kind name, as used in identifiers.
    pub name: &'static str,
    /// Input port names, in catalog order.
    pub inputs: &'static [&'static str],
    /// Output port names, in catalog order.
    pub outputs: &'static [&'static str],
    /// Whether the element has no M-block equivalent of its own.
    pub is_virtual: bool,
}

impl ElementDescription {
    /// Returns `true` if the element has no outputs.
    pub fn is_sink(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Returns `true` if the element has no inputs.
    pub fn is_source(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Returns the direction of the named port, if the element has it.
    pub fn port_direction(&self, port: &str) -> Option<Direction> {
        if self.inputs.contains(&port) {
            Some(Direction::Sink)
        } else if self.outputs.contains(&port) {
            Some(Direction::Source)
        } else {
            None
        }
    }

    /// Returns the catalog's own `'static` copy of a port name.
    pub(crate) fn intern_port(&self, port: &str) -> Option<&'static str> {
        self.inputs
            .iter()
            .chain(self.outputs.iter())
            .find(|&&p| p == port)
            .copied()
    }
}

const fn physical(
    name: &'static str,
    inputs: &'static [&'static str],
    outputs: &'static [&'static str],
) -> ElementDescription {
    ElementDescription {
        name,
        inputs,
        outputs,
        is_virtual: false,
    }
}

const fn virtual_element(
    name: &'static str,
    inputs: &'static [&'static str],
    outputs: &'static [&'static str],
) -> ElementDescription {
    ElementDescription {
        name,
        inputs,
        outputs,
        is_virtual: true,
    }
}

/// Indexed by `ElementKind as usize`.
static CATALOG: [ElementDescription; 7] = [
    physical("Mul", &["a", "b"], &["out"]),
    physical("Int", &["in"], &["out"]),
    virtual_element("Daq", &["sink"], &[]),
    virtual_element("Extout", &["sink"], &[]),
    virtual_element("Extin", &[], &["source"]),
    virtual_element("Const", &[], &["source"]),
    virtual_element("Pot", &["in"], &["out"]),
];

impl ElementKind {
    /// All element kinds in catalog order.
    pub const ALL: [ElementKind; 7] = [
        ElementKind::Mul,
        ElementKind::Int,
        ElementKind::Daq,
        ElementKind::Extout,
        ElementKind::Extin,
        ElementKind::Const,
        ElementKind::Pot,
    ];

    /// Returns the catalog entry of this kind.
    pub fn description(self) -> &'static ElementDescription {
        &CATALOG[self as usize]
    }

    /// Returns the canonical kind name.
    pub fn name(self) -> &'static str {
        self.description().name
    }

    /// Returns `true` for elements without an M-block equivalent.
    pub fn is_virtual(self) -> bool {
        self.description().is_virtual
    }

    /// Returns `true` for elements without outputs.
    pub fn is_sink(self) -> bool {
        self.description().is_sink()
    }

    /// Returns `true` for elements without inputs.
    pub fn is_source(self) -> bool {
        self.description().is_source()
    }

    /// Returns the lane reserved for a virtual sink instance.
    ///
    /// ADC channel `n` listens on lane `n`, external output `n` on lane `8 + n`.
    /// Other kinds have no reserved lane.
    pub fn reserved_lane(self, id: u32) -> Option<Lane> {
        if id >= SINK_CHANNELS {
            return None;
        }
        match self {
            ElementKind::Daq => Lane::new(id as usize),
            ElementKind::Extout => Lane::new((SINK_CHANNELS + id) as usize),
            ElementKind::Mul
            | ElementKind::Int
            | ElementKind::Extin
            | ElementKind::Const
            | ElementKind::Pot => None,
        }
    }

    /// Returns the cross-lane a virtual source instance is injected on.
    ///
    /// External input `n` enters on cross-lane `8 + n`; every constant uses
    /// the reference cross-lane 7.
    pub fn injection_clane(self, id: u32) -> Option<Clane> {
        match self {
            ElementKind::Extin if id < EXTIN_CHANNELS => Clane::new(8 + id as usize),
            ElementKind::Const => Clane::new(REF_HALF_CLANE),
            ElementKind::Extin
            | ElementKind::Mul
            | ElementKind::Int
            | ElementKind::Daq
            | ElementKind::Extout
            | ElementKind::Pot => None,
        }
    }

    /// Returns the lane an external input channel is routed on by convention.
    pub fn injection_lane(self, id: u32) -> Option<Lane> {
        match self {
            ElementKind::Extin if id < EXTIN_CHANNELS => Lane::new(16 + id as usize),
            _ => None,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| CatalogError::UnknownElementKind(s.to_string()))
    }
}

/// Looks up the catalog entry for a kind name.
pub fn lookup(name: &str) -> Result<&'static ElementDescription, CatalogError> {
    name.parse::<ElementKind>().map(ElementKind::description)
}
