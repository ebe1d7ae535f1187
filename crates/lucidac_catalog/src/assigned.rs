//! Numbered element instances and their ports.
//!
//! An [`AssignedElement`] binds an [`ElementKind`] to an instance id. For a
//! logical circuit the id is free; for physical elements it is bounded by the
//! number of instances the hardware provides. Both types have a compact string
//! form (`Int0`, `Int0out`) that is also their serialized representation and
//! the node/edge id used by graph front ends.

use crate::element::{Direction, ElementDescription, ElementKind};
use crate::error::CatalogError;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Runtime state attached to stateful elements.
///
/// State never takes part in identity: two instances with the same kind and
/// id are the same element whatever their state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ElementState {
    /// Coefficient of a potentiometer, in `[-20, 20]`.
    Pot {
        /// The lane coefficient.
        coeff: f64,
    },
    /// Initial condition and time-scale factor of an integrator.
    Int {
        /// Initial condition, in `[-1, 1]`.
        ic: f64,
        /// Time-scale factor `k0`, if not the block default.
        k: Option<u32>,
    },
}

/// A numbered instance of an element kind.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssignedElement {
    /// The element kind.
    pub kind: ElementKind,
    /// The instance number.
    pub id: u32,
    /// Optional runtime state (coefficient, initial condition).
    pub state: Option<ElementState>,
}

impl AssignedElement {
    /// Creates a stateless element instance.
    pub fn new(kind: ElementKind, id: u32) -> Self {
        Self {
            kind,
            id,
            state: None,
        }
    }

    /// Attaches state to this element.
    pub fn with_state(mut self, state: ElementState) -> Self {
        self.state = Some(state);
        self
    }

    /// Returns the catalog entry of this element's kind.
    pub fn description(&self) -> &'static ElementDescription {
        self.kind.description()
    }

    /// Returns the coefficient of a potentiometer, if one has been set.
    pub fn pot_coefficient(&self) -> Option<f64> {
        match self.state {
            Some(ElementState::Pot { coeff }) => Some(coeff),
            _ => None,
        }
    }

    /// Returns the named port of this element, checked against the catalog.
    pub fn port(&self, name: &str) -> Result<AssignedElementPort, CatalogError> {
        let port = self
            .description()
            .intern_port(name)
            .ok_or_else(|| CatalogError::UnknownPort {
                kind: self.kind.name(),
                port: name.to_string(),
            })?;
        Ok(AssignedElementPort {
            element: self.clone(),
            port,
        })
    }
}

impl PartialEq for AssignedElement {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.id == other.id
    }
}

impl Eq for AssignedElement {}

impl Hash for AssignedElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Display for AssignedElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.id)
    }
}

impl FromStr for AssignedElement {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id, rest) = split_identifier(s)?;
        if !rest.is_empty() {
            return Err(CatalogError::MalformedIdentifier(s.to_string()));
        }
        Ok(AssignedElement::new(kind, id))
    }
}

impl TryFrom<String> for AssignedElement {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AssignedElement> for String {
    fn from(value: AssignedElement) -> String {
        value.to_string()
    }
}

/// A named port of a numbered element instance.
///
/// The port name is always one the catalog lists for the element kind, so
/// every `AssignedElementPort` has a well-defined [`Direction`].
#[derive(Clone, Debug, Serialize)]
#[serde(into = "String")]
pub struct AssignedElementPort {
    element: AssignedElement,
    port: &'static str,
}

impl AssignedElementPort {
    /// Creates a port, checking the port name against the catalog.
    pub fn new(kind: ElementKind, id: u32, port: &str) -> Result<Self, CatalogError> {
        AssignedElement::new(kind, id).port(port)
    }

    /// Creates a port from a name already taken from the catalog.
    pub(crate) fn from_catalog(kind: ElementKind, id: u32, port: &'static str) -> Self {
        debug_assert!(kind.description().port_direction(port).is_some());
        Self {
            element: AssignedElement::new(kind, id),
            port,
        }
    }

    /// The `in` ([`Direction::Sink`]) or `out` ([`Direction::Source`]) side of
    /// the potentiometer of lane `lane`.
    pub fn potentiometer(lane: u32, direction: Direction) -> Self {
        let port = match direction {
            Direction::Sink => "in",
            Direction::Source => "out",
        };
        Self::from_catalog(ElementKind::Pot, lane, port)
    }

    /// The output of external input channel `channel`.
    pub fn extin(channel: u32) -> Self {
        Self::from_catalog(ElementKind::Extin, channel, "source")
    }

    /// The output of constant source `id`.
    pub fn constant(id: u32) -> Self {
        Self::from_catalog(ElementKind::Const, id, "source")
    }

    /// The input of ADC channel `channel`.
    pub fn daq(channel: u32) -> Self {
        Self::from_catalog(ElementKind::Daq, channel, "sink")
    }

    /// The input of external output channel `channel`.
    pub fn extout(channel: u32) -> Self {
        Self::from_catalog(ElementKind::Extout, channel, "sink")
    }

    /// Returns the element this port belongs to.
    pub fn element(&self) -> &AssignedElement {
        &self.element
    }

    /// Returns the element kind.
    pub fn kind(&self) -> ElementKind {
        self.element.kind
    }

    /// Returns the instance number.
    pub fn id(&self) -> u32 {
        self.element.id
    }

    /// Returns the port name.
    pub fn port(&self) -> &'static str {
        self.port
    }

    /// Attaches state to the element of this port.
    pub fn with_state(mut self, state: ElementState) -> Self {
        self.element.state = Some(state);
        self
    }

    /// Returns whether this port is an input or an output of its element.
    pub fn direction(&self) -> Direction {
        self.element
            .description()
            .port_direction(self.port)
            .unwrap_or(Direction::Sink)
    }
}

impl PartialEq for AssignedElementPort {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element && self.port == other.port
    }
}

impl Eq for AssignedElementPort {}

impl Hash for AssignedElementPort {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.element.hash(state);
        self.port.hash(state);
    }
}

impl fmt::Display for AssignedElementPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.element, self.port)
    }
}

impl FromStr for AssignedElementPort {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id, port) = split_identifier(s)?;
        if port.is_empty() {
            return Err(CatalogError::MalformedIdentifier(s.to_string()));
        }
        AssignedElementPort::new(kind, id, port)
    }
}

impl<'de> Deserialize<'de> for AssignedElementPort {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        id.parse().map_err(de::Error::custom)
    }
}

impl From<AssignedElementPort> for String {
    fn from(value: AssignedElementPort) -> String {
        value.to_string()
    }
}

/// Splits `{kind}{id}{rest}` where kind and rest are letters and id is decimal.
fn split_identifier(s: &str) -> Result<(ElementKind, u32, &str), CatalogError> {
    let malformed = || CatalogError::MalformedIdentifier(s.to_string());

    let kind_end = s
        .find(|c: char| !c.is_ascii_alphabetic())
        .ok_or_else(malformed)?;
    let digits_end = s[kind_end..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(s.len(), |pos| kind_end + pos);
    if kind_end == 0 || digits_end == kind_end {
        return Err(malformed());
    }

    let rest = &s[digits_end..];
    if !rest.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(malformed());
    }

    let kind = s[..kind_end].parse::<ElementKind>()?;
    let id = s[kind_end..digits_end].parse::<u32>().map_err(|_| malformed())?;
    Ok((kind, id, rest))
}
