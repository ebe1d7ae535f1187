//! Unrouted logical connections between element ports.

use crate::error::RoutingFault;
use lucidac_catalog::{AssignedElementPort, CatalogError, Direction, ElementKind};
use lucidac_common::Lane;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An edge of the circuit graph: a signal flows from `source` to `target`.
///
/// Fields are public so that graphs from an untrusted front end can be
/// handed to the compiler as they are; the compiler reports ill-shaped
/// connections as routing errors. [`LogicalConnection::new`] checks the
/// shape up front instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicalConnection {
    /// The port emitting the signal.
    pub source: AssignedElementPort,
    /// The port receiving the signal.
    pub target: AssignedElementPort,
}

impl LogicalConnection {
    /// Creates a connection, rejecting shapes that can never be routed.
    pub fn new(
        source: AssignedElementPort,
        target: AssignedElementPort,
    ) -> Result<Self, CatalogError> {
        let connection = Self { source, target };
        match connection.shape_fault() {
            Some(reason) => Err(CatalogError::InvalidConnection {
                from: connection.source.to_string(),
                to: connection.target.to_string(),
                reason,
            }),
            None => Ok(connection),
        }
    }

    /// Returns why this connection can never be routed, if it cannot.
    ///
    /// The signal must leave through an output port and enter through an
    /// input port. Two virtual elements only connect through exactly one
    /// potentiometer.
    pub fn shape_fault(&self) -> Option<&'static str> {
        let source = self.source.kind();
        let target = self.target.kind();
        if source.is_sink() {
            return Some("a sink cannot act as a source");
        }
        if target.is_source() {
            return Some("a source cannot act as a target");
        }
        if self.source.direction() != Direction::Source {
            return Some("an input port cannot drive a signal");
        }
        if self.target.direction() != Direction::Sink {
            return Some("an output port cannot receive a signal");
        }
        let source_pot = source == ElementKind::Pot;
        let target_pot = target == ElementKind::Pot;
        if source.is_virtual() && target.is_virtual() && source_pot == target_pot {
            return Some("two virtual elements cannot be connected directly");
        }
        None
    }

    /// Returns the potentiometer id if one end of this connection is a potentiometer.
    pub fn potentiometer(&self) -> Option<u32> {
        [&self.source, &self.target]
            .into_iter()
            .find(|p| p.kind() == ElementKind::Pot)
            .map(AssignedElementPort::id)
    }
}

impl fmt::Display for LogicalConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// Parses graph edges given as `(source id, target id)` string pairs.
///
/// Malformed identifiers are hard errors. The connection shape is left to
/// the compiler, which reports ill-shaped edges without failing.
pub fn parse_connections<'a>(
    edges: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<Vec<LogicalConnection>, RoutingFault> {
    edges
        .into_iter()
        .map(|(source, target)| {
            Ok(LogicalConnection {
                source: source.parse()?,
                target: target.parse()?,
            })
        })
        .collect()
}

/// A connection after potentiometer resolution.
///
/// Either end may still be missing while potentiometer halves are being
/// paired. `pot` is the id of the potentiometer the route went through and
/// `coeff` its coefficient, if one was given.
#[derive(Debug, Clone)]
pub(crate) struct LogicalRoute {
    pub source: Option<AssignedElementPort>,
    pub target: Option<AssignedElementPort>,
    pub coeff: Option<f64>,
    pub pot: Option<Lane>,
    pub origin: LogicalConnection,
}

impl LogicalRoute {
    /// Returns `true` if either end is a virtual element.
    pub fn is_virtual(&self) -> bool {
        [&self.source, &self.target]
            .into_iter()
            .flatten()
            .any(|port| port.kind().is_virtual())
    }

    /// The coefficient to program, 1 unless a potentiometer set one.
    pub fn coefficient(&self) -> f64 {
        self.coeff.unwrap_or(1.0)
    }

    /// The connection this route now stands for, once both ends are known.
    pub fn connection(&self) -> LogicalConnection {
        LogicalConnection {
            source: self.source.clone().unwrap_or_else(|| self.origin.source.clone()),
            target: self.target.clone().unwrap_or_else(|| self.origin.target.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(source: &str, target: &str) -> LogicalConnection {
        LogicalConnection {
            source: source.parse().unwrap(),
            target: target.parse().unwrap(),
        }
    }

    #[test]
    fn valid_shapes() {
        for (s, t) in [
            ("Int0out", "Mul0a"),
            ("Int0out", "Pot3in"),
            ("Pot3out", "Int1in"),
            ("Extin0source", "Pot2in"),
            ("Pot2out", "Daq0sink"),
            ("Const0source", "Int0in"),
            ("Mul1out", "Extout0sink"),
        ] {
            let c = conn(s, t);
            assert_eq!(c.shape_fault(), None, "{c}");
            assert!(LogicalConnection::new(c.source, c.target).is_ok());
        }
    }

    #[test]
    fn invalid_shapes() {
        for (s, t) in [
            ("Daq0sink", "Int0in"),
            ("Int0out", "Extin0source"),
            ("Extin0source", "Daq0sink"),
            ("Pot1out", "Pot2in"),
            ("Const0source", "Extout1sink"),
            ("Mul0b", "Int0in"),
            ("Int0out", "Int1out"),
            ("Int0in", "Daq0sink"),
            ("Pot5in", "Int1in"),
            ("Int0out", "Pot5out"),
        ] {
            let c = conn(s, t);
            assert!(c.shape_fault().is_some(), "{c} should be rejected");
            let err = LogicalConnection::new(c.source, c.target).unwrap_err();
            assert!(matches!(err, CatalogError::InvalidConnection { .. }));
        }
    }

    #[test]
    fn potentiometer_id() {
        assert_eq!(conn("Int0out", "Pot7in").potentiometer(), Some(7));
        assert_eq!(conn("Pot4out", "Int0in").potentiometer(), Some(4));
        assert_eq!(conn("Int0out", "Int1in").potentiometer(), None);
    }

    #[test]
    fn parse_edges() {
        let conns = parse_connections([("Int0out", "Mul0a"), ("Daq0sink", "Int1in")]).unwrap();
        assert_eq!(conns.len(), 2);
        assert_eq!(conns[0].to_string(), "Int0out -> Mul0a");

        let err = parse_connections([("Int0out", "Mul0c")]).unwrap_err();
        assert!(matches!(err, RoutingFault::Catalog(CatalogError::UnknownPort { .. })));
    }

    #[test]
    fn serde_as_id_strings() {
        let c = conn("Int0out", "Pot3in");
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, r#"{"source":"Int0out","target":"Pot3in"}"#);
        let back: LogicalConnection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn deserialize_from_owned_input() {
        let json = format!(r#"[{{"source":"{}","target":"{}"}}]"#, "Mul1out", "Int4in");
        let owned: Vec<LogicalConnection> = serde_json::from_reader(json.as_bytes()).unwrap();
        assert_eq!(owned, [conn("Mul1out", "Int4in")]);

        let err = serde_json::from_str::<LogicalConnection>(r#"{"source":"Mul1c","target":"Int4in"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("has no port 'c'"), "{err}");
    }
}
