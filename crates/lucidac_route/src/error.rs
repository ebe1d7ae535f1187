//! Routing errors: the hard fault tier and the collected soft errors.

use crate::logical::LogicalConnection;
use lucidac_catalog::CatalogError;
use lucidac_codec::CodecError;
use lucidac_common::Lane;
use lucidac_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use std::fmt;

/// Diagnostic codes of soft routing errors.
pub mod codes {
    use lucidac_diagnostics::{Category, DiagnosticCode};

    /// A potentiometer half without its counterpart.
    pub const UNCONNECTED_POTENTIOMETER: DiagnosticCode = DiagnosticCode::new(Category::Routing, 101);
    /// A connection against port direction, or two virtual ports wired together.
    pub const ILLEGAL_CONNECTION: DiagnosticCode = DiagnosticCode::new(Category::Routing, 102);
    /// A physical source port without an output cross-lane.
    pub const SOURCE_NOT_ASSIGNABLE: DiagnosticCode = DiagnosticCode::new(Category::Routing, 103);
    /// A physical target port without an input cross-lane.
    pub const TARGET_NOT_ASSIGNABLE: DiagnosticCode = DiagnosticCode::new(Category::Routing, 104);
    /// Every lane is taken.
    pub const NO_FREE_LANE: DiagnosticCode = DiagnosticCode::new(Category::Routing, 105);
    /// A virtual element pairing the hardware cannot realize.
    pub const ILLEGAL_VIRTUAL: DiagnosticCode = DiagnosticCode::new(Category::Routing, 106);
    /// A virtual element instance beyond its channel count.
    pub const VIRTUAL_OUT_OF_RANGE: DiagnosticCode = DiagnosticCode::new(Category::Routing, 107);
    /// A coefficient outside `[-20, 20]`.
    pub const COEFFICIENT_OUT_OF_RANGE: DiagnosticCode = DiagnosticCode::new(Category::Routing, 108);
    /// A potentiometer id that is not a lane.
    pub const POTENTIOMETER_OUT_OF_RANGE: DiagnosticCode = DiagnosticCode::new(Category::Routing, 109);
    /// A source cross-lane taken over by an auxiliary signal.
    pub const SHADOWED_SOURCE: DiagnosticCode = DiagnosticCode::new(Category::Routing, 110);
    /// A virtual sink reached through a weighting coefficient.
    pub const SINK_COEFFICIENT: DiagnosticCode = DiagnosticCode::new(Category::Routing, 111);
    /// Two cross-lanes of a wire config claiming the same lane.
    pub const DOUBLE_ALLOCATION: DiagnosticCode = DiagnosticCode::new(Category::Codec, 201);
    /// A wire config or circuit file that cannot be decoded.
    pub const MALFORMED_PAYLOAD: DiagnosticCode = DiagnosticCode::new(Category::Codec, 202);
}

/// Hard failures that abort a routing call.
#[derive(Debug, thiserror::Error)]
pub enum RoutingFault {
    /// A virtual sink reached through a coefficient other than 0 or 1.
    #[error("virtual sink {sink} cannot be weighted, found coefficient {coeff}")]
    SinkCoefficient {
        /// The sink port.
        sink: String,
        /// The offending coefficient.
        coeff: f64,
    },
    /// A malformed element identifier or connection.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// A wire config or circuit file that cannot be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl RoutingFault {
    /// Converts this fault into a diagnostic. Catalog faults keep their `K` code.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            RoutingFault::SinkCoefficient { sink, .. } => {
                Diagnostic::error(codes::SINK_COEFFICIENT, self.to_string())
                    .with_subject(sink.clone())
                    .with_help("set the potentiometer to 1 or remove it")
            }
            RoutingFault::Catalog(err) => err.to_diagnostic(),
            RoutingFault::Codec(CodecError::DoubleAllocation(conflict)) => {
                Diagnostic::error(codes::DOUBLE_ALLOCATION, self.to_string())
                    .with_subject(RoutingSubject::Lane(conflict.lane).to_string())
            }
            RoutingFault::Codec(_) => Diagnostic::error(codes::MALFORMED_PAYLOAD, self.to_string()),
        }
    }
}

/// What a soft routing error refers to.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutingSubject {
    /// A connection as it was handed to the compiler.
    Connection(LogicalConnection),
    /// A connection after potentiometer resolution, with its lane if known.
    Route {
        /// The connection the route stands for.
        connection: LogicalConnection,
        /// The requested lane, possibly out of range.
        lane: Option<u32>,
    },
    /// A lane of the physical matrix.
    Lane(Lane),
}

impl RoutingSubject {
    /// Returns the lane this subject refers to, if any.
    pub fn lane(&self) -> Option<u32> {
        match self {
            RoutingSubject::Connection(_) => None,
            RoutingSubject::Route { lane, .. } => *lane,
            RoutingSubject::Lane(lane) => Some(u32::from(lane.as_raw())),
        }
    }
}

impl fmt::Display for RoutingSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingSubject::Connection(connection) => write!(f, "{connection}"),
            RoutingSubject::Route {
                connection,
                lane: Some(lane),
            } => write!(f, "{connection} (lane {lane})"),
            RoutingSubject::Route {
                connection,
                lane: None,
            } => write!(f, "{connection}"),
            RoutingSubject::Lane(lane) => write!(f, "lane {lane}"),
        }
    }
}

/// A non-fatal failure: the subject is dropped from the output, the rest
/// of the batch still routes.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingError {
    /// The diagnostic code, one of [`codes`].
    pub code: DiagnosticCode,
    /// Human-readable description.
    pub message: String,
    /// What failed to route.
    pub subject: RoutingSubject,
}

impl RoutingError {
    /// Creates a routing error.
    pub fn new(code: DiagnosticCode, message: impl Into<String>, subject: RoutingSubject) -> Self {
        Self {
            code,
            message: message.into(),
            subject,
        }
    }

    /// Converts this error into a diagnostic for rendering.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code, self.message.clone())
            .with_subject(self.subject.to_string());
        match self.code {
            codes::UNCONNECTED_POTENTIOMETER => {
                diag.with_help("connect both the `in` and the `out` port of the potentiometer")
            }
            codes::NO_FREE_LANE => diag.with_note("the matrix has 32 lanes"),
            codes::DOUBLE_ALLOCATION => {
                diag.with_note("the first cross-lane claiming the lane was kept")
            }
            _ => diag,
        }
    }
}

impl fmt::Display for RoutingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.message, self.subject)
    }
}

/// Collects soft errors in the order they occur.
#[derive(Debug, Default)]
pub struct ErrorAggregator {
    errors: Vec<RoutingError>,
}

impl ErrorAggregator {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error.
    pub fn push(&mut self, error: RoutingError) {
        tracing::trace!(code = %error.code, subject = %error.subject, "{}", error.message);
        self.errors.push(error);
    }

    /// Passes a success through and records a failure, dropping the item.
    pub fn collect<T>(&mut self, result: Result<T, RoutingError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.push(error);
                None
            }
        }
    }

    /// Returns the number of errors recorded.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns `true` if nothing failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Emits every recorded error into a diagnostic sink.
    pub fn report(&self, sink: &DiagnosticSink) {
        for error in &self.errors {
            sink.emit(error.to_diagnostic());
        }
    }

    /// Consumes the aggregator, returning the errors in order.
    pub fn into_errors(self) -> Vec<RoutingError> {
        self.errors
    }
}
