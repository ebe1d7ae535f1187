//! Error types for element kinds and identifiers.

use lucidac_diagnostics::{Category, Diagnostic, DiagnosticCode};

/// Errors raised when an element kind, port, or identifier string is invalid.
///
/// These are hard errors: the request itself is malformed and nothing is
/// compiled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The kind name is not in the catalog.
    #[error("unknown element kind '{0}'")]
    UnknownElementKind(String),

    /// The element kind has no port with this name.
    #[error("element kind {kind} has no port '{port}'")]
    UnknownPort {
        /// The element kind name.
        kind: &'static str,
        /// The requested port name.
        port: String,
    },

    /// An element or port identifier does not match `{kind}{id}` or `{kind}{id}{port}`.
    #[error("malformed element identifier '{0}'")]
    MalformedIdentifier(String),

    /// Two ports cannot be wired in this direction.
    #[error("cannot connect {from} to {to}: {reason}")]
    InvalidConnection {
        /// The port used as the signal source.
        from: String,
        /// The port used as the signal target.
        to: String,
        /// Why the pairing is rejected.
        reason: &'static str,
    },
}

impl CatalogError {
    /// The diagnostic code of this error, in the `K` range.
    pub fn code(&self) -> DiagnosticCode {
        let number = match self {
            CatalogError::UnknownElementKind(_) => 301,
            CatalogError::UnknownPort { .. } => 302,
            CatalogError::MalformedIdentifier(_) => 303,
            CatalogError::InvalidConnection { .. } => 304,
        };
        DiagnosticCode::new(Category::Catalog, number)
    }

    /// Converts this error into a diagnostic about the offending identifier.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string());
        match self {
            CatalogError::UnknownElementKind(kind) => diag
                .with_subject(kind.clone())
                .with_help("element kinds are Int, Mul, Pot, Extin, Const, Daq and Extout"),
            CatalogError::UnknownPort { kind, port } => diag.with_subject(format!("{kind}{port}")),
            CatalogError::MalformedIdentifier(id) => diag
                .with_subject(id.clone())
                .with_note("identifiers read `{kind}{id}{port}`, e.g. `Int0out`"),
            CatalogError::InvalidConnection { from, to, .. } => {
                diag.with_subject(format!("{from} -> {to}"))
            }
        }
    }
}
