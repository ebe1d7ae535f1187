//! Error types for configuration loading and validation.

use crate::loader::CONFIG_FILE;
use lucidac_diagnostics::{Category, Diagnostic, DiagnosticCode};

/// Errors that can occur when loading or validating a `lucidac.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// An M-block slot names a block kind that does not exist.
    #[error("unknown M-block kind '{0}' (expected \"Mul\" or \"Int\")")]
    UnknownBlockKind(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}

impl ConfigError {
    /// The diagnostic code of this error, in the `G` range.
    pub fn code(&self) -> DiagnosticCode {
        let number = match self {
            ConfigError::IoError(_) => 401,
            ConfigError::ParseError(_) => 402,
            ConfigError::UnknownBlockKind(_) => 403,
            ConfigError::ValidationError(_) => 404,
        };
        DiagnosticCode::new(Category::Config, number)
    }

    /// Converts this error into a diagnostic about the configuration file.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string()).with_subject(CONFIG_FILE);
        match self {
            ConfigError::UnknownBlockKind(_) => {
                diag.with_help("use `slots = [\"Mul\", \"Int\"]` for the standard LUCIDAC")
            }
            ConfigError::IoError(_) | ConfigError::ParseError(_) | ConfigError::ValidationError(_) => {
                diag
            }
        }
    }
}
