//! Parsing and validation of `lucidac.toml` hardware configuration files.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`LucidacConfig`], which [`resolve_hardware`] turns into the slot layout
//! and default integrator state used by the router and codec.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use resolve::{resolve_hardware, ResolvedHardware};
pub use types::*;
