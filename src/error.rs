//! Error types for the fallible edges of the crate.
//!
//! Binding, dispatch and queries are total and never fail; only device
//! backends and configuration loading can.

use thiserror::Error;

use crate::config::ConfigError;
use crate::mapping::ProfileError;

#[derive(Debug, Error)]
pub enum InputError {
    /// Another exclusive device context is alive in this process.
    #[error("A device context is already active")]
    ContextAlreadyActive,

    /// The device backend could not be brought up.
    #[error("Failed to initialize input device: {0}")]
    Device(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Binding profile error: {0}")]
    Profile(#[from] ProfileError),
}
