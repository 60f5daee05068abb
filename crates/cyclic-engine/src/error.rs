//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode between loading the config and
//! writing the last output file.

use std::path::PathBuf;

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: cyclic_core::config::ConfigError,
    },

    /// The configured parameters are out of range.
    #[error("parameter error: {source}")]
    Parameter {
        /// The underlying validation error.
        #[from]
        source: cyclic_core::ParameterError,
    },

    /// The simulation itself failed.
    #[error("simulation error: {source}")]
    Core {
        /// The underlying core error.
        #[from]
        source: cyclic_core::CoreError,
    },

    /// Writing an output file failed.
    #[error("failed to write {}: {source}", path.display())]
    Output {
        /// File or directory being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Serializing the run summary failed.
    #[error("failed to serialize run summary: {source}")]
    Summary {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
