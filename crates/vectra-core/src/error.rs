//! Error types for parameter loading and validation.
//!
//! The daily simulation step has no failure surface; errors only arise
//! while building a run (reading and validating configuration).

use std::path::PathBuf;
use thiserror::Error;

/// Errors detected while loading or validating [`Parameters`](crate::Parameters).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A parameter value is outside its valid domain.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Dotted parameter path, e.g. `epi.p_h`.
        name: &'static str,
        /// What is wrong with the value.
        reason: String,
    },
    /// The TOML document could not be parsed into parameters.
    #[error("failed to parse parameters: {0}")]
    Parse(#[from] toml::de::Error),
    /// The parameter file could not be read.
    #[error("failed to read parameter file {path}: {source}")]
    Io {
        /// File that was requested.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
