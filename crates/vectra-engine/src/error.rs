//! Errors raised while building a run.

use thiserror::Error;
use vectra_core::ConfigError;
use vectra_state::ScenarioError;

/// Errors detected while constructing a [`Simulation`](crate::Simulation).
///
/// Once a run is built, stepping it cannot fail.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Parameters failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The scenario could not be loaded.
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    /// The diffusion timestep violates the explicit-scheme stability bound.
    #[error("timestep {dt} exceeds the stability bound {max_dt} of phase `{phase}`")]
    DiffusionUnstable {
        /// Phase whose bound is violated.
        phase: String,
        /// Configured timestep.
        dt: f64,
        /// Largest stable timestep.
        max_dt: f64,
    },
    /// A loaded grid does not have the configured cell width.
    #[error("{layer} grid has cell width {actual}, configured {expected}")]
    GridWidthMismatch {
        /// Grid layer.
        layer: &'static str,
        /// Width from the parameters.
        expected: f64,
        /// Width of the loaded grid.
        actual: f64,
    },
    /// A vector cell centre lies outside the temperature grid.
    #[error("vector cell {cell} has no temperature cell")]
    TemperatureCoverage {
        /// Flat index of the uncovered vector cell.
        cell: usize,
    },
}
