//! Core types and collaborator traits for the Vectra simulation.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Vectra workspace:
//! identifiers, host species, run parameters, error types, the pluggable
//! vector-species rate curves, and the explicit random-draw stream.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod host;
pub mod id;
pub mod params;
pub mod rng;
pub mod species;

pub use error::ConfigError;
pub use host::HostSpecies;
pub use id::{CountyId, FarmId};
pub use params::{
    AbundanceParams, ControlParams, EpiParams, GridParams, MovementParams, Parameters,
    PoissonApprox, SimulationParams,
};
pub use rng::{poisson_cdf, poisson_pmf, poisson_sf, ChaChaSource, RandomSource};
pub use species::{Culicoides, VectorSpecies};

/// Upper bound on Erlang stage counts (infectious and incubation).
///
/// Stage vectors are sized from parameters at setup; this bound only
/// guards against configurations that would make the Poisson stage
/// redistribution numerically meaningless.
pub const MAX_STAGES: usize = 20;
