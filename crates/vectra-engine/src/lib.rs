//! Simulation engine sequencing the daily phases of a Vectra run.
//!
//! [`simulate_day`] is the only per-day entry point: it resets the daily
//! counters, runs the [`DayPipeline`] in its fixed order, folds the day into
//! the cumulative counters, and advances the clock. [`Simulation`] owns one
//! repetition (state, parameters, species, random stream); [`BatchRunner`]
//! runs independent repetitions in parallel.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod batch;
pub mod day;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod simulation;
pub mod summary;

pub use batch::BatchRunner;
pub use day::simulate_day;
pub use error::EngineError;
pub use metrics::DayMetrics;
pub use pipeline::DayPipeline;
pub use simulation::Simulation;
pub use summary::RunSummary;
