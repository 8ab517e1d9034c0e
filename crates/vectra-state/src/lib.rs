//! Mutable simulation state for Vectra.
//!
//! Farms and grids are allocated once when a scenario is loaded and are
//! mutated in place every simulated day. Nothing here is resized mid-run.
//!
//! Control flags on farms and the run-level outbreak latches only ever
//! turn on; their fields are private and exposed through latching setters.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod control;
pub mod counters;
pub mod farm;
pub mod herd;
pub mod movement;
pub mod scenario;
pub mod state;

pub use control::{ControlStatus, OutbreakStatus};
pub use counters::{CumulativeCounters, DailyCounters};
pub use farm::{AbundanceCoefficients, Farm, FarmCells, FarmWeather};
pub use herd::Herd;
pub use movement::MovementEdge;
pub use scenario::{FarmSpec, ScenarioBuilder, ScenarioError, ScenarioLoader};
pub use state::SimulationState;
