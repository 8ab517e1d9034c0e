//! Vectra: a daily simulation of bluetongue spread between livestock farms
//! and the Culicoides midges that carry it.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Vectra sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use vectra::prelude::*;
//!
//! // A 50 km × 50 km landscape of 5 km cells with 30 days of 18 °C weather.
//! let grid = GridGeometry::new(0.0, 0.0, 5000.0, 10, 10).unwrap();
//! let weather = WeatherGrids::uniform(grid.clone(), 30, 18.0);
//! let scenario = ScenarioBuilder::new(grid, weather)
//!     .farm(
//!         FarmSpec::new(12_500.0, 12_500.0)
//!             .sheep(200)
//!             .infected(HostSpecies::Sheep, 0, 5),
//!     )
//!     .farm(FarmSpec::new(27_500.0, 12_500.0).cattle(80))
//!     .edge(0, 1, 0.05);
//!
//! let mut params = Parameters::default();
//! params.simulation.num_days = 30;
//! let mut sim = Simulation::new(params, &scenario, Arc::new(Culicoides), 0).unwrap();
//! let summary = sim.run();
//! assert_eq!(summary.days, 30);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `vectra-core` | IDs, parameters, vector species, random streams |
//! | [`space`] | `vectra-space` | Grid geometry, density fields, weather |
//! | [`state`] | `vectra-state` | Farms, herds, control status, counters, scenarios |
//! | [`phases`] | `vectra-phases` | The daily phases and the control coordinator |
//! | [`engine`] | `vectra-engine` | Day step, single runs, parallel batches |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, parameters, and collaborator traits (`vectra-core`).
pub use vectra_core as types;

/// Grid geometry and gridded fields (`vectra-space`).
pub use vectra_space as space;

/// Farms, herds, control status, and scenario loading (`vectra-state`).
pub use vectra_state as state;

/// The daily phases (`vectra-phases`).
///
/// Implement [`phases::Phase`] to build a custom
/// [`engine::DayPipeline`].
pub use vectra_phases as phases;

/// Day sequencing, runs, and batches (`vectra-engine`).
pub use vectra_engine as engine;

/// Common imports for typical Vectra usage.
pub mod prelude {
    // Core
    pub use vectra_core::{
        ChaChaSource, Culicoides, FarmId, HostSpecies, Parameters, RandomSource, VectorSpecies,
    };

    // Grids
    pub use vectra_space::{GridGeometry, WeatherGrids};

    // State and scenarios
    pub use vectra_state::{
        AbundanceCoefficients, FarmSpec, ScenarioBuilder, ScenarioLoader, SimulationState,
    };

    // Phases
    pub use vectra_phases::{DayContext, Phase};

    // Engine
    pub use vectra_engine::{
        simulate_day, BatchRunner, DayMetrics, DayPipeline, EngineError, RunSummary, Simulation,
    };
}
