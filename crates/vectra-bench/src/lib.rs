//! Benchmark scenarios for the Vectra simulation.
//!
//! - [`reference_scenario`]: 100×100 grid of 5 km cells, 2 000 farms,
//!   4 000 movement edges, and a seeded patch of infectious vectors
//! - [`reference_params`]: parameters matching it

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use vectra_core::{HostSpecies, Parameters};
use vectra_space::{GridGeometry, WeatherGrids};
use vectra_state::{FarmSpec, ScenarioBuilder};

/// Cell width of the reference grid, in metres.
pub const CELL: f64 = 5000.0;
/// Rows and columns of the reference grid.
pub const SIDE: usize = 100;

/// Parameters for [`reference_scenario`] over `days` days, starting in the
/// biting season.
pub fn reference_params(days: u32) -> Parameters {
    let mut params = Parameters::default();
    params.simulation.num_days = days;
    params.simulation.start_day_of_year = 150;
    params
}

/// Deterministic pseudo-random value in `[0, 1)` for index `i`.
fn scatter(i: u64, salt: u64) -> f64 {
    let h = i.wrapping_add(salt).wrapping_mul(6364136223846793007).rotate_left(29);
    (h >> 11) as f64 / (1u64 << 53) as f64
}

/// Build the reference scenario with `days` days of weather.
///
/// Farm positions, herd sizes, and edges are fixed functions of the index,
/// so every call builds the same scenario.
pub fn reference_scenario(days: usize) -> ScenarioBuilder {
    let grid = GridGeometry::new(0.0, 0.0, CELL, SIDE, SIDE).expect("reference grid is valid");
    let extent = CELL * SIDE as f64;
    let weather = WeatherGrids::uniform(grid.clone(), days, 19.0);
    let mut builder = ScenarioBuilder::new(grid, weather);

    let farms = 2000u64;
    for i in 0..farms {
        let x = CELL + scatter(i, 1) * (extent - 2.0 * CELL);
        let y = CELL + scatter(i, 2) * (extent - 2.0 * CELL);
        let mut spec = FarmSpec::new(x, y)
            .sheep((scatter(i, 3) * 400.0) as u32)
            .cattle((scatter(i, 4) * 150.0) as u32)
            .county((i % 40) as u32);
        if i % 200 == 0 {
            spec = spec.infected(HostSpecies::Sheep, 0, 10);
        }
        builder = builder.farm(spec);
    }
    for i in 0..2 * farms {
        let from = (scatter(i, 5) * farms as f64) as u32;
        let to = ((u64::from(from) + 1 + (scatter(i, 6) * (farms - 1) as f64) as u64) % farms) as u32;
        builder = builder.edge(from, to, 0.02);
    }
    builder.seed_infectious_vectors(extent / 2.0, extent / 2.0, 4.0 * CELL, 20.0)
}
