//! Reusable scenario fixtures.
//!
//! All fixtures use a 1 km vector/weather grid with its origin at `(0, 0)`.

use vectra_core::Parameters;
use vectra_space::{GridGeometry, WeatherGrids};
use vectra_state::{FarmSpec, ScenarioBuilder};

/// Cell width of every fixture grid, in metres.
pub const CELL: f64 = 1000.0;

/// A `rows × cols` grid of 1 km cells.
pub fn test_grid(rows: usize, cols: usize) -> GridGeometry {
    GridGeometry::new(0.0, 0.0, CELL, rows, cols).expect("fixture grid is valid")
}

/// Parameters matching the fixture grids, with passive detection, control,
/// and vector spread all switched off.
pub fn test_params(num_days: u32) -> Parameters {
    let mut p = Parameters::default();
    p.simulation.num_days = num_days;
    p.simulation.dt = 0.1;
    p.grids.vector_grid_width = CELL;
    p.grids.temp_grid_width = CELL;
    p.grids.rain_grid_width = CELL;
    p.grids.autocorr_grid_width = CELL;
    p.epi.detection_prob_cattle = 0.0;
    p.epi.detection_prob_sheep = 0.0;
    p.epi.diffusion_length_scale = 0.0;
    p.control.enabled = false;
    p
}

/// A scenario on a `rows × cols` grid with constant temperature over
/// `days` days and no farms yet.
pub fn test_scenario(rows: usize, cols: usize, days: usize, temperature: f64) -> ScenarioBuilder {
    let grid = test_grid(rows, cols);
    ScenarioBuilder::new(grid.clone(), WeatherGrids::uniform(grid, days, temperature))
}

/// A farm at the centre of cell `(row, col)`.
pub fn cell_centre_farm(row: usize, col: usize) -> FarmSpec {
    FarmSpec::new((col as f64 + 0.5) * CELL, (row as f64 + 0.5) * CELL)
}
