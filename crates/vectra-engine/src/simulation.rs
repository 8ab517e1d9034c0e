//! A single repetition of the simulation.

use std::sync::Arc;

use tracing::info;
use vectra_core::{ChaChaSource, Parameters, VectorSpecies};
use vectra_space::GridGeometry;
use vectra_state::{ScenarioError, ScenarioLoader, SimulationState};

use crate::day::simulate_day;
use crate::error::EngineError;
use crate::metrics::DayMetrics;
use crate::pipeline::DayPipeline;
use crate::summary::RunSummary;

/// Relative tolerance when comparing loaded grid widths against parameters.
const WIDTH_TOLERANCE: f64 = 1e-9;

/// One repetition: state, parameters, vector species, and random stream.
///
/// Construction validates everything that could make a day ill-defined, so
/// [`step`](Self::step) is infallible.
pub struct Simulation {
    repetition: u32,
    params: Parameters,
    species: Arc<dyn VectorSpecies>,
    state: SimulationState,
    rng: ChaChaSource,
    pipeline: DayPipeline,
}

impl Simulation {
    /// Build repetition `repetition` of the scenario provided by `loader`.
    ///
    /// The random stream is `params.simulation.seed` on stream
    /// `repetition`, so repetitions are independent and reproducible.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the parameters are invalid, the scenario
    /// fails to load, a grid does not match its configured width, a vector
    /// cell has no temperature cell, or the timestep is unstable for the
    /// loaded diffusion field.
    pub fn new(
        params: Parameters,
        loader: &dyn ScenarioLoader,
        species: Arc<dyn VectorSpecies>,
        repetition: u32,
    ) -> Result<Self, EngineError> {
        params.validate()?;
        let state = loader.load(&params)?;
        let pipeline = DayPipeline::standard();
        check_state(&state, &params, &pipeline)?;
        let rng = ChaChaSource::for_repetition(params.simulation.seed, repetition);
        Ok(Self {
            repetition,
            params,
            species,
            state,
            rng,
            pipeline,
        })
    }

    /// Simulate one day.
    ///
    /// # Panics
    ///
    /// Panics if the run has already simulated `num_days` days.
    pub fn step(&mut self) {
        assert!(
            !self.is_finished(),
            "repetition {} already ran {} days",
            self.repetition,
            self.params.simulation.num_days
        );
        simulate_day(
            &mut self.pipeline,
            &mut self.state,
            &self.params,
            &*self.species,
            &mut self.rng,
        );
    }

    /// Simulate the remaining days and summarise the run.
    pub fn run(&mut self) -> RunSummary {
        while !self.is_finished() {
            self.step();
        }
        self.summary()
    }

    /// Whether every configured day has been simulated.
    pub fn is_finished(&self) -> bool {
        self.state.simulation_day >= self.params.simulation.num_days
    }

    /// Summary of the run so far.
    pub fn summary(&self) -> RunSummary {
        RunSummary::from_state(self.repetition, &self.state)
    }

    /// Current state.
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Run parameters.
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Repetition index.
    pub fn repetition(&self) -> u32 {
        self.repetition
    }

    /// Timings of the most recent day.
    pub fn last_metrics(&self) -> &DayMetrics {
        self.pipeline.last_metrics()
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("repetition", &self.repetition)
            .field("species", &self.species.name())
            .field("day", &self.state.simulation_day)
            .field("farms", &self.state.farms.len())
            .finish_non_exhaustive()
    }
}

fn check_width(layer: &'static str, geometry: &GridGeometry, expected: f64) -> Result<(), EngineError> {
    let actual = geometry.cell_width();
    if (actual - expected).abs() > WIDTH_TOLERANCE * expected.abs() {
        return Err(EngineError::GridWidthMismatch {
            layer,
            expected,
            actual,
        });
    }
    Ok(())
}

fn check_state(
    state: &SimulationState,
    params: &Parameters,
    pipeline: &DayPipeline,
) -> Result<(), EngineError> {
    let grids = &params.grids;
    check_width("vector", &state.vectors.geometry, grids.vector_grid_width)?;
    check_width("temperature", state.weather.temperature.geometry(), grids.temp_grid_width)?;
    check_width("rainfall", state.weather.rainfall.geometry(), grids.rain_grid_width)?;
    check_width("autocorrelation", &state.weather.autocorr_geometry, grids.autocorr_grid_width)?;

    let required = params.simulation.num_days as usize;
    if state.weather.days() < required {
        return Err(ScenarioError::WeatherTooShort {
            days: state.weather.days(),
            required,
        }
        .into());
    }

    let vectors = &state.vectors.geometry;
    let temperature = state.weather.temperature.geometry();
    for cell in 0..vectors.cell_count() {
        let (x, y) = vectors.cell_centre(cell);
        if temperature.cell_of(x, y).is_none() {
            return Err(EngineError::TemperatureCoverage { cell });
        }
    }

    if let Some((phase, max_dt)) = pipeline.max_dt(state) {
        let dt = params.simulation.dt;
        if dt > max_dt {
            return Err(EngineError::DiffusionUnstable {
                phase: phase.to_string(),
                dt,
                max_dt,
            });
        }
    }

    info!(
        farms = state.farms.len(),
        edges = state.edges.len(),
        vector_cells = vectors.cell_count(),
        days = params.simulation.num_days,
        "scenario loaded"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vectra_test_utils::{cell_centre_farm, test_params, test_scenario, ConstantSpecies};

    fn species() -> Arc<dyn VectorSpecies> {
        Arc::new(ConstantSpecies::inert())
    }

    #[test]
    fn runs_all_days() {
        let params = test_params(4);
        let loader = test_scenario(3, 3, 4, 15.0).farm(cell_centre_farm(1, 1).sheep(3));
        let mut sim = Simulation::new(params, &loader, species(), 0).unwrap();
        let summary = sim.run();
        assert!(sim.is_finished());
        assert_eq!(summary.days, 4);
        assert_eq!(sim.last_metrics().day, 3);
    }

    #[test]
    #[should_panic(expected = "already ran")]
    fn stepping_past_the_end_panics() {
        let loader = test_scenario(3, 3, 1, 15.0);
        let mut sim = Simulation::new(test_params(1), &loader, species(), 0).unwrap();
        sim.step();
        sim.step();
    }

    #[test]
    fn rejects_invalid_parameters() {
        let mut params = test_params(1);
        params.epi.p_h = 2.0;
        let loader = test_scenario(3, 3, 1, 15.0);
        assert!(matches!(
            Simulation::new(params, &loader, species(), 0),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn rejects_grid_width_mismatch() {
        let mut params = test_params(1);
        params.grids.temp_grid_width = 5000.0;
        let loader = test_scenario(3, 3, 1, 15.0);
        assert!(matches!(
            Simulation::new(params, &loader, species(), 0),
            Err(EngineError::GridWidthMismatch {
                layer: "temperature",
                ..
            })
        ));
    }

    #[test]
    fn rejects_unstable_timestep() {
        let mut params = test_params(1);
        params.epi.diffusion_length_scale = 1500.0;
        params.simulation.dt = 0.5;
        let loader = test_scenario(3, 3, 1, 15.0);
        // D = 562 500, bound = 10⁶ / (4 D) ≈ 0.44
        let err = Simulation::new(params, &loader, species(), 0).unwrap_err();
        assert!(matches!(err, EngineError::DiffusionUnstable { dt, .. } if dt == 0.5));
    }

    #[test]
    fn weather_must_cover_the_run() {
        let loader = test_scenario(3, 3, 2, 15.0);
        assert!(matches!(
            Simulation::new(test_params(5), &loader, species(), 0),
            Err(EngineError::Scenario(ScenarioError::WeatherTooShort { .. }))
        ));
    }
}
