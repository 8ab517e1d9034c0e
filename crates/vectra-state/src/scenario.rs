//! Scenario loading: building the day-zero [`SimulationState`].
//!
//! The engine only depends on the [`ScenarioLoader`] trait. The in-memory
//! [`ScenarioBuilder`] covers tests, benchmarks, and programmatic setups;
//! file-backed loaders implement the same trait.
//!
//! ```
//! use vectra_core::{HostSpecies, Parameters};
//! use vectra_space::{GridGeometry, WeatherGrids};
//! use vectra_state::{FarmSpec, ScenarioBuilder, ScenarioLoader};
//!
//! let params = Parameters::default();
//! let grid = GridGeometry::new(0.0, 0.0, 5000.0, 10, 10).unwrap();
//! let weather = WeatherGrids::uniform(grid.clone(), 200, 15.0);
//! let scenario = ScenarioBuilder::new(grid, weather)
//!     .farm(FarmSpec::new(12_500.0, 12_500.0).sheep(100).cattle(20))
//!     .farm(
//!         FarmSpec::new(22_500.0, 12_500.0)
//!             .sheep(50)
//!             .infected(HostSpecies::Sheep, 0, 5),
//!     )
//!     .edge(0, 1, 0.1);
//!
//! let state = scenario.load(&params).unwrap();
//! assert_eq!(state.farms.len(), 2);
//! assert_eq!(state.farms[1].sheep.total(), 55);
//! assert!(state.farms[1].status.ever_infected());
//! ```

use thiserror::Error;
use vectra_core::{CountyId, FarmId, GridParams, HostSpecies, Parameters};
use vectra_space::{GridGeometry, SpaceError, VectorGrids, WeatherGrids};

use crate::farm::{AbundanceCoefficients, Farm, FarmCells};
use crate::herd::Herd;
use crate::movement::MovementEdge;
use crate::state::SimulationState;

/// Errors detected while building a scenario.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioError {
    /// A farm lies outside one of the spatial layers.
    #[error("farm {farm} at ({x}, {y}) lies outside the {layer} grid")]
    FarmOutsideGrid {
        /// The farm.
        farm: FarmId,
        /// Layer that does not cover it.
        layer: &'static str,
        /// Easting.
        x: f64,
        /// Northing.
        y: f64,
    },
    /// Initial infection seeded into a stage that does not exist.
    #[error("farm {farm}: {species} stage {stage} out of range (stages = {stages})")]
    StageOutOfRange {
        /// The farm.
        farm: FarmId,
        /// Species seeded.
        species: HostSpecies,
        /// Requested stage.
        stage: usize,
        /// Configured stage count.
        stages: usize,
    },
    /// A movement edge names a farm that does not exist.
    #[error("movement edge {edge} references unknown farm {farm}")]
    DanglingEdge {
        /// Edge position in the list.
        edge: usize,
        /// Unknown endpoint.
        farm: FarmId,
    },
    /// A movement edge starts and ends at the same farm.
    #[error("movement edge {edge} is a self-loop on farm {farm}")]
    SelfLoop {
        /// Edge position in the list.
        edge: usize,
        /// The farm.
        farm: FarmId,
    },
    /// A movement probability outside `[0, 1]`.
    #[error("movement edge {edge} has probability {probability} outside [0, 1]")]
    InvalidEdgeProbability {
        /// Edge position in the list.
        edge: usize,
        /// The probability.
        probability: f64,
    },
    /// Weather layers end before the run does.
    #[error("weather covers {days} days but the run needs {required}")]
    WeatherTooShort {
        /// Days available.
        days: usize,
        /// Days required.
        required: usize,
    },
    /// The farm collection does not fit the identifier space.
    #[error("{count} farms exceed the supported maximum")]
    TooManyFarms {
        /// Number of farms supplied.
        count: usize,
    },
    /// A spatial layer could not be assembled.
    #[error(transparent)]
    Space(#[from] SpaceError),
}

/// Populates the day-zero state of a run.
///
/// Called once per repetition; implementations must return an identical
/// state on every call so repetitions differ only in their random streams.
pub trait ScenarioLoader: Send + Sync {
    /// Build the state for a run configured by `params`.
    fn load(&self, params: &Parameters) -> Result<SimulationState, ScenarioError>;
}

/// Description of one farm for [`ScenarioBuilder`].
#[derive(Clone, Debug, PartialEq)]
pub struct FarmSpec {
    x: f64,
    y: f64,
    county: CountyId,
    sheep: u32,
    cattle: u32,
    infected: Vec<(HostSpecies, usize, u32)>,
    abundance: AbundanceCoefficients,
    rel_local_weight: Option<f64>,
}

impl FarmSpec {
    /// An empty farm at `(x, y)` in county 0.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            county: CountyId(0),
            sheep: 0,
            cattle: 0,
            infected: Vec::new(),
            abundance: AbundanceCoefficients::default(),
            rel_local_weight: None,
        }
    }

    /// Set the county.
    pub fn county(mut self, county: u32) -> Self {
        self.county = CountyId(county);
        self
    }

    /// Susceptible sheep.
    pub fn sheep(mut self, n: u32) -> Self {
        self.sheep = n;
        self
    }

    /// Susceptible cattle.
    pub fn cattle(mut self, n: u32) -> Self {
        self.cattle = n;
        self
    }

    /// Add `n` infected animals of `species` in infectious `stage`, on top of
    /// the susceptible count.
    pub fn infected(mut self, species: HostSpecies, stage: usize, n: u32) -> Self {
        self.infected.push((species, stage, n));
        self
    }

    /// Abundance model coefficients.
    pub fn abundance(mut self, coefficients: AbundanceCoefficients) -> Self {
        self.abundance = coefficients;
        self
    }

    /// Override the share of local vector bites this farm receives.
    ///
    /// By default the share is the farm's preference-weighted head count
    /// over the total of all farms in its vector cell.
    pub fn rel_local_weight(mut self, weight: f64) -> Self {
        self.rel_local_weight = Some(weight);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
struct VectorSeed {
    x: f64,
    y: f64,
    radius: f64,
    density: f64,
}

/// In-memory [`ScenarioLoader`].
#[derive(Clone, Debug)]
pub struct ScenarioBuilder {
    vector_geometry: GridGeometry,
    weather: WeatherGrids,
    farms: Vec<FarmSpec>,
    edges: Vec<MovementEdge>,
    diffusion: Option<Vec<f64>>,
    seeds: Vec<VectorSeed>,
}

impl ScenarioBuilder {
    /// Start a scenario on a vector grid with the given weather.
    pub fn new(vector_geometry: GridGeometry, weather: WeatherGrids) -> Self {
        Self {
            vector_geometry,
            weather,
            farms: Vec::new(),
            edges: Vec::new(),
            diffusion: None,
            seeds: Vec::new(),
        }
    }

    /// Add a farm; it receives the next [`FarmId`].
    pub fn farm(mut self, spec: FarmSpec) -> Self {
        self.farms.push(spec);
        self
    }

    /// Add a movement edge between farms by position.
    pub fn edge(mut self, from: u32, to: u32, probability: f64) -> Self {
        self.edges
            .push(MovementEdge::new(FarmId(from), FarmId(to), probability));
        self
    }

    /// Use a per-cell diffusion coefficient instead of the uniform one
    /// derived from the diffusion length scale.
    pub fn diffusion_field(mut self, values: Vec<f64>) -> Self {
        self.diffusion = Some(values);
        self
    }

    /// Add `density` infectious vectors to every vector cell whose centre is
    /// within `radius` of `(x, y)`.
    pub fn seed_infectious_vectors(mut self, x: f64, y: f64, radius: f64, density: f64) -> Self {
        self.seeds.push(VectorSeed {
            x,
            y,
            radius,
            density,
        });
        self
    }

    fn locate(
        geometry: &GridGeometry,
        layer: &'static str,
        farm: FarmId,
        spec: &FarmSpec,
    ) -> Result<usize, ScenarioError> {
        geometry
            .cell_of(spec.x, spec.y)
            .ok_or(ScenarioError::FarmOutsideGrid {
                farm,
                layer,
                x: spec.x,
                y: spec.y,
            })
    }

    fn build_farm(
        &self,
        params: &Parameters,
        id: FarmId,
        spec: &FarmSpec,
    ) -> Result<Farm, ScenarioError> {
        let cells = FarmCells {
            vector: Self::locate(&self.vector_geometry, "vector", id, spec)?,
            temperature: Self::locate(
                self.weather.temperature.geometry(),
                "temperature",
                id,
                spec,
            )?,
            rainfall: Self::locate(self.weather.rainfall.geometry(), "rainfall", id, spec)?,
            autocorr: Self::locate(&self.weather.autocorr_geometry, "autocorrelation", id, spec)?,
        };
        let sheep = Herd::new(spec.sheep, params.epi.inf_stages(HostSpecies::Sheep));
        let cattle = Herd::new(spec.cattle, params.epi.inf_stages(HostSpecies::Cattle));
        let mut farm = Farm::new(id, spec.x, spec.y, spec.county, cells, sheep, cattle);
        farm.abundance = spec.abundance.clone();

        for &(species, stage, n) in &spec.infected {
            let herd = farm.herd_mut(species);
            let stages = herd.stages();
            let slot = herd
                .infectious
                .get_mut(stage)
                .ok_or(ScenarioError::StageOutOfRange {
                    farm: id,
                    species,
                    stage,
                    stages,
                })?;
            *slot += n;
        }
        if farm.infected() > 0 {
            farm.status.mark_infected();
        }
        Ok(farm)
    }

    fn check_edges(&self, farm_count: usize) -> Result<(), ScenarioError> {
        for (i, edge) in self.edges.iter().enumerate() {
            for endpoint in [edge.from, edge.to] {
                if endpoint.index() >= farm_count {
                    return Err(ScenarioError::DanglingEdge {
                        edge: i,
                        farm: endpoint,
                    });
                }
            }
            if edge.from == edge.to {
                return Err(ScenarioError::SelfLoop {
                    edge: i,
                    farm: edge.from,
                });
            }
            if !(0.0..=1.0).contains(&edge.probability) {
                return Err(ScenarioError::InvalidEdgeProbability {
                    edge: i,
                    probability: edge.probability,
                });
            }
        }
        Ok(())
    }
}

impl ScenarioLoader for ScenarioBuilder {
    fn load(&self, params: &Parameters) -> Result<SimulationState, ScenarioError> {
        let required = params.simulation.num_days as usize;
        if self.weather.days() < required {
            return Err(ScenarioError::WeatherTooShort {
                days: self.weather.days(),
                required,
            });
        }
        if u32::try_from(self.farms.len()).is_err() {
            return Err(ScenarioError::TooManyFarms {
                count: self.farms.len(),
            });
        }

        let mut farms = Vec::with_capacity(self.farms.len());
        for (i, spec) in self.farms.iter().enumerate() {
            farms.push(self.build_farm(params, FarmId(i as u32), spec)?);
        }
        self.check_edges(farms.len())?;

        let uniform = GridParams::diffusion_coefficient(params.epi.diffusion_length_scale);
        let mut vectors =
            VectorGrids::new(self.vector_geometry.clone(), params.epi.num_eip_stages, uniform);
        if let Some(values) = &self.diffusion {
            vectors = vectors.with_diffusion_field(values.clone())?;
        }

        let pref = params.epi.preference_for_sheep;
        for farm in &farms {
            vectors.biting_preference[farm.cells.vector] += farm.effective_animals(pref);
        }
        for (farm, spec) in farms.iter_mut().zip(&self.farms) {
            let cell_total = vectors.biting_preference[farm.cells.vector];
            farm.rel_local_weight = spec.rel_local_weight.unwrap_or(if cell_total > 0.0 {
                farm.effective_animals(pref) / cell_total
            } else {
                0.0
            });
        }

        for seed in &self.seeds {
            let r2 = seed.radius * seed.radius;
            for cell in 0..self.vector_geometry.cell_count() {
                let (cx, cy) = self.vector_geometry.cell_centre(cell);
                let (dx, dy) = (cx - seed.x, cy - seed.y);
                if dx * dx + dy * dy <= r2 {
                    vectors.infectious[cell] += seed.density;
                }
            }
        }

        Ok(SimulationState::new(
            farms,
            vectors,
            self.weather.clone(),
            self.edges.clone(),
            params.simulation.start_day_of_year,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridGeometry {
        GridGeometry::new(0.0, 0.0, 1000.0, 5, 5).unwrap()
    }

    fn builder() -> ScenarioBuilder {
        ScenarioBuilder::new(grid(), WeatherGrids::uniform(grid(), 400, 20.0))
    }

    #[test]
    fn farms_get_sequential_ids_and_cells() {
        let state = builder()
            .farm(FarmSpec::new(500.0, 500.0))
            .farm(FarmSpec::new(2500.0, 1500.0))
            .load(&Parameters::default())
            .unwrap();
        assert_eq!(state.farms[1].id, FarmId(1));
        assert_eq!(state.farms[1].cells.vector, grid().flat(1, 2));
        assert_eq!(state.farms[1].cells.temperature, grid().flat(1, 2));
    }

    #[test]
    fn farm_outside_grid_is_rejected() {
        let err = builder()
            .farm(FarmSpec::new(9_000.0, 0.0))
            .load(&Parameters::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::FarmOutsideGrid {
                layer: "vector",
                ..
            }
        ));
    }

    #[test]
    fn infected_stage_must_exist() {
        let err = builder()
            .farm(FarmSpec::new(500.0, 500.0).infected(HostSpecies::Cattle, 9, 1))
            .load(&Parameters::default())
            .unwrap_err();
        assert!(matches!(err, ScenarioError::StageOutOfRange { stage: 9, .. }));
    }

    #[test]
    fn edges_are_validated() {
        let two = builder()
            .farm(FarmSpec::new(500.0, 500.0))
            .farm(FarmSpec::new(1500.0, 500.0));
        let p = Parameters::default();
        assert!(matches!(
            two.clone().edge(0, 2, 0.5).load(&p),
            Err(ScenarioError::DanglingEdge { edge: 0, .. })
        ));
        assert!(matches!(
            two.clone().edge(1, 1, 0.5).load(&p),
            Err(ScenarioError::SelfLoop { .. })
        ));
        assert!(matches!(
            two.clone().edge(0, 1, 1.5).load(&p),
            Err(ScenarioError::InvalidEdgeProbability { .. })
        ));
        assert_eq!(two.edge(0, 1, 1.0).load(&p).unwrap().edges.len(), 1);
    }

    #[test]
    fn short_weather_is_rejected() {
        let mut p = Parameters::default();
        p.simulation.num_days = 500;
        assert!(matches!(
            builder().load(&p),
            Err(ScenarioError::WeatherTooShort {
                days: 400,
                required: 500
            })
        ));
    }

    #[test]
    fn uniform_diffusion_from_length_scale() {
        let mut p = Parameters::default();
        p.epi.diffusion_length_scale = 200.0;
        let state = builder().load(&p).unwrap();
        assert_eq!(state.vectors.diffusion[7], 10_000.0);
    }

    #[test]
    fn local_weight_splits_cell_between_farms() {
        let mut p = Parameters::default();
        p.epi.preference_for_sheep = 0.5;
        let state = builder()
            .farm(FarmSpec::new(100.0, 100.0).cattle(30))
            .farm(FarmSpec::new(200.0, 200.0).sheep(20))
            .farm(FarmSpec::new(4500.0, 4500.0).cattle(5).rel_local_weight(0.3))
            .load(&p)
            .unwrap();
        assert_eq!(state.vectors.biting_preference[0], 40.0);
        assert!((state.farms[0].rel_local_weight - 0.75).abs() < 1e-12);
        assert!((state.farms[1].rel_local_weight - 0.25).abs() < 1e-12);
        assert_eq!(state.farms[2].rel_local_weight, 0.3);
    }

    #[test]
    fn seeding_fills_cells_within_radius() {
        let state = builder()
            .seed_infectious_vectors(2500.0, 2500.0, 1000.0, 4.0)
            .load(&Parameters::default())
            .unwrap();
        // Centre cell plus its four neighbours have centres within 1000 m.
        assert_eq!(state.vectors.infectious.sum(), 20.0);
        assert_eq!(state.vectors.infectious[grid().flat(2, 2)], 4.0);
        assert_eq!(state.vectors.infectious[grid().flat(1, 1)], 0.0);
    }

    #[test]
    fn start_day_of_year_is_applied() {
        let mut p = Parameters::default();
        p.simulation.start_day_of_year = 120;
        let state = builder().load(&p).unwrap();
        assert_eq!(state.day_of_year, 120);
        assert_eq!(state.simulation_day, 0);
    }
}
