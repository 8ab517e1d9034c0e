//! The mutable state of one simulation run.

use vectra_core::{FarmId, HostSpecies};
use vectra_space::{VectorGrids, WeatherGrids};

use crate::control::OutbreakStatus;
use crate::counters::{CumulativeCounters, DailyCounters};
use crate::farm::Farm;
use crate::movement::MovementEdge;

/// Everything one repetition mutates from day to day.
///
/// Built once by a [`ScenarioLoader`](crate::ScenarioLoader) and owned
/// exclusively by the simulation for the whole run.
#[derive(Clone, Debug)]
pub struct SimulationState {
    /// Days elapsed since the start of the run.
    pub simulation_day: u32,
    /// Day of the year (0-364) of the current simulated day.
    pub day_of_year: u32,
    /// Day of the year on simulation day zero.
    pub start_day_of_year: u32,
    /// All farms; `farms[i].id == FarmId(i)`.
    pub farms: Vec<Farm>,
    /// Vector densities and coefficients.
    pub vectors: VectorGrids,
    /// Read-only weather for the run.
    pub weather: WeatherGrids,
    /// Movement links, processed in order.
    pub edges: Vec<MovementEdge>,
    /// Today's events.
    pub daily: DailyCounters,
    /// Run totals.
    pub cumulative: CumulativeCounters,
    /// Run-level latches.
    pub outbreak: OutbreakStatus,
}

impl SimulationState {
    /// Assemble a state positioned at day zero.
    pub fn new(
        farms: Vec<Farm>,
        vectors: VectorGrids,
        weather: WeatherGrids,
        edges: Vec<MovementEdge>,
        start_day_of_year: u32,
    ) -> Self {
        Self {
            simulation_day: 0,
            day_of_year: start_day_of_year % 365,
            start_day_of_year,
            farms,
            vectors,
            weather,
            edges,
            daily: DailyCounters::default(),
            cumulative: CumulativeCounters::default(),
            outbreak: OutbreakStatus::default(),
        }
    }

    /// Farm by id.
    pub fn farm(&self, id: FarmId) -> &Farm {
        &self.farms[id.index()]
    }

    /// Mutable farm by id.
    pub fn farm_mut(&mut self, id: FarmId) -> &mut Farm {
        &mut self.farms[id.index()]
    }

    /// Mutable references to two distinct farms.
    ///
    /// # Panics
    ///
    /// Panics if `a == b`.
    pub fn farm_pair_mut(&mut self, a: FarmId, b: FarmId) -> (&mut Farm, &mut Farm) {
        let (i, j) = (a.index(), b.index());
        assert_ne!(i, j, "farm pair must be distinct");
        if i < j {
            let (lo, hi) = self.farms.split_at_mut(j);
            (&mut lo[i], &mut hi[0])
        } else {
            let (lo, hi) = self.farms.split_at_mut(i);
            (&mut hi[0], &mut lo[j])
        }
    }

    /// Infected animals of one species over all farms.
    pub fn total_infected(&self, species: HostSpecies) -> u64 {
        self.farms
            .iter()
            .map(|f| u64::from(f.herd(species).infected()))
            .sum()
    }

    /// Animals of one species over all farms.
    pub fn total_animals(&self, species: HostSpecies) -> u64 {
        self.farms
            .iter()
            .map(|f| u64::from(f.herd(species).total()))
            .sum()
    }

    /// Farms currently under a movement ban.
    pub fn banned_farms(&self) -> usize {
        self.farms
            .iter()
            .filter(|f| f.status.movement_banned())
            .count()
    }

    /// Farms currently outside the free area.
    pub fn restricted_farms(&self) -> usize {
        self.farms.iter().filter(|f| !f.status.free_area()).count()
    }

    /// Move the clock forward one day.
    pub fn advance_day(&mut self) {
        self.simulation_day += 1;
        self.day_of_year = (self.start_day_of_year + self.simulation_day) % 365;
    }
}
