//! End-of-run summaries.

use serde::Serialize;
use vectra_core::FarmId;
use vectra_state::{CumulativeCounters, SimulationState};

/// Outcome of one repetition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Repetition index.
    pub repetition: u32,
    /// Days simulated.
    pub days: u32,
    /// Run totals.
    pub cumulative: CumulativeCounters,
    /// Farms that carried infection at any point.
    pub farms_ever_infected: usize,
    /// Farms detected at any point.
    pub farms_ever_detected: usize,
    /// First farm detected, if the outbreak was observed.
    pub first_detected: Option<FarmId>,
}

impl RunSummary {
    /// Summarise `state` as the result of `repetition`.
    pub fn from_state(repetition: u32, state: &SimulationState) -> Self {
        Self {
            repetition,
            days: state.simulation_day,
            cumulative: state.cumulative.clone(),
            farms_ever_infected: state
                .farms
                .iter()
                .filter(|f| f.status.ever_infected())
                .count(),
            farms_ever_detected: state
                .farms
                .iter()
                .filter(|f| f.status.ever_detected())
                .count(),
            first_detected: state.outbreak.first_detected(),
        }
    }
}
