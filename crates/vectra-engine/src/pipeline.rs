//! The fixed daily phase order.

use vectra_phases::{
    ControlMeasures, FarmEpidemics, MovementTransmission, Phase, VectorDiffusion,
    VectorMortalityIncubation,
};
use vectra_state::SimulationState;

use crate::metrics::DayMetrics;

/// Ordered list of phases run every day, plus the timings of the last day.
///
/// Later phases read state written by earlier ones, so the order is part of
/// the model: control, vector mortality and incubation, vector diffusion,
/// movement, farm epidemics.
pub struct DayPipeline {
    phases: Vec<Box<dyn Phase>>,
    last_metrics: DayMetrics,
}

impl DayPipeline {
    /// The standard five-phase day.
    pub fn standard() -> Self {
        Self::from_phases(vec![
            Box::new(ControlMeasures),
            Box::new(VectorMortalityIncubation),
            Box::new(VectorDiffusion),
            Box::new(MovementTransmission),
            Box::new(FarmEpidemics),
        ])
    }

    /// A pipeline running `phases` in the given order.
    pub fn from_phases(phases: Vec<Box<dyn Phase>>) -> Self {
        Self {
            phases,
            last_metrics: DayMetrics::default(),
        }
    }

    /// Phases in execution order.
    pub fn phases(&self) -> &[Box<dyn Phase>] {
        &self.phases
    }

    /// Phase names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.phases.iter().map(|p| p.name()).collect()
    }

    /// The tightest timestep bound declared by any phase, with its phase.
    pub fn max_dt(&self, state: &SimulationState) -> Option<(&str, f64)> {
        self.phases
            .iter()
            .filter_map(|p| p.max_dt(state).map(|dt| (p.name(), dt)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Timings of the most recent day.
    pub fn last_metrics(&self) -> &DayMetrics {
        &self.last_metrics
    }

    pub(crate) fn set_last_metrics(&mut self, metrics: DayMetrics) {
        self.last_metrics = metrics;
    }
}

impl Default for DayPipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for DayPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DayPipeline")
            .field("phases", &self.names())
            .field("last_metrics", &self.last_metrics)
            .finish()
    }
}
