//! The per-day step.

use std::time::Instant;

use tracing::{debug, debug_span};
use vectra_core::{Parameters, RandomSource, VectorSpecies};
use vectra_phases::DayContext;
use vectra_state::SimulationState;

use crate::metrics::DayMetrics;
use crate::pipeline::DayPipeline;

/// Advance `state` by one simulated day.
///
/// Resets the daily counters, runs every phase of `pipeline` in order, folds
/// the day's counters and control burden into the cumulative counters,
/// updates the days-since-detection clock, and advances the day. Phase
/// timings are left in [`DayPipeline::last_metrics`].
pub fn simulate_day(
    pipeline: &mut DayPipeline,
    state: &mut SimulationState,
    params: &Parameters,
    species: &dyn VectorSpecies,
    rng: &mut dyn RandomSource,
) {
    let day = state.simulation_day;
    let _span = debug_span!("day", day).entered();
    let start = Instant::now();
    let mut metrics = DayMetrics::new(day);

    state.daily.reset();
    {
        let mut ctx = DayContext::new(state, params, species, rng);
        for phase in pipeline.phases() {
            let phase_start = Instant::now();
            phase.run(&mut ctx);
            metrics.record(phase.name(), phase_start.elapsed().as_micros() as u64);
        }
    }

    let banned = state.banned_farms() as u64;
    let restricted = state.restricted_farms() as u64;
    state.cumulative.absorb(&state.daily);
    state.cumulative.record_control_burden(banned, restricted);
    state
        .outbreak
        .tick_detection_clock(state.daily.farms_detected > 0);
    state.advance_day();

    metrics.total_us = start.elapsed().as_micros() as u64;
    debug!(
        detected = state.daily.farms_detected,
        sheep_infected = state.daily.sheep_infected,
        cattle_infected = state.daily.cattle_infected,
        banned,
        restricted,
        total_us = metrics.total_us,
        "day complete"
    );
    pipeline.set_last_metrics(metrics);
}
