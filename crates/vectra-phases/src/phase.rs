//! The [`Phase`] trait and the [`DayContext`] it runs against.

use vectra_core::{Parameters, RandomSource, VectorSpecies};
use vectra_state::SimulationState;

/// Everything a phase may read or mutate during one simulated day.
///
/// Fields are public so a phase can borrow the state and the random stream
/// at the same time.
pub struct DayContext<'a> {
    /// The run's mutable state.
    pub state: &'a mut SimulationState,
    /// Run parameters.
    pub params: &'a Parameters,
    /// Vector rate curves.
    pub species: &'a dyn VectorSpecies,
    /// The single random stream of this repetition.
    pub rng: &'a mut dyn RandomSource,
}

impl<'a> DayContext<'a> {
    /// Bundle the collaborators of one day.
    pub fn new(
        state: &'a mut SimulationState,
        params: &'a Parameters,
        species: &'a dyn VectorSpecies,
        rng: &'a mut dyn RandomSource,
    ) -> Self {
        Self {
            state,
            params,
            species,
            rng,
        }
    }
}

/// A stateless operator executed once per simulated day.
///
/// # Contract
///
/// - `run()` is infallible. Stock-limited draws are clamped, degenerate
///   denominators are skipped, and broken invariants panic.
/// - Given the same state, parameters, and random stream position, `run()`
///   produces the same result and consumes the same draws.
///
/// # Object safety
///
/// This trait is object-safe; the engine stores phases as
/// `Vec<Box<dyn Phase>>`.
///
/// # Examples
///
/// ```
/// use vectra_phases::{DayContext, Phase};
///
/// struct CountDay;
///
/// impl Phase for CountDay {
///     fn name(&self) -> &str { "count_day" }
///
///     fn run(&self, ctx: &mut DayContext<'_>) {
///         ctx.state.daily.movements_attempted += 1;
///     }
/// }
///
/// assert_eq!(CountDay.name(), "count_day");
/// ```
pub trait Phase: Send + Sync {
    /// Name used in logs and per-phase timings.
    fn name(&self) -> &str;

    /// Largest sub-step the phase is stable for, given the loaded state.
    ///
    /// The engine rejects runs whose configured `dt` exceeds this.
    /// Return `None` to impose no constraint.
    fn max_dt(&self, _state: &SimulationState) -> Option<f64> {
        None
    }

    /// Apply the phase to today's state.
    fn run(&self, ctx: &mut DayContext<'_>);
}
