//! Independent repetitions run in parallel.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::info;
use vectra_core::{Parameters, VectorSpecies};
use vectra_state::ScenarioLoader;

use crate::error::EngineError;
use crate::simulation::Simulation;
use crate::summary::RunSummary;

/// Runs `num_reps` independent repetitions of one scenario.
///
/// Each repetition loads a fresh state and draws from its own random
/// stream, so results depend only on the seed and the repetition index,
/// never on thread scheduling.
#[derive(Clone)]
pub struct BatchRunner {
    params: Parameters,
    species: Arc<dyn VectorSpecies>,
}

impl BatchRunner {
    /// Runner for `params.simulation.num_reps` repetitions.
    pub fn new(params: Parameters, species: Arc<dyn VectorSpecies>) -> Self {
        Self { params, species }
    }

    /// Run every repetition and return their summaries ordered by
    /// repetition index.
    ///
    /// # Errors
    ///
    /// Returns the first construction error encountered; see
    /// [`Simulation::new`].
    pub fn run(&self, loader: &dyn ScenarioLoader) -> Result<Vec<RunSummary>, EngineError> {
        self.params.validate()?;
        let reps = self.params.simulation.num_reps;
        info!(reps, seed = self.params.simulation.seed, "starting batch");
        let summaries = (0..reps)
            .into_par_iter()
            .map(|rep| self.run_one(loader, rep))
            .collect::<Result<Vec<_>, _>>()?;
        info!(reps, "batch finished");
        Ok(summaries)
    }

    fn run_one(&self, loader: &dyn ScenarioLoader, rep: u32) -> Result<RunSummary, EngineError> {
        info!(rep, "repetition started");
        let mut sim = Simulation::new(self.params.clone(), loader, Arc::clone(&self.species), rep)?;
        let summary = sim.run();
        info!(
            rep,
            detections = summary.cumulative.detections,
            farms_ever_infected = summary.farms_ever_infected,
            "repetition finished"
        );
        Ok(summary)
    }
}

impl std::fmt::Debug for BatchRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchRunner")
            .field("reps", &self.params.simulation.num_reps)
            .field("species", &self.species.name())
            .finish()
    }
}
