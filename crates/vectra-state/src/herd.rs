//! Per-species host compartments.

use serde::{Deserialize, Serialize};

/// Susceptible, staged-infectious, and recovered head counts of one species
/// on one farm.
///
/// The infectious compartment is split into a fixed number of Erlang stages
/// sized from parameters at setup. Counts are unsigned, so a draw that would
/// overdraw a compartment must be clamped by the caller before applying it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Herd {
    /// Animals that can still be infected.
    pub susceptible: u32,
    /// Infected animals per infectious stage; stage 0 is the newest.
    pub infectious: Vec<u32>,
    /// Animals that recovered and are immune.
    pub recovered: u32,
}

impl Herd {
    /// A fully susceptible herd with `stages` empty infectious stages.
    pub fn new(susceptible: u32, stages: usize) -> Self {
        Self {
            susceptible,
            infectious: vec![0; stages],
            recovered: 0,
        }
    }

    /// Number of infectious stages.
    pub fn stages(&self) -> usize {
        self.infectious.len()
    }

    /// Infected animals over all stages.
    pub fn infected(&self) -> u32 {
        self.infectious.iter().sum()
    }

    /// All animals regardless of compartment.
    pub fn total(&self) -> u32 {
        self.susceptible + self.infected() + self.recovered
    }

    /// Move `n` susceptible animals into infectious stage 0.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the susceptible count.
    pub fn infect(&mut self, n: u32) {
        assert!(
            n <= self.susceptible,
            "infecting {n} of {} susceptible",
            self.susceptible
        );
        self.susceptible -= n;
        self.infectious[0] += n;
    }

    /// Move `n` animals from `stage` to `stage + 1`, or to recovered from
    /// the last stage.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the stage count.
    pub fn advance(&mut self, stage: usize, n: u32) {
        assert!(n <= self.infectious[stage], "advancing past stage stock");
        self.infectious[stage] -= n;
        match self.infectious.get_mut(stage + 1) {
            Some(next) => *next += n,
            None => self.recovered += n,
        }
    }

    /// Remove `n` dead animals from `stage`.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the stage count.
    pub fn remove(&mut self, stage: usize, n: u32) {
        assert!(n <= self.infectious[stage], "removing past stage stock");
        self.infectious[stage] -= n;
    }
}
