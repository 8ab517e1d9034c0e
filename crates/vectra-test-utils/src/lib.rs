//! Test utilities and fixtures for Vectra development.
//!
//! Provides a constant-rate vector species, a deterministic
//! expectation-valued random source, and small scenario builders laid out
//! on a 1 km grid.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{cell_centre_farm, test_grid, test_params, test_scenario};

use vectra_core::{RandomSource, VectorSpecies};

/// Vector species whose rates ignore temperature.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConstantSpecies {
    pub biting: f64,
    pub mortality: f64,
    pub incubation: f64,
}

impl ConstantSpecies {
    pub fn new(biting: f64, mortality: f64, incubation: f64) -> Self {
        Self {
            biting,
            mortality,
            incubation,
        }
    }

    /// No biting, no mortality, no incubation.
    pub fn inert() -> Self {
        Self::default()
    }
}

impl VectorSpecies for ConstantSpecies {
    fn name(&self) -> &str {
        "constant"
    }

    fn biting_rate(&self, _temperature: f64) -> f64 {
        self.biting
    }

    fn mortality_rate(&self, _temperature: f64) -> f64 {
        self.mortality
    }

    fn incubation_rate(&self, _temperature: f64) -> f64 {
        self.incubation
    }
}

/// Random source returning a fixed uniform and the (rounded) mean of every
/// distribution. Useful for exact assertions on stochastic phases.
#[derive(Clone, Debug)]
pub struct ExpectationSource {
    pub uniform: f64,
    pub draws: usize,
}

impl ExpectationSource {
    pub fn new(uniform: f64) -> Self {
        Self { uniform, draws: 0 }
    }
}

impl RandomSource for ExpectationSource {
    fn uniform(&mut self) -> f64 {
        self.draws += 1;
        self.uniform
    }

    fn gaussian(&mut self) -> f64 {
        self.draws += 1;
        0.0
    }

    fn poisson(&mut self, lambda: f64) -> u32 {
        if lambda <= 0.0 {
            return 0;
        }
        self.draws += 1;
        lambda.round() as u32
    }

    fn binomial(&mut self, n: u32, p: f64) -> u32 {
        if n == 0 || p <= 0.0 {
            return 0;
        }
        if p >= 1.0 {
            return n;
        }
        self.draws += 1;
        (f64::from(n) * p).round() as u32
    }

    fn gamma(&mut self, shape: f64, scale: f64) -> f64 {
        if shape <= 0.0 || scale <= 0.0 {
            return 0.0;
        }
        self.draws += 1;
        shape * scale
    }
}
