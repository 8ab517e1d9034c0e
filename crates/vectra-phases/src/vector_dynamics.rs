//! Vector survival and extrinsic-incubation progression.
//!
//! Each vector cell reads today's temperature from the temperature cell
//! containing its centre. Survival `exp(-mortality(T))` scales the
//! infectious density and every latent stage. Latent mass then advances
//! through the incubation stages by a Poisson-distributed number of stages
//! with mean `stages · incubation(T)`; mass that passes the last stage
//! becomes infectious. The redistribution is a deterministic expectation,
//! not a per-vector draw, and conserves mass exactly.

use tracing::debug;
use vectra_core::{poisson_pmf, poisson_sf, MAX_STAGES};

use crate::phase::{DayContext, Phase};

/// Advance latent stage mass by `Poisson(lambda)` stages.
///
/// `stages[n]` becomes `Σ_{k ≤ n} stages[k] · P(X = n - k)`; the mass that
/// overshoots the last stage, `Σ_k stages[k] · P(X > last - k)`, is added
/// to `infectious` and the new infectious density is returned.
///
/// ```
/// use vectra_phases::redistribute_latent;
///
/// let mut stages = [10.0, 0.0, 0.0];
/// let infectious = redistribute_latent(&mut stages, 1.0, 0.0);
/// assert_eq!(stages, [10.0, 0.0, 0.0]);
/// assert_eq!(infectious, 1.0);
/// ```
pub fn redistribute_latent(stages: &mut [f64], infectious: f64, lambda: f64) -> f64 {
    let n = stages.len();
    assert!(n <= MAX_STAGES, "{n} incubation stages exceed {MAX_STAGES}");
    if !(lambda > 0.0) {
        return infectious;
    }
    let mut old = [0.0; MAX_STAGES];
    old[..n].copy_from_slice(stages);
    let mut pmf = [0.0; MAX_STAGES];
    let mut sf = [0.0; MAX_STAGES];
    for j in 0..n {
        pmf[j] = poisson_pmf(j as u32, lambda);
        sf[j] = poisson_sf(j as u32, lambda);
    }

    for (m, slot) in stages.iter_mut().enumerate() {
        *slot = (0..=m).map(|k| old[k] * pmf[m - k]).sum();
    }
    infectious + (0..n).map(|k| old[k] * sf[n - 1 - k]).sum::<f64>()
}

/// Daily vector mortality and incubation phase.
#[derive(Clone, Copy, Debug, Default)]
pub struct VectorMortalityIncubation;

impl Phase for VectorMortalityIncubation {
    fn name(&self) -> &str {
        "vector_mortality_incubation"
    }

    fn run(&self, ctx: &mut DayContext<'_>) {
        let day = ctx.state.simulation_day as usize;
        let temperature = &ctx.state.weather.temperature;
        let vectors = &mut ctx.state.vectors;
        let eip = vectors.eip_stages();
        let mut matured = 0.0;

        for cell in 0..vectors.geometry.cell_count() {
            let (cx, cy) = vectors.geometry.cell_centre(cell);
            let Some(tcell) = temperature.geometry().cell_of(cx, cy) else {
                continue;
            };
            let t = temperature.get(day, tcell);
            let survival = (-ctx.species.mortality_rate(t)).exp();
            let lambda = eip as f64 * ctx.species.incubation_rate(t);

            vectors.infectious[cell] *= survival;
            let mut stages = [0.0; MAX_STAGES];
            let mut latent = 0.0;
            for (s, slot) in stages.iter_mut().enumerate().take(eip) {
                let v = vectors.latent.get_mut(s, cell);
                *v *= survival;
                *slot = *v;
                latent += *v;
            }

            if lambda > 0.0 && latent > 0.0 {
                let before = vectors.infectious[cell];
                let after = redistribute_latent(&mut stages[..eip], before, lambda);
                for (s, &v) in stages.iter().enumerate().take(eip) {
                    *vectors.latent.get_mut(s, cell) = v;
                }
                vectors.infectious[cell] = after;
                matured += after - before;
            }
        }

        debug!(
            matured,
            infectious = vectors.infectious.sum(),
            latent = vectors.latent.total(),
            "vector mortality and incubation"
        );
    }
}
