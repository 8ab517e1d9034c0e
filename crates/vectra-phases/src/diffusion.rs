//! Explicit five-point diffusion of vector densities.
//!
//! Every density layer (each latent stage and the infectious layer)
//! diffuses independently. A sub-step sweeps the interior cells, sending
//! `D · dt · ρ / h²` to each of the four neighbours and removing four times
//! that from the source. Flux is accumulated in the scratch field and only
//! applied after the sweep, and only to interior cells: flux landing on the
//! outer ring is discarded, which makes the boundary absorbing.

use tracing::debug;
use vectra_space::GridGeometry;

use crate::phase::{DayContext, Phase};

/// One explicit diffusion sub-step of a single layer.
///
/// Cells with density at or below `floor` do not emit flux. `scratch` must
/// be all-zero on entry and is all-zero on return.
pub fn diffuse_layer(
    geometry: &GridGeometry,
    layer: &mut [f64],
    diffusion: &[f64],
    scratch: &mut [f64],
    dt: f64,
    floor: f64,
) {
    let h2 = geometry.cell_width() * geometry.cell_width();
    for cell in geometry.interior_cells() {
        let rho = layer[cell];
        if rho <= floor {
            continue;
        }
        let flux = diffusion[cell] * dt * rho / h2;
        let neighbours = geometry.neighbours(cell);
        scratch[cell] -= flux * neighbours.len() as f64;
        for nb in neighbours {
            scratch[nb] += flux;
        }
    }
    for cell in geometry.interior_cells() {
        layer[cell] += scratch[cell];
    }
    scratch.fill(0.0);
}

/// Daily vector diffusion phase.
///
/// Runs `round(1 / dt)` sub-steps so exactly one day elapses.
#[derive(Clone, Copy, Debug, Default)]
pub struct VectorDiffusion;

impl Phase for VectorDiffusion {
    fn name(&self) -> &str {
        "vector_diffusion"
    }

    fn max_dt(&self, state: &vectra_state::SimulationState) -> Option<f64> {
        // Explicit-scheme stability: 4 · D · dt / h² <= 1
        let d_max = state.vectors.diffusion.max();
        if d_max <= 0.0 {
            return None;
        }
        let h = state.vectors.geometry.cell_width();
        Some(h * h / (4.0 * d_max))
    }

    fn run(&self, ctx: &mut DayContext<'_>) {
        let dt = ctx.params.simulation.dt;
        let floor = ctx.params.grids.diffusion_density_floor;
        let substeps = ctx.params.simulation.diffusion_substeps();
        let vectors = &mut ctx.state.vectors;
        let before = vectors.interior_mass();

        for _ in 0..substeps {
            for stage in 0..vectors.latent.stages() {
                diffuse_layer(
                    &vectors.geometry,
                    vectors.latent.stage_mut(stage),
                    vectors.diffusion.as_slice(),
                    vectors.scratch.as_mut_slice(),
                    dt,
                    floor,
                );
            }
            diffuse_layer(
                &vectors.geometry,
                vectors.infectious.as_mut_slice(),
                vectors.diffusion.as_slice(),
                vectors.scratch.as_mut_slice(),
                dt,
                floor,
            );
        }

        debug!(
            substeps,
            absorbed = before - vectors.interior_mass(),
            "vector diffusion"
        );
    }
}
