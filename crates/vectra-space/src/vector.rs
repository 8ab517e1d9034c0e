//! The vector-density grid bundle.

use crate::error::SpaceError;
use crate::field::{ScalarField, StagedField};
use crate::geometry::GridGeometry;

/// Vector densities and their per-cell coefficients on one grid.
///
/// All fields share [`VectorGrids::geometry`]. Densities are non-negative
/// at all times; `scratch` is all-zero between diffusion sub-steps.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorGrids {
    /// Grid every field below is resolved on.
    pub geometry: GridGeometry,
    /// Latent (incubating) vector density, one layer per incubation stage.
    pub latent: StagedField,
    /// Infectious vector density.
    pub infectious: ScalarField,
    /// Summed host attractiveness of the farms in each cell.
    pub biting_preference: ScalarField,
    /// Diffusion coefficient (m²/day) per cell.
    pub diffusion: ScalarField,
    /// Flux accumulator used within one diffusion sweep.
    pub scratch: ScalarField,
}

impl VectorGrids {
    /// Empty densities with a uniform diffusion coefficient.
    pub fn new(geometry: GridGeometry, eip_stages: usize, diffusion: f64) -> Self {
        let cells = geometry.cell_count();
        Self {
            latent: StagedField::zeros(cells, eip_stages),
            infectious: ScalarField::zeros(cells),
            biting_preference: ScalarField::zeros(cells),
            diffusion: ScalarField::filled(cells, diffusion),
            scratch: ScalarField::zeros(cells),
            geometry,
        }
    }

    /// Replace the diffusion coefficient with a per-cell field.
    pub fn with_diffusion_field(mut self, values: Vec<f64>) -> Result<Self, SpaceError> {
        if let Some(index) = values.iter().position(|v| !v.is_finite() || *v < 0.0) {
            return Err(SpaceError::NegativeValue {
                what: "diffusion",
                index,
            });
        }
        self.diffusion = ScalarField::from_vec("diffusion", self.geometry.cell_count(), values)?;
        Ok(self)
    }

    /// Number of incubation stages.
    pub fn eip_stages(&self) -> usize {
        self.latent.stages()
    }

    /// Total vector mass (latent plus infectious) over all cells.
    pub fn total_mass(&self) -> f64 {
        self.latent.total() + self.infectious.sum()
    }

    /// Total vector mass over interior cells only.
    pub fn interior_mass(&self) -> f64 {
        self.geometry
            .interior_cells()
            .map(|c| self.latent.cell_sum(c) + self.infectious[c])
            .sum()
    }
}
