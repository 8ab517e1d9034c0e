//! Dense per-cell fields.

use crate::error::SpaceError;
use std::ops::{Index, IndexMut};

/// One `f64` per grid cell, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarField {
    data: Vec<f64>,
}

impl ScalarField {
    /// A field of `cells` values all equal to `value`.
    pub fn filled(cells: usize, value: f64) -> Self {
        Self {
            data: vec![value; cells],
        }
    }

    /// A zeroed field of `cells` values.
    pub fn zeros(cells: usize) -> Self {
        Self::filled(cells, 0.0)
    }

    /// Wrap an existing buffer, checking its length.
    pub fn from_vec(
        what: &'static str,
        cells: usize,
        data: Vec<f64>,
    ) -> Result<Self, SpaceError> {
        if data.len() != cells {
            return Err(SpaceError::LengthMismatch {
                what,
                expected: cells,
                actual: data.len(),
            });
        }
        Ok(Self { data })
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the field has no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// All values, row-major.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// All values, mutable.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Sum over all cells.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Largest value, or 0 for an empty field.
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }

    /// Set every cell to `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }
}

impl Index<usize> for ScalarField {
    type Output = f64;

    fn index(&self, cell: usize) -> &f64 {
        &self.data[cell]
    }
}

impl IndexMut<usize> for ScalarField {
    fn index_mut(&mut self, cell: usize) -> &mut f64 {
        &mut self.data[cell]
    }
}

/// One `f64` per grid cell per stage, stored stage-major.
///
/// Stage `s` occupies the contiguous slice `[s * cells, (s + 1) * cells)`,
/// so a per-stage sweep (diffusion) walks contiguous memory.
#[derive(Clone, Debug, PartialEq)]
pub struct StagedField {
    cells: usize,
    stages: usize,
    data: Vec<f64>,
}

impl StagedField {
    /// A zeroed field with `stages` layers of `cells` values.
    pub fn zeros(cells: usize, stages: usize) -> Self {
        Self {
            cells,
            stages,
            data: vec![0.0; cells * stages],
        }
    }

    /// Number of stages.
    pub fn stages(&self) -> usize {
        self.stages
    }

    /// Number of cells per stage.
    pub fn cells(&self) -> usize {
        self.cells
    }

    /// One stage layer.
    pub fn stage(&self, stage: usize) -> &[f64] {
        let start = stage * self.cells;
        &self.data[start..start + self.cells]
    }

    /// One stage layer, mutable.
    pub fn stage_mut(&mut self, stage: usize) -> &mut [f64] {
        let start = stage * self.cells;
        &mut self.data[start..start + self.cells]
    }

    /// Value at `(stage, cell)`.
    pub fn get(&self, stage: usize, cell: usize) -> f64 {
        self.data[stage * self.cells + cell]
    }

    /// Mutable value at `(stage, cell)`.
    pub fn get_mut(&mut self, stage: usize, cell: usize) -> &mut f64 {
        &mut self.data[stage * self.cells + cell]
    }

    /// Sum over all stages of one cell.
    pub fn cell_sum(&self, cell: usize) -> f64 {
        (0..self.stages).map(|s| self.get(s, cell)).sum()
    }

    /// Sum over all stages and cells.
    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Largest value in any stage and cell, or 0 when empty.
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_from_vec_checks_length() {
        let err = ScalarField::from_vec("diffusion", 4, vec![0.0; 3]).unwrap_err();
        assert_eq!(
            err,
            SpaceError::LengthMismatch {
                what: "diffusion",
                expected: 4,
                actual: 3
            }
        );
        let f = ScalarField::from_vec("diffusion", 3, vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(f.sum(), 6.0);
        assert_eq!(f.max(), 3.0);
        assert_eq!(f[1], 2.0);
    }

    #[test]
    fn staged_layers_are_disjoint() {
        let mut f = StagedField::zeros(3, 2);
        *f.get_mut(1, 2) = 5.0;
        f.stage_mut(0)[0] = 1.0;
        assert_eq!(f.stage(0), &[1.0, 0.0, 0.0]);
        assert_eq!(f.stage(1), &[0.0, 0.0, 5.0]);
        assert_eq!(f.cell_sum(2), 5.0);
        assert_eq!(f.cell_sum(0), 1.0);
        assert_eq!(f.total(), 6.0);
    }
}
