//! Read-only weather layers spanning the whole run.

use crate::error::SpaceError;
use crate::field::ScalarField;
use crate::geometry::GridGeometry;

/// One value per cell per simulated day on its own grid.
///
/// Stored day-major, so one day's layer is a contiguous slice.
#[derive(Clone, Debug, PartialEq)]
pub struct DailyField {
    geometry: GridGeometry,
    days: usize,
    data: Vec<f64>,
}

impl DailyField {
    /// Wrap a day-major buffer of `days * geometry.cell_count()` values.
    pub fn new(
        what: &'static str,
        geometry: GridGeometry,
        days: usize,
        data: Vec<f64>,
    ) -> Result<Self, SpaceError> {
        let expected = days * geometry.cell_count();
        if data.len() != expected {
            return Err(SpaceError::LengthMismatch {
                what,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            geometry,
            days,
            data,
        })
    }

    /// The same value in every cell on every day.
    pub fn constant(geometry: GridGeometry, days: usize, value: f64) -> Self {
        let data = vec![value; days * geometry.cell_count()];
        Self {
            geometry,
            days,
            data,
        }
    }

    /// Build from a function of `(day, cell)`.
    pub fn from_fn(
        geometry: GridGeometry,
        days: usize,
        mut f: impl FnMut(usize, usize) -> f64,
    ) -> Self {
        let cells = geometry.cell_count();
        let data = (0..days)
            .flat_map(|d| (0..cells).map(move |c| (d, c)))
            .map(|(d, c)| f(d, c))
            .collect();
        Self {
            geometry,
            days,
            data,
        }
    }

    /// Grid the values are resolved on.
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Number of days covered.
    pub fn days(&self) -> usize {
        self.days
    }

    /// Value of `cell` on `day`.
    pub fn get(&self, day: usize, cell: usize) -> f64 {
        self.data[day * self.geometry.cell_count() + cell]
    }

    /// One day's layer.
    pub fn day(&self, day: usize) -> &[f64] {
        let cells = self.geometry.cell_count();
        &self.data[day * cells..(day + 1) * cells]
    }
}

/// Temperature, rainfall, and the static abundance autocorrelation field.
///
/// Each layer carries its own geometry; farms hold an independent cell
/// index into each.
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherGrids {
    /// Daily mean temperature (°C).
    pub temperature: DailyField,
    /// Daily rainfall covariate.
    pub rainfall: DailyField,
    /// Geometry of the autocorrelation field.
    pub autocorr_geometry: GridGeometry,
    /// Spatial autocorrelation term of the abundance regression.
    pub autocorrelation: ScalarField,
}

impl WeatherGrids {
    /// Assemble weather layers, checking the autocorrelation buffer size.
    pub fn new(
        temperature: DailyField,
        rainfall: DailyField,
        autocorr_geometry: GridGeometry,
        autocorrelation: ScalarField,
    ) -> Result<Self, SpaceError> {
        if autocorrelation.len() != autocorr_geometry.cell_count() {
            return Err(SpaceError::LengthMismatch {
                what: "autocorrelation",
                expected: autocorr_geometry.cell_count(),
                actual: autocorrelation.len(),
            });
        }
        Ok(Self {
            temperature,
            rainfall,
            autocorr_geometry,
            autocorrelation,
        })
    }

    /// Uniform weather: constant temperature, zero rain, zero
    /// autocorrelation, all on one geometry.
    pub fn uniform(geometry: GridGeometry, days: usize, temperature: f64) -> Self {
        let cells = geometry.cell_count();
        Self {
            temperature: DailyField::constant(geometry.clone(), days, temperature),
            rainfall: DailyField::constant(geometry.clone(), days, 0.0),
            autocorr_geometry: geometry,
            autocorrelation: ScalarField::zeros(cells),
        }
    }

    /// Number of days every daily layer covers.
    pub fn days(&self) -> usize {
        self.temperature.days().min(self.rainfall.days())
    }
}
