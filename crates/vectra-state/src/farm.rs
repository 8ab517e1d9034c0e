//! Farms: location, herds, abundance coefficients, control status.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use vectra_core::{CountyId, FarmId, HostSpecies};

use crate::control::ControlStatus;
use crate::herd::Herd;

const DAYS_PER_YEAR: f64 = 365.25;

/// Flat cell indices of a farm in each spatial layer.
///
/// Layers are resolved independently and need not share a geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FarmCells {
    /// Vector density grid.
    pub vector: usize,
    /// Temperature grid.
    pub temperature: usize,
    /// Rainfall grid.
    pub rainfall: usize,
    /// Autocorrelation field.
    pub autocorr: usize,
}

/// Farm-specific coefficients of the log-linear vector abundance model.
///
/// `ln(bites per animal)` is the intercept plus annual, semi-annual, and
/// four-month harmonics of the day of year, linear and quadratic
/// temperature terms, a rainfall term, and the day's noise and
/// autocorrelation offsets.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbundanceCoefficients {
    /// Intercept.
    pub intercept: f64,
    /// Annual sine.
    pub sin_yearly: f64,
    /// Annual cosine.
    pub cos_yearly: f64,
    /// Semi-annual sine.
    pub sin_6_month: f64,
    /// Semi-annual cosine.
    pub cos_6_month: f64,
    /// Four-month sine.
    pub sin_4_month: f64,
    /// Four-month cosine.
    pub cos_4_month: f64,
    /// Linear temperature effect.
    pub temp: f64,
    /// Quadratic temperature effect.
    pub temp_sq: f64,
    /// Rainfall effect.
    pub rain: f64,
}

impl AbundanceCoefficients {
    /// Log expected bites per animal on `day_of_year` under `weather`.
    pub fn log_bites(&self, day_of_year: u32, weather: &FarmWeather) -> f64 {
        let w = 2.0 * PI * f64::from(day_of_year) / DAYS_PER_YEAR;
        let t = weather.temperature;
        self.intercept
            + self.sin_yearly * w.sin()
            + self.cos_yearly * w.cos()
            + self.sin_6_month * (2.0 * w).sin()
            + self.cos_6_month * (2.0 * w).cos()
            + self.sin_4_month * (3.0 * w).sin()
            + self.cos_4_month * (3.0 * w).cos()
            + self.temp * t
            + self.temp_sq * t * t
            + self.rain * weather.rainfall
            + weather.noise
            + weather.autocorrelation
    }
}

/// Today's weather at a farm, refreshed at the start of its daily update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct FarmWeather {
    /// Mean temperature (°C).
    pub temperature: f64,
    /// Rainfall covariate.
    pub rainfall: f64,
    /// Spatial autocorrelation offset.
    pub autocorrelation: f64,
    /// Per-farm, per-day abundance noise.
    pub noise: f64,
}

/// A livestock holding.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Farm {
    /// Position in the farm collection.
    pub id: FarmId,
    /// Easting (metres).
    pub x: f64,
    /// Northing (metres).
    pub y: f64,
    /// Administrative county.
    pub county: CountyId,
    /// Cell index in each spatial layer.
    pub cells: FarmCells,
    /// Abundance model coefficients.
    pub abundance: AbundanceCoefficients,
    /// Sheep compartments.
    pub sheep: Herd,
    /// Cattle compartments.
    pub cattle: Herd,
    /// Share of the local vector population biting on this farm.
    pub rel_local_weight: f64,
    /// Force of infection computed by the latest vector-to-host step.
    pub force: f64,
    /// Weather cached for today.
    pub weather: FarmWeather,
    /// Control latches.
    pub status: ControlStatus,
    local_farms: Option<Vec<FarmId>>,
}

impl Farm {
    /// A farm with the given location and herds, outside every restriction.
    pub fn new(
        id: FarmId,
        x: f64,
        y: f64,
        county: CountyId,
        cells: FarmCells,
        sheep: Herd,
        cattle: Herd,
    ) -> Self {
        Self {
            id,
            x,
            y,
            county,
            cells,
            abundance: AbundanceCoefficients::default(),
            sheep,
            cattle,
            rel_local_weight: 1.0,
            force: 0.0,
            weather: FarmWeather::default(),
            status: ControlStatus::default(),
            local_farms: None,
        }
    }

    /// Compartments of one species.
    pub fn herd(&self, species: HostSpecies) -> &Herd {
        match species {
            HostSpecies::Cattle => &self.cattle,
            HostSpecies::Sheep => &self.sheep,
        }
    }

    /// Mutable compartments of one species.
    pub fn herd_mut(&mut self, species: HostSpecies) -> &mut Herd {
        match species {
            HostSpecies::Cattle => &mut self.cattle,
            HostSpecies::Sheep => &mut self.sheep,
        }
    }

    /// Infected animals of both species.
    pub fn infected(&self) -> u32 {
        self.sheep.infected() + self.cattle.infected()
    }

    /// Animals of both species.
    pub fn total_animals(&self) -> u32 {
        self.sheep.total() + self.cattle.total()
    }

    /// Squared distance to another farm.
    pub fn dist_sq(&self, other: &Farm) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Host count weighted by vector preference: `cattle + pref · sheep`.
    pub fn effective_animals(&self, preference_for_sheep: f64) -> f64 {
        f64::from(self.cattle.total()) + preference_for_sheep * f64::from(self.sheep.total())
    }

    /// Infected count weighted by vector preference.
    pub fn effective_infected(&self, preference_for_sheep: f64) -> f64 {
        f64::from(self.cattle.infected()) + preference_for_sheep * f64::from(self.sheep.infected())
    }

    /// Farms within ban radius, once computed on first detection.
    pub fn local_farms(&self) -> Option<&[FarmId]> {
        self.local_farms.as_deref()
    }

    /// Cache the farms within ban radius.
    ///
    /// # Panics
    ///
    /// Panics if the cache was already set; positions never change within a
    /// run, so the set is built once.
    pub fn set_local_farms(&mut self, farms: Vec<FarmId>) {
        assert!(
            self.local_farms.is_none(),
            "local farm cache of farm {} already built",
            self.id
        );
        self.local_farms = Some(farms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn farm(x: f64, y: f64) -> Farm {
        let cells = FarmCells {
            vector: 0,
            temperature: 0,
            rainfall: 0,
            autocorr: 0,
        };
        Farm::new(
            FarmId(0),
            x,
            y,
            CountyId(1),
            cells,
            Herd::new(30, 2),
            Herd::new(10, 2),
        )
    }

    #[test]
    fn effective_counts_weight_sheep() {
        let mut f = farm(0.0, 0.0);
        f.sheep.infect(10);
        f.cattle.infect(2);
        assert_eq!(f.effective_animals(0.5), 10.0 + 15.0);
        assert_eq!(f.effective_infected(0.5), 2.0 + 5.0);
        assert_eq!(f.infected(), 12);
        assert_eq!(f.total_animals(), 40);
    }

    #[test]
    fn distance_is_squared_euclidean() {
        assert_eq!(farm(0.0, 0.0).dist_sq(&farm(3.0, 4.0)), 25.0);
    }

    #[test]
    fn herd_selector_matches_species() {
        let mut f = farm(0.0, 0.0);
        f.herd_mut(HostSpecies::Cattle).recovered = 4;
        assert_eq!(f.cattle.recovered, 4);
        assert_eq!(f.herd(HostSpecies::Sheep).susceptible, 30);
    }

    #[test]
    #[should_panic]
    fn local_cache_is_built_once() {
        let mut f = farm(0.0, 0.0);
        f.set_local_farms(vec![FarmId(1)]);
        assert_eq!(f.local_farms(), Some(&[FarmId(1)][..]));
        f.set_local_farms(vec![]);
    }

    #[test]
    fn log_bites_sums_terms() {
        let coeffs = AbundanceCoefficients {
            intercept: 1.0,
            temp: 0.1,
            temp_sq: 0.01,
            rain: 2.0,
            ..AbundanceCoefficients::default()
        };
        let weather = FarmWeather {
            temperature: 10.0,
            rainfall: 0.5,
            autocorrelation: 0.25,
            noise: -0.5,
        };
        let got = coeffs.log_bites(100, &weather);
        assert!((got - (1.0 + 1.0 + 1.0 + 1.0 + 0.25 - 0.5)).abs() < 1e-12);
    }

    #[test]
    fn harmonics_use_day_of_year() {
        let coeffs = AbundanceCoefficients {
            cos_yearly: 1.0,
            ..AbundanceCoefficients::default()
        };
        let w = FarmWeather::default();
        assert!((coeffs.log_bites(0, &w) - 1.0).abs() < 1e-12);
        assert!(coeffs.log_bites(182, &w) < -0.99);
    }
}
