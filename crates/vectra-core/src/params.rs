//! Run parameters.
//!
//! [`Parameters`] is immutable for the duration of a run and passed by
//! reference into every phase. It deserializes from TOML with every field
//! optional; missing values fall back to the documented defaults.
//!
//! ```
//! use vectra_core::Parameters;
//!
//! let params = Parameters::from_toml_str(
//!     r#"
//!     [simulation]
//!     num_days = 30
//!
//!     [control]
//!     county_ban = true
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(params.simulation.num_days, 30);
//! assert!(params.control.county_ban);
//! assert_eq!(params.epi.num_eip_stages, 10);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::host::HostSpecies;
use crate::MAX_STAGES;

// ── Parameters ─────────────────────────────────────────────────────

/// Complete parameter set for a simulation run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// Timesteps, run length, repetitions, seed.
    pub simulation: SimulationParams,
    /// Epidemiological rates and stage counts.
    pub epi: EpiParams,
    /// Shipment-size distributions.
    pub movement: MovementParams,
    /// Control policy toggles and radii.
    pub control: ControlParams,
    /// Grid resolutions and diffusion thresholds.
    pub grids: GridParams,
    /// Vector abundance regression settings.
    pub abundance: AbundanceParams,
}

impl Parameters {
    /// Parse parameters from a TOML document and validate them.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let params: Parameters = toml::from_str(text)?;
        params.validate()?;
        Ok(params)
    }

    /// Read, parse, and validate a TOML parameter file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check every group for values outside their valid domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        self.epi.validate()?;
        self.movement.validate()?;
        self.control.validate()?;
        self.grids.validate()?;
        self.abundance.validate()
    }
}

// ── SimulationParams ───────────────────────────────────────────────

/// Parameters controlling the simulation clock and repetitions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Diffusion sub-step length (days).
    pub dt: f64,
    /// Farm-level Euler sub-step length (days).
    pub dt_farm: f64,
    /// Number of days to simulate per repetition.
    pub num_days: u32,
    /// Number of independent repetitions.
    pub num_reps: u32,
    /// Day of year (0-364) on simulation day zero.
    pub start_day_of_year: u32,
    /// Base seed; repetition `r` uses ChaCha stream `r` of this seed.
    pub seed: u64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            dt: 0.05,
            dt_farm: 0.1,
            num_days: 150,
            num_reps: 1,
            start_day_of_year: 0,
            seed: 42,
        }
    }
}

impl SimulationParams {
    /// Number of diffusion sub-steps that make up exactly one day.
    ///
    /// Computed once as `round(1 / dt)` so no floating accumulation can
    /// under- or overshoot the day.
    pub fn diffusion_substeps(&self) -> u32 {
        substeps_per_day(self.dt)
    }

    /// Number of farm Euler sub-steps that make up exactly one day.
    pub fn farm_substeps(&self) -> u32 {
        substeps_per_day(self.dt_farm)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_timestep("simulation.dt", self.dt)?;
        check_timestep("simulation.dt_farm", self.dt_farm)?;
        if self.num_reps == 0 {
            return Err(ConfigError::invalid("simulation.num_reps", "must be at least 1"));
        }
        if self.start_day_of_year >= 365 {
            return Err(ConfigError::invalid(
                "simulation.start_day_of_year",
                format!("must be in 0..365, got {}", self.start_day_of_year),
            ));
        }
        Ok(())
    }
}

fn substeps_per_day(dt: f64) -> u32 {
    (1.0 / dt).round() as u32
}

fn check_timestep(name: &'static str, dt: f64) -> Result<(), ConfigError> {
    if !dt.is_finite() || dt <= 0.0 || dt > 1.0 {
        return Err(ConfigError::invalid(
            name,
            format!("must be finite and in (0, 1], got {dt}"),
        ));
    }
    if substeps_per_day(dt) == 0 {
        return Err(ConfigError::invalid(name, "yields zero sub-steps per day"));
    }
    Ok(())
}

// ── EpiParams ──────────────────────────────────────────────────────

/// Epidemiological parameters for transmission and disease progression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpiParams {
    /// Daily probability of detecting one infected cow.
    pub detection_prob_cattle: f64,
    /// Daily probability of detecting one infected sheep.
    pub detection_prob_sheep: f64,
    /// Typical daily dispersal distance of vectors (metres).
    pub diffusion_length_scale: f64,
    /// Erlang stages of the sheep infectious period.
    pub num_inf_stages_sheep: usize,
    /// Erlang stages of the cattle infectious period.
    pub num_inf_stages_cattle: usize,
    /// Stages of the extrinsic incubation period.
    pub num_eip_stages: usize,
    /// Probability a vector is infected by one bite on an infectious host.
    pub p_v: f64,
    /// Probability a host is infected by one bite from an infectious vector.
    pub p_h: f64,
    /// Daily mortality rate of infected sheep.
    pub sheep_mortality_rate: f64,
    /// Recovery rate of sheep (per day).
    pub rec_rate_sheep: f64,
    /// Recovery rate of cattle (per day).
    pub rec_rate_cattle: f64,
    /// Vector biting preference for sheep relative to cattle.
    pub preference_for_sheep: f64,
    /// Scales the regression-derived bite rate per animal.
    pub transmission_scalar: f64,
    /// Regime in which Binomial infection draws use a Poisson approximation.
    pub poisson_approx: PoissonApprox,
}

impl Default for EpiParams {
    fn default() -> Self {
        Self {
            detection_prob_cattle: 0.0005,
            detection_prob_sheep: 0.005,
            diffusion_length_scale: 1500.0,
            num_inf_stages_sheep: 5,
            num_inf_stages_cattle: 5,
            num_eip_stages: 10,
            p_v: 0.01,
            p_h: 0.9,
            sheep_mortality_rate: 0.0055,
            rec_rate_sheep: 1.0 / 16.0,
            rec_rate_cattle: 1.0 / 20.6,
            preference_for_sheep: 0.32,
            transmission_scalar: 1.0,
            poisson_approx: PoissonApprox::default(),
        }
    }
}

impl EpiParams {
    /// Infectious stage count for a host species.
    pub fn inf_stages(&self, species: HostSpecies) -> usize {
        match species {
            HostSpecies::Cattle => self.num_inf_stages_cattle,
            HostSpecies::Sheep => self.num_inf_stages_sheep,
        }
    }

    /// Recovery rate for a host species (per day).
    pub fn recovery_rate(&self, species: HostSpecies) -> f64 {
        match species {
            HostSpecies::Cattle => self.rec_rate_cattle,
            HostSpecies::Sheep => self.rec_rate_sheep,
        }
    }

    /// Infection mortality rate for a host species; cattle never die of infection.
    pub fn mortality_rate(&self, species: HostSpecies) -> f64 {
        match species {
            HostSpecies::Cattle => 0.0,
            HostSpecies::Sheep => self.sheep_mortality_rate,
        }
    }

    /// Per-animal daily passive detection probability.
    pub fn detection_prob(&self, species: HostSpecies) -> f64 {
        match species {
            HostSpecies::Cattle => self.detection_prob_cattle,
            HostSpecies::Sheep => self.detection_prob_sheep,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_probability("epi.detection_prob_cattle", self.detection_prob_cattle)?;
        check_probability("epi.detection_prob_sheep", self.detection_prob_sheep)?;
        check_probability("epi.p_v", self.p_v)?;
        check_probability("epi.p_h", self.p_h)?;
        check_stages("epi.num_inf_stages_sheep", self.num_inf_stages_sheep)?;
        check_stages("epi.num_inf_stages_cattle", self.num_inf_stages_cattle)?;
        check_stages("epi.num_eip_stages", self.num_eip_stages)?;
        check_non_negative("epi.diffusion_length_scale", self.diffusion_length_scale)?;
        check_non_negative("epi.sheep_mortality_rate", self.sheep_mortality_rate)?;
        check_non_negative("epi.rec_rate_sheep", self.rec_rate_sheep)?;
        check_non_negative("epi.rec_rate_cattle", self.rec_rate_cattle)?;
        check_non_negative("epi.preference_for_sheep", self.preference_for_sheep)?;
        check_non_negative("epi.transmission_scalar", self.transmission_scalar)?;
        self.poisson_approx.validate()
    }
}

/// Bounds of the large-n / small-p regime in which a Binomial draw of new
/// infections is replaced by a stock-capped Poisson draw.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoissonApprox {
    /// Population must exceed this.
    pub min_population: u32,
    /// Per-animal probability must be below this.
    pub max_probability: f64,
    /// Expected count must be below this.
    pub max_expected: f64,
}

impl Default for PoissonApprox {
    fn default() -> Self {
        Self {
            min_population: 100,
            max_probability: 0.01,
            max_expected: 20.0,
        }
    }
}

impl PoissonApprox {
    /// Whether `Binomial(n, p)` should be drawn as `min(Poisson(n·p), n)`.
    pub fn applies(&self, n: u32, p: f64) -> bool {
        n > self.min_population && p < self.max_probability && f64::from(n) * p < self.max_expected
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_probability("epi.poisson_approx.max_probability", self.max_probability)?;
        check_non_negative("epi.poisson_approx.max_expected", self.max_expected)
    }
}

// ── MovementParams ─────────────────────────────────────────────────

/// Shipment-size distributions for livestock movements.
///
/// A shipment moves `1 + NegBin(k, p)` animals, capped by the source's
/// head count of the chosen species.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementParams {
    /// Negative-binomial dispersion for cattle shipments.
    pub cattle_shipment_k: f64,
    /// Negative-binomial probability for cattle shipments.
    pub cattle_shipment_p: f64,
    /// Negative-binomial dispersion for sheep shipments.
    pub sheep_shipment_k: f64,
    /// Negative-binomial probability for sheep shipments.
    pub sheep_shipment_p: f64,
}

impl Default for MovementParams {
    fn default() -> Self {
        Self {
            cattle_shipment_k: 1.0,
            cattle_shipment_p: 0.85,
            sheep_shipment_k: 1.0,
            sheep_shipment_p: 0.97,
        }
    }
}

impl MovementParams {
    /// `(k, p)` of the shipment-size distribution for a species.
    pub fn shipment(&self, species: HostSpecies) -> (f64, f64) {
        match species {
            HostSpecies::Cattle => (self.cattle_shipment_k, self.cattle_shipment_p),
            HostSpecies::Sheep => (self.sheep_shipment_k, self.sheep_shipment_p),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_positive("movement.cattle_shipment_k", self.cattle_shipment_k)?;
        check_positive("movement.sheep_shipment_k", self.sheep_shipment_k)?;
        check_open_unit("movement.cattle_shipment_p", self.cattle_shipment_p)?;
        check_open_unit("movement.sheep_shipment_p", self.sheep_shipment_p)
    }
}

// ── ControlParams ──────────────────────────────────────────────────

/// Disease-control policy toggles and radii (metres).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlParams {
    /// Master switch; when false no control measure is ever applied.
    pub enabled: bool,
    /// Ban movements on the detected farm and every farm within `ban_radius`.
    pub farm_ban: bool,
    /// Ban movements on every farm in the detected farm's county.
    pub county_ban: bool,
    /// Ban all movements nationally on any detection.
    pub total_ban: bool,
    /// Set up protection and surveillance zones around the first detection.
    pub restriction_zones: bool,
    /// Radius of the local movement ban.
    pub ban_radius: f64,
    /// Radius of the protection zone.
    pub pz_radius: f64,
    /// Outer radius of the surveillance zone.
    pub sz_radius: f64,
    /// Radius around the first detection sampled by active surveillance.
    pub surveillance_radius: f64,
}

impl Default for ControlParams {
    fn default() -> Self {
        Self {
            enabled: true,
            farm_ban: true,
            county_ban: false,
            total_ban: false,
            restriction_zones: true,
            ban_radius: 3_000.0,
            pz_radius: 20_000.0,
            sz_radius: 150_000.0,
            surveillance_radius: 15_000.0,
        }
    }
}

impl ControlParams {
    fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("control.ban_radius", self.ban_radius)?;
        check_non_negative("control.pz_radius", self.pz_radius)?;
        check_non_negative("control.sz_radius", self.sz_radius)?;
        check_non_negative("control.surveillance_radius", self.surveillance_radius)?;
        if self.sz_radius < self.pz_radius {
            return Err(ConfigError::invalid(
                "control.sz_radius",
                format!(
                    "surveillance radius {} is smaller than protection radius {}",
                    self.sz_radius, self.pz_radius
                ),
            ));
        }
        Ok(())
    }
}

// ── GridParams ─────────────────────────────────────────────────────

/// Spatial grid resolutions (metres) and diffusion thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridParams {
    /// Cell width of the vector density grid.
    pub vector_grid_width: f64,
    /// Cell width of the temperature grid.
    pub temp_grid_width: f64,
    /// Cell width of the rainfall grid.
    pub rain_grid_width: f64,
    /// Cell width of the autocorrelation field.
    pub autocorr_grid_width: f64,
    /// Cells with density at or below this do not diffuse.
    pub diffusion_density_floor: f64,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            vector_grid_width: 5_000.0,
            temp_grid_width: 5_000.0,
            rain_grid_width: 5_000.0,
            autocorr_grid_width: 5_000.0,
            diffusion_density_floor: 1e-5,
        }
    }
}

impl GridParams {
    /// Uniform diffusion coefficient (m²/day) implied by a daily dispersal
    /// length scale: `D = L² / 4`.
    pub fn diffusion_coefficient(length_scale: f64) -> f64 {
        length_scale * length_scale / 4.0
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_positive("grids.vector_grid_width", self.vector_grid_width)?;
        check_positive("grids.temp_grid_width", self.temp_grid_width)?;
        check_positive("grids.rain_grid_width", self.rain_grid_width)?;
        check_positive("grids.autocorr_grid_width", self.autocorr_grid_width)?;
        check_non_negative("grids.diffusion_density_floor", self.diffusion_density_floor)
    }
}

// ── AbundanceParams ────────────────────────────────────────────────

/// Settings of the climate-driven vector abundance regression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbundanceParams {
    /// Standard deviation of the per-farm, per-day noise term.
    pub noise_sd: f64,
    /// Cap on expected bites per animal per day.
    pub max_bites_per_animal: f64,
    /// Host-to-vector transmission is active strictly after this day of year.
    pub season_start: u32,
    /// Host-to-vector transmission is active strictly before this day of year.
    pub season_end: u32,
}

impl Default for AbundanceParams {
    fn default() -> Self {
        Self {
            noise_sd: 1.08 + 0.3763,
            max_bites_per_animal: 5000.0,
            season_start: 60,
            season_end: 330,
        }
    }
}

impl AbundanceParams {
    /// Whether vectors feed on hosts on this day of year.
    pub fn in_season(&self, day_of_year: u32) -> bool {
        day_of_year > self.season_start && day_of_year < self.season_end
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("abundance.noise_sd", self.noise_sd)?;
        check_non_negative("abundance.max_bites_per_animal", self.max_bites_per_animal)?;
        if self.season_start > self.season_end {
            return Err(ConfigError::invalid(
                "abundance.season_start",
                "season starts after it ends",
            ));
        }
        Ok(())
    }
}

// ── Checks ─────────────────────────────────────────────────────────

fn check_probability(name: &'static str, v: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&v) {
        return Err(ConfigError::invalid(name, format!("must be in [0, 1], got {v}")));
    }
    Ok(())
}

fn check_open_unit(name: &'static str, v: f64) -> Result<(), ConfigError> {
    if !(v > 0.0 && v < 1.0) {
        return Err(ConfigError::invalid(name, format!("must be in (0, 1), got {v}")));
    }
    Ok(())
}

fn check_non_negative(name: &'static str, v: f64) -> Result<(), ConfigError> {
    if !v.is_finite() || v < 0.0 {
        return Err(ConfigError::invalid(
            name,
            format!("must be finite and >= 0, got {v}"),
        ));
    }
    Ok(())
}

fn check_positive(name: &'static str, v: f64) -> Result<(), ConfigError> {
    if !v.is_finite() || v <= 0.0 {
        return Err(ConfigError::invalid(
            name,
            format!("must be finite and > 0, got {v}"),
        ));
    }
    Ok(())
}

fn check_stages(name: &'static str, n: usize) -> Result<(), ConfigError> {
    if n == 0 || n > MAX_STAGES {
        return Err(ConfigError::invalid(
            name,
            format!("must be in 1..={MAX_STAGES}, got {n}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Parameters::default().validate().unwrap();
    }

    #[test]
    fn substeps_are_exact_counts() {
        let sim = SimulationParams {
            dt: 0.1,
            ..SimulationParams::default()
        };
        assert_eq!(sim.diffusion_substeps(), 10);
        let sim = SimulationParams {
            dt: 0.3,
            ..SimulationParams::default()
        };
        // 1/0.3 = 3.33 -> 3, never a fourth partial step
        assert_eq!(sim.diffusion_substeps(), 3);
        assert_eq!(SimulationParams::default().farm_substeps(), 10);
    }

    #[test]
    fn rejects_zero_timestep() {
        let mut params = Parameters::default();
        params.simulation.dt = 0.0;
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("simulation.dt"));
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let mut params = Parameters::default();
        params.epi.p_h = 1.5;
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_too_many_stages() {
        let mut params = Parameters::default();
        params.epi.num_eip_stages = MAX_STAGES + 1;
        assert!(params.validate().is_err());
        params.epi.num_eip_stages = 0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_surveillance_inside_protection() {
        let mut params = Parameters::default();
        params.control.sz_radius = 10.0;
        params.control.pz_radius = 20.0;
        let err = params.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "control.sz_radius",
                ..
            }
        ));
    }

    #[test]
    fn rejects_degenerate_shipment_probability() {
        let mut params = Parameters::default();
        params.movement.sheep_shipment_p = 1.0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn toml_overrides_only_named_fields() {
        let params = Parameters::from_toml_str(
            r#"
            [epi]
            num_inf_stages_sheep = 3
            p_v = 0.02

            [grids]
            vector_grid_width = 2500.0
            "#,
        )
        .unwrap();
        assert_eq!(params.epi.num_inf_stages_sheep, 3);
        assert_eq!(params.epi.p_v, 0.02);
        assert_eq!(params.epi.num_inf_stages_cattle, 5);
        assert_eq!(params.grids.vector_grid_width, 2500.0);
        assert_eq!(params.control, ControlParams::default());
    }

    #[test]
    fn toml_parse_error_is_reported() {
        let err = Parameters::from_toml_str("[epi\np_v = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn toml_validation_error_is_reported() {
        let err = Parameters::from_toml_str("[simulation]\nnum_reps = 0\n").unwrap_err();
        assert!(err.to_string().contains("num_reps"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Parameters::from_path("/nonexistent/vectra/params.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn season_window_is_exclusive() {
        let a = AbundanceParams::default();
        assert!(!a.in_season(60));
        assert!(a.in_season(61));
        assert!(a.in_season(329));
        assert!(!a.in_season(330));
    }

    #[test]
    fn poisson_regime_bounds() {
        let approx = PoissonApprox::default();
        assert!(approx.applies(1000, 0.005));
        assert!(!approx.applies(100, 0.005));
        assert!(!approx.applies(1000, 0.01));
        assert!(!approx.applies(5000, 0.005));
    }

    #[test]
    fn cattle_have_no_mortality() {
        let epi = EpiParams::default();
        assert_eq!(epi.mortality_rate(HostSpecies::Cattle), 0.0);
        assert!(epi.mortality_rate(HostSpecies::Sheep) > 0.0);
    }

    #[test]
    fn diffusion_coefficient_from_length_scale() {
        assert_eq!(GridParams::diffusion_coefficient(2000.0), 1_000_000.0);
    }
}
