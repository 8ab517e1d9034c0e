//! Per-farm epidemic update.
//!
//! For each farm, in order:
//!
//! 1. cache today's weather and draw the abundance noise term;
//! 2. progress infection through the Erlang stages in Euler sub-steps,
//!    with recovery out of the last stage and sheep mortality in every
//!    stage, then run passive detection;
//! 3. infect hosts from the infectious vectors in the farm's cell;
//! 4. during the biting season, infect vectors from the farm's infectious
//!    hosts.
//!
//! Farms do not read each other's same-day changes in this phase, so the
//! farm iteration order does not affect the outcome.

use tracing::debug;
use vectra_core::{EpiParams, FarmId, HostSpecies, PoissonApprox, RandomSource, VectorSpecies};
use vectra_state::{Farm, FarmWeather, Herd, SimulationState};

use crate::control::ControlCoordinator;
use crate::phase::{DayContext, Phase};

/// Result of one day of stage progression for one species.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Progression {
    recovered: u32,
    deaths: u32,
}

/// Progress one herd through `substeps` Euler sub-steps of length `dt`.
///
/// Each sub-step walks the stages from last to first. The last stage
/// recovers; every stage then loses infection deaths, and earlier stages
/// advance one stage. Every draw is clamped to the stage's current stock.
fn progress_herd(
    herd: &mut Herd,
    recovery_rate: f64,
    mortality_rate: f64,
    dt: f64,
    substeps: u32,
    rng: &mut dyn RandomSource,
) -> Progression {
    let mut out = Progression::default();
    let last = herd.stages() - 1;
    let advance = dt * herd.stages() as f64 * recovery_rate;

    for _ in 0..substeps {
        for stage in (0..=last).rev() {
            let stock = herd.infectious[stage];
            let n = rng.poisson(advance * f64::from(stock)).min(stock);
            herd.advance(stage, n);
            if stage == last {
                out.recovered += n;
            }
            if mortality_rate > 0.0 {
                let stock = herd.infectious[stage];
                let dead = rng.poisson(dt * mortality_rate * f64::from(stock)).min(stock);
                herd.remove(stage, dead);
                out.deaths += dead;
            }
        }
    }
    out
}

/// Probability that none of `n` animals is detected when each is detected
/// independently with probability `p`, evaluated in log space.
fn escape_probability(n: u32, p: f64) -> f64 {
    if n == 0 {
        return 1.0;
    }
    (f64::from(n) * (1.0 - p).ln()).exp()
}

/// New infections among `susceptible` animals each infected with `p`.
fn draw_infections(
    susceptible: u32,
    p: f64,
    approx: &PoissonApprox,
    rng: &mut dyn RandomSource,
) -> u32 {
    if approx.applies(susceptible, p) {
        rng.poisson(f64::from(susceptible) * p).min(susceptible)
    } else {
        rng.binomial(susceptible, p)
    }
}

/// Daily per-farm epidemic phase.
#[derive(Clone, Copy, Debug, Default)]
pub struct FarmEpidemics;

impl FarmEpidemics {
    fn refresh_weather(state: &mut SimulationState, i: usize, noise: f64) {
        let day = state.simulation_day as usize;
        let cells = state.farms[i].cells;
        let weather = &state.weather;
        state.farms[i].weather = FarmWeather {
            temperature: weather.temperature.get(day, cells.temperature),
            rainfall: weather.rainfall.get(day, cells.rainfall),
            autocorrelation: weather.autocorrelation[cells.autocorr],
            noise,
        };
    }

    /// Stage progression for both species.
    fn progress(
        farm: &mut Farm,
        epi: &EpiParams,
        dt: f64,
        substeps: u32,
        rng: &mut dyn RandomSource,
    ) -> Progression {
        let mut total = Progression::default();
        for species in HostSpecies::ALL {
            let herd = farm.herd_mut(species);
            if herd.infected() == 0 {
                continue;
            }
            let p = progress_herd(
                herd,
                epi.recovery_rate(species),
                epi.mortality_rate(species),
                dt,
                substeps,
                rng,
            );
            total.recovered += p.recovered;
            total.deaths += p.deaths;
        }
        total
    }

    fn passive_detection(farm: &Farm, epi: &EpiParams, rng: &mut dyn RandomSource) -> bool {
        if farm.status.detected() {
            return false;
        }
        let cattle = farm.cattle.infected();
        let sheep = farm.sheep.infected();
        if cattle + sheep == 0 {
            return false;
        }
        let escape = escape_probability(cattle, epi.detection_prob(HostSpecies::Cattle))
            * escape_probability(sheep, epi.detection_prob(HostSpecies::Sheep));
        rng.uniform() < 1.0 - escape
    }

    /// Vector-to-host transmission. Returns new `(sheep, cattle)` infections.
    fn vectors_to_hosts(
        farm: &mut Farm,
        infectious_density: f64,
        epi: &EpiParams,
        species: &dyn VectorSpecies,
        rng: &mut dyn RandomSource,
    ) -> (u32, u32) {
        let biting = 1.0 - (-species.biting_rate(farm.weather.temperature)).exp();
        let force = farm.rel_local_weight * infectious_density * biting;
        farm.force = force;

        let pref = epi.preference_for_sheep;
        let effective = farm.effective_animals(pref);
        if effective < 1.0 {
            return (0, 0);
        }
        let p_sheep = 1.0 - (-force * (pref / effective) * epi.p_h).exp();
        let p_cattle = 1.0 - (-force * (1.0 / effective) * epi.p_h).exp();

        let sheep = draw_infections(farm.sheep.susceptible, p_sheep, &epi.poisson_approx, rng);
        let cattle = draw_infections(farm.cattle.susceptible, p_cattle, &epi.poisson_approx, rng);
        farm.sheep.infect(sheep);
        farm.cattle.infect(cattle);
        if sheep + cattle > 0 {
            farm.status.mark_infected();
        }
        (sheep, cattle)
    }
}

impl Phase for FarmEpidemics {
    fn name(&self) -> &str {
        "farm_epidemics"
    }

    fn run(&self, ctx: &mut DayContext<'_>) {
        let params = ctx.params;
        let epi = &params.epi;
        let dt_farm = params.simulation.dt_farm;
        let substeps = params.simulation.farm_substeps();
        let coordinator = ControlCoordinator::new(&params.control);
        let in_season = params.abundance.in_season(ctx.state.day_of_year);
        let mut latent_added = 0.0;
        let mut recovered = 0u32;

        for i in 0..ctx.state.farms.len() {
            let id = FarmId(i as u32);

            let noise = params.abundance.noise_sd * ctx.rng.gaussian();
            Self::refresh_weather(ctx.state, i, noise);

            // Deaths on an undetected farm give it away.
            let undetected = !ctx.state.farms[i].status.detected();
            let progression =
                Self::progress(&mut ctx.state.farms[i], epi, dt_farm, substeps, ctx.rng);
            ctx.state.daily.sheep_deaths += progression.deaths;
            recovered += progression.recovered;
            if undetected && progression.deaths > 0 {
                coordinator.farm_detected(ctx.state, id);
            }
            if Self::passive_detection(&ctx.state.farms[i], epi, ctx.rng) {
                coordinator.farm_detected(ctx.state, id);
            }

            let vector_cell = ctx.state.farms[i].cells.vector;
            let density = ctx.state.vectors.infectious[vector_cell];
            let (sheep, cattle) = Self::vectors_to_hosts(
                &mut ctx.state.farms[i],
                density,
                epi,
                ctx.species,
                ctx.rng,
            );
            ctx.state.daily.sheep_infected += sheep;
            ctx.state.daily.cattle_infected += cattle;

            if in_season {
                let farm = &ctx.state.farms[i];
                let infected = farm.effective_infected(epi.preference_for_sheep);
                if infected > 0.0 {
                    let log_bites = farm.abundance.log_bites(ctx.state.day_of_year, &farm.weather);
                    let bites = (epi.transmission_scalar * log_bites.exp())
                        .min(params.abundance.max_bites_per_animal);
                    let added = epi.p_v * infected * bites;
                    *ctx.state.vectors.latent.get_mut(0, vector_cell) += added;
                    latent_added += added;
                }
            }
        }

        let daily = &ctx.state.daily;
        debug!(
            detected = daily.farms_detected,
            sheep_infected = daily.sheep_infected,
            cattle_infected = daily.cattle_infected,
            sheep_deaths = daily.sheep_deaths,
            recovered,
            latent_added,
            in_season,
            "farm epidemics"
        );
    }
}
