//! Whole-run scenario properties.

use std::sync::Arc;

use vectra_core::{ChaChaSource, FarmId, HostSpecies, Parameters, RandomSource, VectorSpecies};
use vectra_engine::{simulate_day, DayPipeline, Simulation};
use vectra_state::{CumulativeCounters, ScenarioBuilder, ScenarioLoader, SimulationState};
use vectra_test_utils::{cell_centre_farm, test_params, test_scenario, ConstantSpecies};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn herd_snapshot(state: &SimulationState) -> Vec<(u32, Vec<u32>, u32, u32, Vec<u32>, u32)> {
    state
        .farms
        .iter()
        .map(|f| {
            (
                f.sheep.susceptible,
                f.sheep.infectious.clone(),
                f.sheep.recovered,
                f.cattle.susceptible,
                f.cattle.infectious.clone(),
                f.cattle.recovered,
            )
        })
        .collect()
}

/// Seven farms on a 9×9 grid around a patch of infectious vectors.
fn outbreak(days: usize) -> ScenarioBuilder {
    test_scenario(9, 9, days, 20.0)
        .farm(cell_centre_farm(4, 4).sheep(200).cattle(40))
        .farm(cell_centre_farm(4, 5).sheep(80))
        .farm(cell_centre_farm(5, 4).cattle(60))
        .farm(cell_centre_farm(2, 2).sheep(30).cattle(30))
        .farm(cell_centre_farm(6, 6).sheep(150))
        .farm(cell_centre_farm(1, 7).cattle(25))
        .farm(cell_centre_farm(7, 1).sheep(10).cattle(10))
        .seed_infectious_vectors(4500.0, 4500.0, 1600.0, 50.0)
}

fn outbreak_params(days: u32) -> Parameters {
    let mut params = test_params(days);
    params.simulation.start_day_of_year = 150;
    params.epi.diffusion_length_scale = 300.0;
    params.epi.detection_prob_sheep = 0.05;
    params.epi.detection_prob_cattle = 0.01;
    params.control.enabled = true;
    params.control.pz_radius = 2000.0;
    params.control.sz_radius = 5000.0;
    params.control.surveillance_radius = 1500.0;
    params
}

fn biting_species() -> Arc<dyn VectorSpecies> {
    Arc::new(ConstantSpecies::new(0.3, 0.1, 0.2))
}

#[test]
fn quiescent_scenario_is_unchanged() {
    init_tracing();
    let mut params = test_params(20);
    params.epi.diffusion_length_scale = 300.0;
    let loader = test_scenario(5, 5, 20, 18.0)
        .farm(cell_centre_farm(1, 1).sheep(40).cattle(10))
        .farm(cell_centre_farm(3, 3).cattle(25))
        .farm(cell_centre_farm(2, 3).sheep(7));
    let mut sim = Simulation::new(params, &loader, biting_species(), 0).unwrap();
    let before = herd_snapshot(sim.state());
    let summary = sim.run();

    assert_eq!(herd_snapshot(sim.state()), before);
    assert_eq!(sim.state().vectors.total_mass(), 0.0);
    assert_eq!(summary.farms_ever_infected, 0);
    assert_eq!(summary.cumulative.detections, 0);
    assert_eq!(summary.cumulative.movements_attempted, 0);
    assert_eq!(summary.cumulative, CumulativeCounters::default());
    assert_eq!(summary.days, 20);

    let state = sim.state();
    assert!(!state.outbreak.observed());
    assert!(!state.outbreak.zones_implemented());
    assert!(!state.outbreak.surveillance_performed());
    for farm in &state.farms {
        assert!(!farm.status.detected());
        assert!(!farm.status.ever_detected());
        assert!(!farm.status.ever_infected());
        assert!(!farm.status.movement_banned());
        assert!(farm.status.free_area());
    }
}

#[test]
fn recovery_matches_exponential_sojourn() {
    let rate = 0.2;
    let days = 5;
    let reps = 1000;
    let mut recovered = 0u32;
    for rep in 0..reps {
        let mut params = test_params(days);
        params.epi.num_inf_stages_cattle = 1;
        params.epi.rec_rate_cattle = rate;
        let loader = test_scenario(3, 3, days as usize, 15.0)
            .farm(cell_centre_farm(1, 1).infected(HostSpecies::Cattle, 0, 10));
        let mut sim = Simulation::new(params, &loader, biting_species(), rep).unwrap();
        sim.run();
        let cattle = &sim.state().farms[0].cattle;
        assert_eq!(cattle.total(), 10);
        recovered += cattle.recovered;
    }
    let fraction = f64::from(recovered) / f64::from(reps * 10);
    let expected = 1.0 - (-rate * f64::from(days)).exp();
    assert!(
        (fraction - expected).abs() < 0.03,
        "recovered fraction {fraction:.4}, expected {expected:.4}"
    );
}

#[test]
fn certain_edge_moves_infection() {
    let mut params = test_params(1);
    params.epi.rec_rate_sheep = 0.0;
    params.epi.sheep_mortality_rate = 0.0;
    let loader = test_scenario(3, 4, 1, 15.0)
        .farm(cell_centre_farm(1, 1).infected(HostSpecies::Sheep, 0, 60))
        .farm(cell_centre_farm(1, 2).sheep(30))
        .edge(0, 1, 1.0);
    let mut sim = Simulation::new(params, &loader, biting_species(), 3).unwrap();
    sim.step();

    let s = sim.state();
    let received = s.farms[1].sheep.infected();
    assert!(received >= 1);
    assert_eq!(s.farms[0].sheep.infected(), 60 - received);
    assert_eq!(s.cumulative.infected_animals_moved, u64::from(received));
    assert!(s.farms[1].status.first_infected_by_movement());
}

#[test]
fn local_ban_reaches_only_nearby_farms() {
    let mut params = test_params(1);
    params.control.enabled = true;
    params.control.ban_radius = 2500.0;
    params.epi.detection_prob_sheep = 1.0;
    let loader = test_scenario(3, 8, 1, 15.0)
        .farm(cell_centre_farm(1, 1).infected(HostSpecies::Sheep, 0, 4))
        .farm(cell_centre_farm(1, 3).cattle(5))
        .farm(cell_centre_farm(1, 6).cattle(5));
    let mut sim = Simulation::new(params, &loader, biting_species(), 0).unwrap();
    sim.step();

    let s = sim.state();
    assert!(s.farms[0].status.detected());
    assert!(s.farms[0].status.movement_banned());
    assert!(s.farms[1].status.movement_banned());
    assert!(!s.farms[2].status.movement_banned());
    assert_eq!(s.outbreak.first_detected(), Some(FarmId(0)));
}

#[test]
fn outbreak_spreads_from_vectors() {
    init_tracing();
    let params = outbreak_params(30);
    let mut sim = Simulation::new(params, &outbreak(30), biting_species(), 1).unwrap();
    let summary = sim.run();
    assert!(summary.farms_ever_infected > 0);
    assert!(summary.cumulative.sheep_infections + summary.cumulative.cattle_infections > 0);
    assert_eq!(sim.last_metrics().phase_us.len(), 5);
}

#[test]
fn herd_totals_only_drop_by_deaths() {
    let params = outbreak_params(25);
    let mut sim = Simulation::new(params, &outbreak(25), biting_species(), 2).unwrap();
    let initial: u64 = [HostSpecies::Sheep, HostSpecies::Cattle]
        .into_iter()
        .map(|sp| sim.state().total_animals(sp))
        .sum();
    let cattle = sim.state().total_animals(HostSpecies::Cattle);
    while !sim.is_finished() {
        sim.step();
        let s = sim.state();
        assert_eq!(s.total_animals(HostSpecies::Cattle), cattle);
        let now = s.total_animals(HostSpecies::Sheep) + s.total_animals(HostSpecies::Cattle);
        assert_eq!(now + s.cumulative.sheep_deaths, initial);
    }
}

#[test]
fn identical_seeds_reproduce_runs() {
    let a = Simulation::new(outbreak_params(20), &outbreak(20), biting_species(), 4)
        .unwrap()
        .run();
    let b = Simulation::new(outbreak_params(20), &outbreak(20), biting_species(), 4)
        .unwrap()
        .run();
    assert_eq!(a, b);
}

/// Random source recording the arguments of infection draws.
struct RecordingSource {
    inner: ChaChaSource,
    poisson_means: Vec<f64>,
    binomial_trials: Vec<(u32, f64)>,
}

impl RecordingSource {
    fn new(seed: u64) -> Self {
        Self {
            inner: ChaChaSource::new(seed),
            poisson_means: Vec::new(),
            binomial_trials: Vec::new(),
        }
    }
}

impl RandomSource for RecordingSource {
    fn uniform(&mut self) -> f64 {
        self.inner.uniform()
    }

    fn gaussian(&mut self) -> f64 {
        self.inner.gaussian()
    }

    fn poisson(&mut self, lambda: f64) -> u32 {
        self.poisson_means.push(lambda);
        self.inner.poisson(lambda)
    }

    fn binomial(&mut self, n: u32, p: f64) -> u32 {
        self.binomial_trials.push((n, p));
        self.inner.binomial(n, p)
    }

    fn gamma(&mut self, shape: f64, scale: f64) -> f64 {
        self.inner.gamma(shape, scale)
    }
}

/// One large cattle herd under a light vector challenge: 2 000 head with a
/// per-animal infection probability of about 0.2 %.
fn large_herd_day(params: &Parameters) -> (SimulationState, RecordingSource, f64) {
    let mut state = test_scenario(3, 3, 1, 15.0)
        .farm(cell_centre_farm(1, 1).cattle(2000))
        .seed_infectious_vectors(1500.0, 1500.0, 10.0, 17.0)
        .load(params)
        .unwrap();
    let species = ConstantSpecies::new(0.3, 0.0, 0.0);
    let mut rng = RecordingSource::new(21);
    simulate_day(&mut DayPipeline::standard(), &mut state, params, &species, &mut rng);

    let force = state.farms[0].force;
    assert!(force > 0.0);
    let p = 1.0 - (-force / 2000.0 * params.epi.p_h).exp();
    (state, rng, p)
}

#[test]
fn large_herds_draw_infections_from_poisson() {
    let params = test_params(1);
    let (state, rng, p) = large_herd_day(&params);
    assert!(params.epi.poisson_approx.applies(2000, p));

    assert!(rng.binomial_trials.iter().all(|&(n, _)| n == 0));
    let means: Vec<f64> = rng.poisson_means.iter().copied().filter(|&m| m > 0.0).collect();
    assert_eq!(means.len(), 1);
    assert!((means[0] - 2000.0 * p).abs() < 1e-9);

    let infected = state.farms[0].cattle.infected();
    assert!(infected <= 2000);
    assert_eq!(state.daily.cattle_infected, infected);
    assert_eq!(state.cumulative.cattle_infections, u64::from(infected));
}

#[test]
fn large_herds_outside_the_regime_draw_binomially() {
    let mut params = test_params(1);
    params.epi.poisson_approx.min_population = u32::MAX;
    let (_, rng, p) = large_herd_day(&params);
    assert!(rng.poisson_means.iter().all(|&m| m == 0.0));
    assert!(rng
        .binomial_trials
        .iter()
        .any(|&(n, q)| n == 2000 && (q - p).abs() < 1e-15));
}
