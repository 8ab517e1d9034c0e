//! Per-farm progression keeps herds non-negative and closed.

use proptest::prelude::*;
use vectra_core::{ChaChaSource, HostSpecies};
use vectra_phases::{DayContext, FarmEpidemics, Phase};
use vectra_state::ScenarioLoader;
use vectra_test_utils::{cell_centre_farm, test_params, test_scenario, ConstantSpecies};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn progression_conserves_herds(
        seed in any::<u64>(),
        stages in 1usize..8,
        infected in proptest::collection::vec(0u32..40, 8),
        susceptible in 0u32..200,
        recovery in 0.0f64..3.0,
        mortality in 0.0f64..3.0,
    ) {
        let mut params = test_params(1);
        params.epi.num_inf_stages_sheep = stages;
        params.epi.num_inf_stages_cattle = stages;
        params.epi.rec_rate_sheep = recovery;
        params.epi.rec_rate_cattle = recovery;
        params.epi.sheep_mortality_rate = mortality;

        let mut spec = cell_centre_farm(1, 1).sheep(susceptible).cattle(susceptible);
        for (stage, &n) in infected.iter().take(stages).enumerate() {
            spec = spec
                .infected(HostSpecies::Sheep, stage, n)
                .infected(HostSpecies::Cattle, stage, n);
        }
        let mut state = test_scenario(3, 3, 1, 15.0).farm(spec).load(&params).unwrap();
        let sheep_before = state.farms[0].sheep.total();
        let cattle_before = state.farms[0].cattle.total();

        let species = ConstantSpecies::inert();
        let mut rng = ChaChaSource::new(seed);
        FarmEpidemics.run(&mut DayContext::new(&mut state, &params, &species, &mut rng));

        let farm = &state.farms[0];
        prop_assert_eq!(farm.cattle.total(), cattle_before);
        prop_assert_eq!(farm.sheep.total() + state.daily.sheep_deaths, sheep_before);
        prop_assert!(farm.sheep.recovered + farm.cattle.recovered <= 2 * infected.iter().take(stages).sum::<u32>());
    }
}
