//! Disease control: detection side effects, restriction zones, and active
//! surveillance.
//!
//! [`ControlCoordinator`] is the single place that reacts to a farm being
//! detected. [`ControlMeasures`] is the daily phase that lays out zones and
//! runs surveillance once the outbreak has been observed.

use tracing::{debug, info};
use vectra_core::{ControlParams, FarmId};
use vectra_state::SimulationState;

use crate::phase::{DayContext, Phase};

/// Applies the consequences of a farm detection.
///
/// On every detection event: mark the farm detected and count it, then, if
/// control is enabled, apply each enabled ban policy (local, county, total)
/// and latch the outbreak as observed at the first detected farm. The set
/// of farms within ban radius is computed on the farm's first detection and
/// cached on the farm for the rest of the run.
#[derive(Clone, Copy, Debug)]
pub struct ControlCoordinator<'a> {
    params: &'a ControlParams,
}

impl<'a> ControlCoordinator<'a> {
    /// Coordinator applying the given policy.
    pub fn new(params: &'a ControlParams) -> Self {
        Self { params }
    }

    /// Handle the detection of `farm`. A farm already detected is left
    /// untouched.
    pub fn farm_detected(&self, state: &mut SimulationState, farm: FarmId) {
        if !state.farm_mut(farm).status.mark_detected() {
            return;
        }
        state.daily.farms_detected += 1;
        let first_time = state.farm_mut(farm).status.mark_ever_detected();
        debug!(farm = %farm, first_time, "farm detected");

        if !self.params.enabled {
            return;
        }

        if state.farm(farm).local_farms().is_none() {
            let local = farms_within(state, farm, self.params.ban_radius);
            state.farm_mut(farm).set_local_farms(local);
        }

        if self.params.farm_ban {
            state.farm_mut(farm).status.ban_movements();
            let local = state.farm(farm).local_farms().unwrap_or_default().to_vec();
            for other in local {
                state.farm_mut(other).status.ban_movements();
            }
        }

        if self.params.county_ban {
            let county = state.farm(farm).county;
            for f in state.farms.iter_mut().filter(|f| f.county == county) {
                f.status.ban_movements();
            }
        }

        if self.params.total_ban {
            for f in &mut state.farms {
                f.status.ban_movements();
            }
        }

        if state.outbreak.observe(farm) {
            info!(
                farm = %farm,
                day = state.simulation_day,
                "outbreak observed at first detected farm"
            );
        }
    }
}

/// Farms other than `centre` strictly closer than `radius`.
fn farms_within(state: &SimulationState, centre: FarmId, radius: f64) -> Vec<FarmId> {
    let c = state.farm(centre);
    let r2 = radius * radius;
    state
        .farms
        .iter()
        .filter(|f| f.id != centre && f.dist_sq(c) < r2)
        .map(|f| f.id)
        .collect()
}

/// Daily control phase: restriction zones and active surveillance around
/// the first detected farm.
///
/// Does nothing while control is disabled or before the outbreak is
/// observed. Zones are laid out once (when zoning is enabled) and
/// surveillance runs once.
#[derive(Clone, Copy, Debug, Default)]
pub struct ControlMeasures;

impl ControlMeasures {
    fn set_up_zones(state: &mut SimulationState, centre: FarmId, params: &ControlParams) {
        let (cx, cy) = {
            let c = state.farm(centre);
            (c.x, c.y)
        };
        let pz2 = params.pz_radius * params.pz_radius;
        let sz2 = params.sz_radius * params.sz_radius;
        let (mut protection, mut surveillance) = (0usize, 0usize);
        for f in &mut state.farms {
            let (dx, dy) = (f.x - cx, f.y - cy);
            let d2 = dx * dx + dy * dy;
            if d2 <= pz2 {
                f.status.enter_protection_zone();
                protection += 1;
            } else if d2 <= sz2 {
                f.status.enter_surveillance_zone();
                surveillance += 1;
            }
        }
        state.outbreak.mark_zones_implemented();
        info!(
            centre = %centre,
            protection,
            surveillance,
            "restriction zones implemented"
        );
    }

    fn perform_surveillance(
        state: &mut SimulationState,
        centre: FarmId,
        control: &ControlParams,
    ) {
        let (cx, cy) = {
            let c = state.farm(centre);
            (c.x, c.y)
        };
        let r2 = control.surveillance_radius * control.surveillance_radius;
        let mut found = 0u32;
        for f in &mut state.farms {
            let (dx, dy) = (f.x - cx, f.y - cy);
            if dx * dx + dy * dy > r2 {
                continue;
            }
            state.daily.farms_checked += 1;
            state.daily.tests += u64::from(f.total_animals());
            let infected = f.infected();
            if infected > 0 {
                f.status.mark_detected();
                found += 1;
                let recovered = f.sheep.recovered + f.cattle.recovered;
                state.daily.positive_tests += u64::from(infected + recovered);
            }
        }
        state.outbreak.mark_surveillance_performed();
        info!(
            centre = %centre,
            checked = state.daily.farms_checked,
            tests = state.daily.tests,
            positive = state.daily.positive_tests,
            found,
            "active surveillance performed"
        );
    }
}

impl Phase for ControlMeasures {
    fn name(&self) -> &str {
        "control_measures"
    }

    fn run(&self, ctx: &mut DayContext<'_>) {
        let control = &ctx.params.control;
        if !control.enabled {
            return;
        }
        let Some(centre) = ctx.state.outbreak.first_detected() else {
            return;
        };
        if control.restriction_zones && !ctx.state.outbreak.zones_implemented() {
            Self::set_up_zones(ctx.state, centre, control);
        }
        if !ctx.state.outbreak.surveillance_performed() {
            Self::perform_surveillance(ctx.state, centre, control);
        }
    }
}
