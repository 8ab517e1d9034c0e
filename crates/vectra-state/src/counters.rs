//! Daily and cumulative event counters.

use serde::Serialize;

/// Events counted during one simulated day. Reset at the start of each day.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DailyCounters {
    /// Farms detected today (by mortality or passive detection).
    pub farms_detected: u32,
    /// New sheep infections from vector bites.
    pub sheep_infected: u32,
    /// New cattle infections from vector bites.
    pub cattle_infected: u32,
    /// Sheep killed by infection.
    pub sheep_deaths: u32,
    /// Movement edges that fired today.
    pub movements_attempted: u32,
    /// Fired movements stopped by a ban or zone.
    pub interrupted_movements: u32,
    /// Interrupted movements whose source carried infection.
    pub risky_moves_blocked: u32,
    /// Movements that carried at least one infected animal.
    pub movement_transmissions: u32,
    /// Infected animals moved between farms.
    pub infected_animals_moved: u32,
    /// Farms sampled by active surveillance.
    pub farms_checked: u32,
    /// Animals tested by active surveillance.
    pub tests: u64,
    /// Positive tests from active surveillance.
    pub positive_tests: u64,
}

impl DailyCounters {
    /// Zero every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Run totals. Every field only increases.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CumulativeCounters {
    /// Farm detections.
    pub detections: u64,
    /// Sheep infected by vectors.
    pub sheep_infections: u64,
    /// Cattle infected by vectors.
    pub cattle_infections: u64,
    /// Sheep killed by infection.
    pub sheep_deaths: u64,
    /// Movement edges that fired.
    pub movements_attempted: u64,
    /// Movements stopped by control.
    pub interrupted_movements: u64,
    /// Stopped movements whose source carried infection.
    pub risky_moves_blocked: u64,
    /// Movements that carried infection.
    pub movement_transmissions: u64,
    /// Infected animals moved.
    pub infected_animals_moved: u64,
    /// Farms sampled by active surveillance.
    pub farms_checked: u64,
    /// Animals tested.
    pub tests: u64,
    /// Positive tests.
    pub positive_tests: u64,
    /// Days on which at least one farm was under a movement ban.
    pub days_of_movement_ban: u64,
    /// Sum over days of the number of banned farms.
    pub farm_days_banned: u64,
    /// Sum over days of the number of farms outside the free area.
    pub farm_days_affected_by_control: u64,
}

impl CumulativeCounters {
    /// Fold one day's events into the run totals.
    pub fn absorb(&mut self, day: &DailyCounters) {
        self.detections += u64::from(day.farms_detected);
        self.sheep_infections += u64::from(day.sheep_infected);
        self.cattle_infections += u64::from(day.cattle_infected);
        self.sheep_deaths += u64::from(day.sheep_deaths);
        self.movements_attempted += u64::from(day.movements_attempted);
        self.interrupted_movements += u64::from(day.interrupted_movements);
        self.risky_moves_blocked += u64::from(day.risky_moves_blocked);
        self.movement_transmissions += u64::from(day.movement_transmissions);
        self.infected_animals_moved += u64::from(day.infected_animals_moved);
        self.farms_checked += u64::from(day.farms_checked);
        self.tests += day.tests;
        self.positive_tests += day.positive_tests;
    }

    /// Add one day of control burden.
    pub fn record_control_burden(&mut self, banned_farms: u64, restricted_farms: u64) {
        if banned_farms > 0 {
            self.days_of_movement_ban += 1;
        }
        self.farm_days_banned += banned_farms;
        self.farm_days_affected_by_control += restricted_farms;
    }
}
