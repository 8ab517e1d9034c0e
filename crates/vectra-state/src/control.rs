//! One-way control latches on farms and on the run.

use serde::Serialize;
use vectra_core::FarmId;

/// Control flags of one farm.
///
/// Every flag is a latch: `detected`, `movement_banned`, the zone flags and
/// the history flags only turn on, and `free_area` only turns off. The
/// setters are the only mutation path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ControlStatus {
    detected: bool,
    movement_banned: bool,
    protection_zone: bool,
    surveillance_zone: bool,
    free_area: bool,
    ever_detected: bool,
    ever_infected: bool,
    first_infected_by_movement: bool,
}

impl Default for ControlStatus {
    fn default() -> Self {
        Self {
            detected: false,
            movement_banned: false,
            protection_zone: false,
            surveillance_zone: false,
            free_area: true,
            ever_detected: false,
            ever_infected: false,
            first_infected_by_movement: false,
        }
    }
}

impl ControlStatus {
    /// Infection on this farm has been confirmed.
    pub fn detected(&self) -> bool {
        self.detected
    }

    /// Movements to and from this farm are forbidden.
    pub fn movement_banned(&self) -> bool {
        self.movement_banned
    }

    /// Inside the protection zone around the first detection.
    pub fn protection_zone(&self) -> bool {
        self.protection_zone
    }

    /// Inside the surveillance band around the first detection.
    pub fn surveillance_zone(&self) -> bool {
        self.surveillance_zone
    }

    /// Outside every ban and zone.
    pub fn free_area(&self) -> bool {
        self.free_area
    }

    /// Detection side effects have run at least once for this farm.
    pub fn ever_detected(&self) -> bool {
        self.ever_detected
    }

    /// The farm has carried infection at some point in the run.
    pub fn ever_infected(&self) -> bool {
        self.ever_infected
    }

    /// The farm's first infection arrived through a livestock movement.
    pub fn first_infected_by_movement(&self) -> bool {
        self.first_infected_by_movement
    }

    /// Mark detected. Returns `true` if the farm was not detected before.
    pub fn mark_detected(&mut self) -> bool {
        !std::mem::replace(&mut self.detected, true)
    }

    /// Mark that detection side effects have run. Returns `true` the first time.
    pub fn mark_ever_detected(&mut self) -> bool {
        !std::mem::replace(&mut self.ever_detected, true)
    }

    /// Ban movements; the farm leaves the free area.
    pub fn ban_movements(&mut self) {
        self.movement_banned = true;
        self.free_area = false;
    }

    /// Enter the protection zone; the farm leaves the free area.
    pub fn enter_protection_zone(&mut self) {
        self.protection_zone = true;
        self.free_area = false;
    }

    /// Enter the surveillance zone; the farm leaves the free area.
    pub fn enter_surveillance_zone(&mut self) {
        self.surveillance_zone = true;
        self.free_area = false;
    }

    /// Record that the farm carries infection. Returns `true` the first time.
    pub fn mark_infected(&mut self) -> bool {
        !std::mem::replace(&mut self.ever_infected, true)
    }

    /// Record that a movement delivered the farm's first infection.
    ///
    /// Has no effect on a farm that was already infected.
    pub fn mark_infected_by_movement(&mut self) {
        if self.mark_infected() {
            self.first_infected_by_movement = true;
        }
    }
}

/// Run-level outbreak latches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OutbreakStatus {
    first_detected: Option<FarmId>,
    zones_implemented: bool,
    surveillance_performed: bool,
    days_since_last_detection: u32,
}

impl OutbreakStatus {
    /// Whether any farm has been detected with control enabled.
    pub fn observed(&self) -> bool {
        self.first_detected.is_some()
    }

    /// The farm whose detection first observed the outbreak.
    pub fn first_detected(&self) -> Option<FarmId> {
        self.first_detected
    }

    /// Restriction zones have been laid out.
    pub fn zones_implemented(&self) -> bool {
        self.zones_implemented
    }

    /// Active surveillance has been carried out.
    pub fn surveillance_performed(&self) -> bool {
        self.surveillance_performed
    }

    /// Days since the most recent detection, counted once observed.
    pub fn days_since_last_detection(&self) -> u32 {
        self.days_since_last_detection
    }

    /// Latch the outbreak as observed at `farm`. Returns `true` if this call
    /// fired the latch; later calls leave the first farm in place.
    pub fn observe(&mut self, farm: FarmId) -> bool {
        if self.first_detected.is_some() {
            return false;
        }
        self.first_detected = Some(farm);
        true
    }

    /// Latch restriction zones as implemented.
    pub fn mark_zones_implemented(&mut self) {
        self.zones_implemented = true;
    }

    /// Latch active surveillance as performed.
    pub fn mark_surveillance_performed(&mut self) {
        self.surveillance_performed = true;
    }

    /// End-of-day update of the detection clock.
    pub fn tick_detection_clock(&mut self, detected_today: bool) {
        if detected_today {
            self.days_since_last_detection = 0;
        } else if self.observed() {
            self.days_since_last_detection += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_farm_is_free() {
        let s = ControlStatus::default();
        assert!(s.free_area());
        assert!(!s.detected());
        assert!(!s.movement_banned());
    }

    #[test]
    fn any_restriction_clears_free_area() {
        let mut a = ControlStatus::default();
        a.ban_movements();
        assert!(a.movement_banned() && !a.free_area());

        let mut b = ControlStatus::default();
        b.enter_protection_zone();
        assert!(b.protection_zone() && !b.free_area());

        let mut c = ControlStatus::default();
        c.enter_surveillance_zone();
        assert!(c.surveillance_zone() && !c.free_area());
    }

    #[test]
    fn detection_latch_reports_first_transition() {
        let mut s = ControlStatus::default();
        assert!(s.mark_detected());
        assert!(!s.mark_detected());
        assert!(s.detected());
    }

    #[test]
    fn movement_infection_only_counts_when_first() {
        let mut s = ControlStatus::default();
        s.mark_infected();
        s.mark_infected_by_movement();
        assert!(s.ever_infected());
        assert!(!s.first_infected_by_movement());

        let mut t = ControlStatus::default();
        t.mark_infected_by_movement();
        assert!(t.first_infected_by_movement());
    }

    #[test]
    fn observe_keeps_first_farm() {
        let mut o = OutbreakStatus::default();
        assert!(!o.observed());
        assert!(o.observe(FarmId(3)));
        assert!(!o.observe(FarmId(5)));
        assert_eq!(o.first_detected(), Some(FarmId(3)));
    }

    #[test]
    fn detection_clock_starts_once_observed() {
        let mut o = OutbreakStatus::default();
        o.tick_detection_clock(false);
        assert_eq!(o.days_since_last_detection(), 0);
        o.observe(FarmId(0));
        o.tick_detection_clock(true);
        o.tick_detection_clock(false);
        o.tick_detection_clock(false);
        assert_eq!(o.days_since_last_detection(), 2);
        o.tick_detection_clock(true);
        assert_eq!(o.days_since_last_detection(), 0);
    }
}
