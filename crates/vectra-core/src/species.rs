//! The [`VectorSpecies`] trait and the built-in [`Culicoides`] curves.
//!
//! A vector species is a bundle of three temperature-dependent daily rates.
//! The engine never branches on which species is active; it only calls
//! through the trait.

/// Temperature-dependent rate curves of a vector species.
///
/// Temperatures are in degrees Celsius; rates are per day.
///
/// # Contract
///
/// - Every method is pure: same temperature, same rate.
/// - Rates are finite and non-negative for every finite temperature.
///
/// # Object safety
///
/// This trait is object-safe; phases receive it as `&dyn VectorSpecies`.
///
/// # Examples
///
/// ```
/// use vectra_core::{Culicoides, VectorSpecies};
///
/// let c = Culicoides;
/// assert_eq!(c.name(), "Culicoides");
/// assert_eq!(c.biting_rate(2.0), 0.0);
/// assert!(c.biting_rate(20.0) > 0.0);
/// ```
pub trait VectorSpecies: Send + Sync {
    /// Human-readable species name for logging.
    fn name(&self) -> &str;

    /// Bites per vector per day.
    fn biting_rate(&self, temperature: f64) -> f64;

    /// Daily mortality hazard.
    fn mortality_rate(&self, temperature: f64) -> f64;

    /// Rate of passage through the whole extrinsic incubation period.
    fn incubation_rate(&self, temperature: f64) -> f64;
}

/// *Culicoides* biting midges, the principal bluetongue vector in Europe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Culicoides;

impl Culicoides {
    const BITING_T_MIN: f64 = 3.7;
    const BITING_T_MAX: f64 = 41.9;
    /// Below this temperature midges die within the day.
    const COLD_KILL_T: f64 = -2.0;
    const COLD_KILL_RATE: f64 = 100.0;
    const EIP_T_MIN: f64 = 13.4;
}

impl VectorSpecies for Culicoides {
    fn name(&self) -> &str {
        "Culicoides"
    }

    fn biting_rate(&self, t: f64) -> f64 {
        if t > Self::BITING_T_MIN && t < Self::BITING_T_MAX {
            0.0002 * t * (t - Self::BITING_T_MIN) * (Self::BITING_T_MAX - t).powf(0.37)
        } else {
            0.0
        }
    }

    fn mortality_rate(&self, t: f64) -> f64 {
        if t > Self::COLD_KILL_T {
            0.009 * (0.16 * t).exp()
        } else {
            Self::COLD_KILL_RATE
        }
    }

    fn incubation_rate(&self, t: f64) -> f64 {
        (0.018 * (t - Self::EIP_T_MIN)).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn biting_is_zero_outside_window() {
        let c = Culicoides;
        assert_eq!(c.biting_rate(3.7), 0.0);
        assert_eq!(c.biting_rate(41.9), 0.0);
        assert_eq!(c.biting_rate(-5.0), 0.0);
        assert_eq!(c.biting_rate(45.0), 0.0);
    }

    #[test]
    fn biting_matches_curve_at_twenty_degrees() {
        let expected = 0.0002 * 20.0 * 16.3 * 21.9f64.powf(0.37);
        assert!((Culicoides.biting_rate(20.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn mortality_switches_to_cold_kill() {
        let c = Culicoides;
        assert_eq!(c.mortality_rate(-2.0), 100.0);
        assert!((c.mortality_rate(0.0) - 0.009).abs() < 1e-12);
        assert!(c.mortality_rate(25.0) > c.mortality_rate(15.0));
    }

    #[test]
    fn incubation_clamps_at_threshold() {
        let c = Culicoides;
        assert_eq!(c.incubation_rate(10.0), 0.0);
        assert_eq!(c.incubation_rate(13.4), 0.0);
        assert!((c.incubation_rate(23.4) - 0.18).abs() < 1e-12);
    }

    #[test]
    fn usable_as_trait_object() {
        let s: &dyn VectorSpecies = &Culicoides;
        assert_eq!(s.name(), "Culicoides");
    }
}
