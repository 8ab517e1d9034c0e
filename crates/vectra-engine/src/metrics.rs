//! Per-day timing metrics.

use indexmap::IndexMap;

/// Wall-clock timings for one simulated day.
///
/// All durations are in microseconds. Phases appear in execution order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DayMetrics {
    /// Simulation day the metrics describe.
    pub day: u32,
    /// Wall-clock time for the whole day, in microseconds.
    pub total_us: u64,
    /// Per-phase execution times, keyed by phase name.
    pub phase_us: IndexMap<String, u64>,
}

impl DayMetrics {
    /// Empty metrics for `day`.
    pub fn new(day: u32) -> Self {
        Self {
            day,
            ..Self::default()
        }
    }

    /// Record the time spent in one phase.
    pub fn record(&mut self, phase: &str, micros: u64) {
        *self.phase_us.entry(phase.to_string()).or_insert(0) += micros;
    }

    /// Time spent in `phase`, if it ran.
    pub fn phase(&self, phase: &str) -> Option<u64> {
        self.phase_us.get(phase).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_empty() {
        let m = DayMetrics::default();
        assert_eq!(m.total_us, 0);
        assert!(m.phase_us.is_empty());
    }

    #[test]
    fn phases_keep_insertion_order() {
        let mut m = DayMetrics::new(3);
        m.record("vector_diffusion", 50);
        m.record("control_measures", 5);
        m.record("vector_diffusion", 10);
        let names: Vec<_> = m.phase_us.keys().map(String::as_str).collect();
        assert_eq!(names, ["vector_diffusion", "control_measures"]);
        assert_eq!(m.phase("vector_diffusion"), Some(60));
        assert_eq!(m.phase("farm_epidemics"), None);
        assert_eq!(m.day, 3);
    }
}
