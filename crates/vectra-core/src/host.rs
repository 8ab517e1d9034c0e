//! Host (livestock) species.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A livestock species kept on farms.
///
/// Cattle and sheep differ in recovery rate, stage count, detection
/// probability, and vector biting preference. Only sheep die of infection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostSpecies {
    /// Cattle.
    Cattle,
    /// Sheep.
    Sheep,
}

impl HostSpecies {
    /// Both species, in the order per-farm updates visit them.
    pub const ALL: [HostSpecies; 2] = [HostSpecies::Sheep, HostSpecies::Cattle];
}

impl fmt::Display for HostSpecies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cattle => write!(f, "cattle"),
            Self::Sheep => write!(f, "sheep"),
        }
    }
}
