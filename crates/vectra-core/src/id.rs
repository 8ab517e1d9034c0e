//! Strongly-typed identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a farm within a simulation state.
///
/// `FarmId(n)` is the n-th farm in the loaded farm collection. Farms are
/// allocated once at setup and never removed, so an id stays valid for the
/// whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FarmId(pub u32);

impl FarmId {
    /// Position of this farm in the farm collection.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for FarmId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Administrative county a farm is registered in.
///
/// County bans act on every farm sharing the detected farm's county.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CountyId(pub u32);

impl fmt::Display for CountyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CountyId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
