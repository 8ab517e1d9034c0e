//! Livestock movement network.

use serde::{Deserialize, Serialize};
use vectra_core::FarmId;

/// A directed trading link with a daily probability of a shipment.
///
/// Edges are processed in list order every day; order matters because
/// edges sharing a farm mutate the same herd counts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovementEdge {
    /// Sending farm.
    pub from: FarmId,
    /// Receiving farm.
    pub to: FarmId,
    /// Probability a shipment happens on a given day.
    pub probability: f64,
}

impl MovementEdge {
    /// A link from `from` to `to` firing with daily `probability`.
    pub fn new(from: FarmId, to: FarmId, probability: f64) -> Self {
        Self {
            from,
            to,
            probability,
        }
    }
}
