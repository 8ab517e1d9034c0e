//! Livestock movement transmission.
//!
//! Every edge of the movement network is visited once per day in list
//! order. A shipment fires with the edge's daily probability and is
//! stopped when control forbids it. Otherwise one species is chosen in
//! proportion to the source's head counts, a shipment size is drawn, and
//! each shipped animal is infected with probability `infected / total`.
//! Only infected animals are transferred; each one leaves a stage chosen in
//! proportion to current stage occupancy and arrives in the same stage.

use tracing::debug;
use vectra_core::{HostSpecies, MovementParams, RandomSource};
use vectra_state::{ControlStatus, Farm, Herd};

use crate::phase::{DayContext, Phase};

/// What happened on one edge today.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EdgeOutcome {
    /// No shipment was due.
    Idle,
    /// A due shipment was stopped by control.
    Interrupted { risky: bool },
    /// The source had no animals.
    Empty,
    /// A shipment went ahead carrying `infected` infected animals.
    Shipped { infected: u32 },
}

/// Whether control forbids a shipment from `src` to `dst`.
fn interrupted(src: &ControlStatus, dst: &ControlStatus) -> bool {
    src.movement_banned()
        || dst.movement_banned()
        || (src.protection_zone() && !dst.protection_zone())
        || (src.surveillance_zone() && dst.free_area())
}

/// Transfer the infected animals among `size` shipped from `src` to `dst`.
fn ship(src: &mut Herd, dst: &mut Herd, size: u32, rng: &mut dyn RandomSource) -> u32 {
    let total = f64::from(src.total());
    let mut infected = f64::from(src.infected());
    let mut moved = 0;
    for _ in 0..size {
        if !(rng.uniform() < infected / total) {
            continue;
        }
        let selector = rng.uniform() * infected;
        let mut cumulative = 0.0;
        // Strict comparison never picks an empty stage.
        for stage in 0..src.stages() {
            cumulative += f64::from(src.infectious[stage]);
            if cumulative > selector {
                src.infectious[stage] -= 1;
                dst.infectious[stage] += 1;
                infected -= 1.0;
                moved += 1;
                break;
            }
        }
    }
    moved
}

fn transmit(
    src: &mut Farm,
    dst: &mut Farm,
    probability: f64,
    movement: &MovementParams,
    rng: &mut dyn RandomSource,
) -> EdgeOutcome {
    if !(rng.uniform() < probability) {
        return EdgeOutcome::Idle;
    }
    if interrupted(&src.status, &dst.status) {
        return EdgeOutcome::Interrupted {
            risky: src.infected() > 0,
        };
    }

    let sheep = f64::from(src.sheep.total());
    let cattle = f64::from(src.cattle.total());
    if sheep + cattle < 1.0 {
        return EdgeOutcome::Empty;
    }
    let species = if rng.uniform() > sheep / (sheep + cattle) {
        HostSpecies::Cattle
    } else {
        HostSpecies::Sheep
    };

    let (k, p) = movement.shipment(species);
    let available = src.herd(species).total();
    let size = rng.neg_binomial(k, p).saturating_add(1).min(available);
    let infected = ship(src.herd_mut(species), dst.herd_mut(species), size, rng);
    if infected > 0 {
        dst.status.mark_infected_by_movement();
    }
    EdgeOutcome::Shipped { infected }
}

/// Daily movement-network phase.
#[derive(Clone, Copy, Debug, Default)]
pub struct MovementTransmission;

impl Phase for MovementTransmission {
    fn name(&self) -> &str {
        "movement_transmission"
    }

    fn run(&self, ctx: &mut DayContext<'_>) {
        let movement = &ctx.params.movement;
        for i in 0..ctx.state.edges.len() {
            let edge = ctx.state.edges[i];
            let (src, dst) = ctx.state.farm_pair_mut(edge.from, edge.to);
            let outcome = transmit(src, dst, edge.probability, movement, ctx.rng);

            let daily = &mut ctx.state.daily;
            match outcome {
                EdgeOutcome::Idle => {}
                EdgeOutcome::Interrupted { risky } => {
                    daily.movements_attempted += 1;
                    daily.interrupted_movements += 1;
                    if risky {
                        daily.risky_moves_blocked += 1;
                    }
                }
                EdgeOutcome::Empty => daily.movements_attempted += 1,
                EdgeOutcome::Shipped { infected } => {
                    daily.movements_attempted += 1;
                    if infected > 0 {
                        daily.movement_transmissions += 1;
                        daily.infected_animals_moved += infected;
                    }
                }
            }
        }

        let daily = &ctx.state.daily;
        debug!(
            attempted = daily.movements_attempted,
            interrupted = daily.interrupted_movements,
            risky_blocked = daily.risky_moves_blocked,
            transmissions = daily.movement_transmissions,
            infected_moved = daily.infected_animals_moved,
            "movement transmission"
        );
    }
}
