//! The daily phases of a Vectra simulation.
//!
//! Each phase is a stateless operator over the shared
//! [`SimulationState`](vectra_state::SimulationState). The engine runs them
//! in a fixed order every day:
//!
//! 1. [`ControlMeasures`]: restriction zones and active surveillance
//! 2. [`VectorMortalityIncubation`]: survival and incubation-stage progression
//! 3. [`VectorDiffusion`]: explicit five-point diffusion of every density layer
//! 4. [`MovementTransmission`]: livestock shipments along the movement network
//! 5. [`FarmEpidemics`]: per-farm weather, disease progression, detection,
//!    and vector/host transmission
//!
//! Detection side effects from any phase go through one
//! [`ControlCoordinator`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod control;
pub mod diffusion;
pub mod farm_epi;
pub mod movement;
pub mod phase;
pub mod vector_dynamics;

pub use control::{ControlCoordinator, ControlMeasures};
pub use diffusion::{diffuse_layer, VectorDiffusion};
pub use farm_epi::FarmEpidemics;
pub use movement::MovementTransmission;
pub use phase::{DayContext, Phase};
pub use vector_dynamics::{redistribute_latent, VectorMortalityIncubation};
