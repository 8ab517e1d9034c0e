//! Spatial storage for Vectra simulations.
//!
//! This crate defines the regular-grid geometry every spatial layer is
//! resolved against, along with the dense fields stored on it.
//!
//! # Layers
//!
//! - [`GridGeometry`]: origin, cell width and extent; maps points to cells
//! - [`ScalarField`] / [`StagedField`]: one value (or one value per
//!   incubation stage) per cell
//! - [`DailyField`]: one value per cell per simulated day (weather)
//! - [`VectorGrids`]: the vector-density bundle mutated every day
//! - [`WeatherGrids`]: read-only temperature, rainfall and autocorrelation

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod geometry;
pub mod vector;
pub mod weather;

pub use error::SpaceError;
pub use field::{ScalarField, StagedField};
pub use geometry::GridGeometry;
pub use vector::VectorGrids;
pub use weather::{DailyField, WeatherGrids};
