/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! # bragg-rs
//!
//! Bragg reflection intensities of periodic atomic configurations.
//!
//! The [`bragg`] module enumerates the reciprocal lattice of a configuration's
//! box within a Q range, accumulates per-type structure factors over the
//! atoms, and gathers the resulting pair intensities into Bragg reflections
//! that can be cached, written to restart files and binned onto Q grids.

pub mod bragg;
pub mod cli;
pub mod configuration;
pub mod geometry;
pub mod store;
pub mod utils;

pub use bragg::{BraggCalculator, BraggError, BraggParameters, BraggReflection, BraggStatus};
pub use configuration::{Configuration, ConfigurationBuilder, LatticeType, SimulationBox};
pub use geometry::{Matrix3, Vector3D};
pub use store::GenericDataStore;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_information() {
        assert!(!VERSION.is_empty());
        assert!(AUTHORS.contains("Ameyanagi"));
    }
}
