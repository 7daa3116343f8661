/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Bragg reflection engine
//!
//! Calculates Bragg intensities of a periodic configuration from the
//! reciprocal lattice of its box. The lattice points inside a Q range are
//! enumerated over the half-sphere `h >= 0` and grouped into reflections by
//! Q bin. Per-type structure factor components are accumulated for every
//! point using per-atom phase tables and folded into a per-reflection
//! matrix of type-pair intensities.
//!
//! The enumeration and phase tables live in a [`ReciprocalCache`], which is
//! reused until the configuration or the parameters change.
//!
//! ```no_run
//! use bragg_rs::bragg::{BraggCalculator, BraggParameters};
//! use bragg_rs::configuration::{ConfigurationBuilder, LatticeType};
//!
//! let cfg = ConfigurationBuilder::new("nacl")
//!     .lattice(LatticeType::FaceCentred)
//!     .cell_length(5.64)
//!     .repeats([4, 4, 4])
//!     .species(&["Na", "Cl"])
//!     .build()?;
//!
//! let mut calculator = BraggCalculator::new(BraggParameters::default())?;
//! calculator.calculate(&cfg)?;
//! for reflection in calculator.reflections() {
//!     println!("{} {}", reflection.q(), reflection.intensity(0, 1));
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod accumulate;
pub mod averaging;
pub mod calculator;
pub mod enumerate;
pub mod errors;
pub mod finalise;
pub mod kvector;
pub mod partials;
pub mod phase;
pub mod reflection;
pub mod restart;

pub use averaging::average_reflections;
pub use calculator::{
    calculate_bragg_terms, calculate_bragg_terms_in_store, BraggCalculator, BraggParameters,
    BraggStatus, ReciprocalCache, CACHE_ITEM, REFLECTIONS_ITEM,
};
pub use enumerate::{enumerate_kvectors, scaled_reciprocal_axes, LatticeEnumeration};
pub use errors::{BraggError, Result};
pub use kvector::KVector;
pub use partials::{form_reflection_functions, rebin_reflections, QGrid, ReflectionFunctions};
pub use phase::PhaseTables;
pub use reflection::BraggReflection;
pub use restart::{load_reflections, read_reflections, save_reflections, write_reflections};
