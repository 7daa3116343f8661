/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Error types for the Bragg module

use thiserror::Error;

/// Result type for Bragg calculations
pub type Result<T> = std::result::Result<T, BraggError>;

/// Bragg-specific errors
#[derive(Error, Debug)]
pub enum BraggError {
    /// The configuration has no periodic box
    #[error("Configuration '{0}' has no simulation box")]
    MissingBox(String),

    /// The configuration contains no (present) atoms
    #[error("Configuration '{0}' contains no atoms")]
    NoAtoms(String),

    /// The configuration has no used atom types
    #[error("Configuration '{0}' has no atom types")]
    NoAtomTypes(String),

    /// Calculation parameters are unusable
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// An atom type index does not fit the intensity matrix
    #[error("Atom type index {index} out of range for {n_types} types")]
    AtomTypeOutOfRange { index: usize, n_types: usize },

    /// A k-vector points at a reflection that does not exist
    #[error("Reflection index {index} out of range for {n_reflections} reflections")]
    ReflectionOutOfRange { index: usize, n_reflections: usize },

    /// Reflection lists cannot be combined
    #[error("Reflection data mismatch: {0}")]
    Mismatch(String),

    /// The supplied Q grid cannot be used for binning
    #[error("Invalid Q grid: {0}")]
    InvalidQGrid(String),

    /// Malformed restart data
    #[error("Failed to read {field}: {reason}")]
    Deserialisation { field: &'static str, reason: String },

    /// Underlying I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure in the data store
    #[error("Data store error: {0}")]
    Store(#[from] crate::store::StoreError),
}
