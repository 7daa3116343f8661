/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Error types for the configuration module

/// Error types for the configuration module
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid simulation box: {0}")]
    InvalidBox(String),

    #[error("Atom type index {index} out of range (configuration has {n_types} types)")]
    AtomTypeOutOfRange { index: usize, n_types: usize },

    #[error("Atom index {index} out of range (configuration has {n_atoms} atoms)")]
    AtomOutOfRange { index: usize, n_atoms: usize },

    #[error("Invalid crystal definition: {0}")]
    InvalidCrystal(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigurationError>;
