/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Error types for the data store

use thiserror::Error;

/// Errors raised when accessing items in a [`super::GenericDataStore`]
#[derive(Error, Debug)]
pub enum StoreError {
    /// No item exists under the requested key
    #[error("Item '{name}' not found (prefix '{prefix}')")]
    NotFound { name: String, prefix: String },

    /// An item exists but holds a different type
    #[error("Item '{name}' holds {found}, requested as {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
