/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Typed keyed data store
//!
//! Items are keyed by a `(prefix, name)` pair, where the prefix is usually a
//! configuration name. Every item carries a version that is bumped each time
//! mutable access is handed out, so consumers can tell whether data changed
//! since they last looked.

pub mod errors;

pub use errors::{Result, StoreError};

use std::any::{type_name, Any};
use std::collections::HashMap;

struct StoreItem {
    data: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
    version: u64,
}

impl StoreItem {
    fn new<T: Any + Send + Sync>(data: T) -> Self {
        Self {
            data: Box::new(data),
            type_name: type_name::<T>(),
            version: 0,
        }
    }
}

/// Heterogeneous store of named items
#[derive(Default)]
pub struct GenericDataStore {
    items: HashMap<(String, String), StoreItem>,
}

impl GenericDataStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn key(name: &str, prefix: &str) -> (String, String) {
        (prefix.to_string(), name.to_string())
    }

    /// Fetch an item for modification, creating a default value if absent
    pub fn realise<T>(&mut self, name: &str, prefix: &str) -> Result<&mut T>
    where
        T: Any + Send + Sync + Default,
    {
        let item = self
            .items
            .entry(Self::key(name, prefix))
            .or_insert_with(|| StoreItem::new(T::default()));

        if !item.data.is::<T>() {
            return Err(StoreError::TypeMismatch {
                name: name.to_string(),
                expected: type_name::<T>(),
                found: item.type_name,
            });
        }

        item.version += 1;
        item.data
            .downcast_mut::<T>()
            .ok_or_else(|| StoreError::NotFound {
                name: name.to_string(),
                prefix: prefix.to_string(),
            })
    }

    /// Store `value`, replacing any existing item under the same key
    pub fn set<T: Any + Send + Sync>(&mut self, name: &str, prefix: &str, value: T) {
        let version = self.version(name, prefix).map_or(0, |v| v + 1);
        let mut item = StoreItem::new(value);
        item.version = version;
        self.items.insert(Self::key(name, prefix), item);
    }

    /// Fetch an existing item
    pub fn value<T: Any + Send + Sync>(&self, name: &str, prefix: &str) -> Result<&T> {
        let item = self
            .items
            .get(&Self::key(name, prefix))
            .ok_or_else(|| StoreError::NotFound {
                name: name.to_string(),
                prefix: prefix.to_string(),
            })?;

        item.data
            .downcast_ref::<T>()
            .ok_or_else(|| StoreError::TypeMismatch {
                name: name.to_string(),
                expected: type_name::<T>(),
                found: item.type_name,
            })
    }

    /// Whether an item exists under the key
    pub fn contains(&self, name: &str, prefix: &str) -> bool {
        self.items.contains_key(&Self::key(name, prefix))
    }

    /// Version of the item, if it exists
    pub fn version(&self, name: &str, prefix: &str) -> Option<u64> {
        self.items.get(&Self::key(name, prefix)).map(|item| item.version)
    }

    /// Remove an item, returning whether it existed
    pub fn remove(&mut self, name: &str, prefix: &str) -> bool {
        self.items.remove(&Self::key(name, prefix)).is_some()
    }

    /// Number of stored items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
