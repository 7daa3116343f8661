/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Periodic atomic configurations
//!
//! A [`Configuration`] is the collaborator the Bragg engine reads from: a
//! periodic box, atom positions with their local atom type indices, the
//! population of each used atom type, and a structural version that is bumped
//! on every change so that derived data can be cached against it.

pub mod builder;
pub mod errors;
pub mod simulation_box;

pub use builder::{ConfigurationBuilder, LatticeType};
pub use errors::{ConfigurationError, Result};
pub use simulation_box::SimulationBox;

use crate::geometry::Vector3D;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A single atom in a configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// Cartesian position (Å)
    pub position: Vector3D,
    /// Index into the configuration's used atom types
    pub local_type_index: usize,
    /// Whether the atom is physically present
    pub present: bool,
}

/// Population data for one atom type used in a configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomTypeData {
    /// Atom type name, e.g. "Na"
    pub name: String,
    /// Number of atoms of this type
    pub population: usize,
}

/// A periodic atomic configuration
///
/// Every instance carries a process-unique id; a clone is a new
/// configuration and gets a fresh one.
#[derive(Debug)]
pub struct Configuration {
    id: u64,
    name: String,
    simulation_box: Option<SimulationBox>,
    atoms: Vec<Atom>,
    atom_types: Vec<AtomTypeData>,
    contents_version: u64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            id: next_id(),
            name: String::new(),
            simulation_box: None,
            atoms: Vec::new(),
            atom_types: Vec::new(),
            contents_version: 0,
        }
    }
}

impl Clone for Configuration {
    fn clone(&self) -> Self {
        Self {
            id: next_id(),
            name: self.name.clone(),
            simulation_box: self.simulation_box.clone(),
            atoms: self.atoms.clone(),
            atom_types: self.atom_types.clone(),
            contents_version: self.contents_version,
        }
    }
}

impl Configuration {
    /// Create an empty configuration with no box
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Identity of this configuration instance
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Configuration name, used as the data store prefix
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Structural version, incremented on every modification
    pub fn contents_version(&self) -> u64 {
        self.contents_version
    }

    /// Explicitly bump the structural version
    pub fn increment_contents_version(&mut self) {
        self.contents_version += 1;
    }

    /// The periodic box, if one has been set
    pub fn simulation_box(&self) -> Option<&SimulationBox> {
        self.simulation_box.as_ref()
    }

    /// Set (or replace) the periodic box
    pub fn set_box(&mut self, simulation_box: SimulationBox) {
        self.simulation_box = Some(simulation_box);
        self.increment_contents_version();
    }

    /// Register an atom type, returning its local index
    ///
    /// Registering a name twice returns the existing index.
    pub fn add_atom_type(&mut self, name: &str) -> usize {
        if let Some(index) = self.atom_types.iter().position(|t| t.name == name) {
            return index;
        }
        self.atom_types.push(AtomTypeData {
            name: name.to_string(),
            population: 0,
        });
        self.atom_types.len() - 1
    }

    /// Add an atom of the given local type at `position`
    pub fn add_atom(&mut self, local_type_index: usize, position: Vector3D) -> Result<usize> {
        let n_types = self.atom_types.len();
        let atom_type = self.atom_types.get_mut(local_type_index).ok_or(
            ConfigurationError::AtomTypeOutOfRange {
                index: local_type_index,
                n_types,
            },
        )?;
        atom_type.population += 1;

        self.atoms.push(Atom {
            position,
            local_type_index,
            present: true,
        });
        self.increment_contents_version();
        Ok(self.atoms.len() - 1)
    }

    /// Move an atom to a new position
    pub fn set_atom_position(&mut self, index: usize, position: Vector3D) -> Result<()> {
        self.atom_mut(index)?.position = position;
        self.increment_contents_version();
        Ok(())
    }

    /// Displace an atom by `delta`
    pub fn translate_atom(&mut self, index: usize, delta: Vector3D) -> Result<()> {
        self.atom_mut(index)?.position += delta;
        self.increment_contents_version();
        Ok(())
    }

    /// Flag an atom as present or absent
    pub fn set_atom_present(&mut self, index: usize, present: bool) -> Result<()> {
        self.atom_mut(index)?.present = present;
        self.increment_contents_version();
        Ok(())
    }

    fn atom_mut(&mut self, index: usize) -> Result<&mut Atom> {
        let n_atoms = self.atoms.len();
        self.atoms
            .get_mut(index)
            .ok_or(ConfigurationError::AtomOutOfRange { index, n_atoms })
    }

    /// All atoms
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Total number of atoms
    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// Number of atoms flagged as present
    pub fn n_present_atoms(&self) -> usize {
        self.atoms.iter().filter(|atom| atom.present).count()
    }

    /// Used atom types and their populations
    pub fn atom_types(&self) -> &[AtomTypeData] {
        &self.atom_types
    }

    /// Number of used atom types
    pub fn n_atom_types(&self) -> usize {
        self.atom_types.len()
    }

    /// Fraction of all atoms belonging to the type at `index`
    pub fn atom_type_fraction(&self, index: usize) -> f64 {
        match (self.atom_types.get(index), self.atoms.len()) {
            (Some(atom_type), n) if n > 0 => atom_type.population as f64 / n as f64,
            _ => 0.0,
        }
    }
}
