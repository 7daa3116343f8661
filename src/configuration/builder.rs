/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Generation of simple crystalline configurations

use super::errors::{ConfigurationError, Result};
use super::simulation_box::SimulationBox;
use super::Configuration;
use crate::geometry::Vector3D;
use std::fmt;
use std::str::FromStr;

/// Cubic Bravais lattice types supported by the builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatticeType {
    /// Simple cubic, one atom per cell
    SimpleCubic,
    /// Body-centred cubic, two atoms per cell
    BodyCentred,
    /// Face-centred cubic, four atoms per cell
    FaceCentred,
}

impl LatticeType {
    /// Fractional basis positions within one unit cell
    pub fn basis(&self) -> &'static [[f64; 3]] {
        match self {
            LatticeType::SimpleCubic => &[[0.0, 0.0, 0.0]],
            LatticeType::BodyCentred => &[[0.0, 0.0, 0.0], [0.5, 0.5, 0.5]],
            LatticeType::FaceCentred => &[
                [0.0, 0.0, 0.0],
                [0.5, 0.5, 0.0],
                [0.5, 0.0, 0.5],
                [0.0, 0.5, 0.5],
            ],
        }
    }
}

impl fmt::Display for LatticeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LatticeType::SimpleCubic => "sc",
            LatticeType::BodyCentred => "bcc",
            LatticeType::FaceCentred => "fcc",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for LatticeType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sc" | "simple" => Ok(LatticeType::SimpleCubic),
            "bcc" => Ok(LatticeType::BodyCentred),
            "fcc" => Ok(LatticeType::FaceCentred),
            _ => Err(ConfigurationError::InvalidCrystal(format!(
                "unknown lattice type '{}'",
                s
            ))),
        }
    }
}

/// Builder for `n × n × n` supercells of a cubic lattice
///
/// With two species enabled, the second type occupies every odd basis site
/// (bcc → CsCl, fcc → Cu3Au). For simple cubic the species alternate with the
/// parity of the cell indices.
#[derive(Debug, Clone)]
pub struct ConfigurationBuilder {
    name: String,
    lattice: LatticeType,
    cell_length: f64,
    repeats: [usize; 3],
    species: Vec<String>,
}

impl ConfigurationBuilder {
    /// Start a builder for a configuration with the given name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            lattice: LatticeType::SimpleCubic,
            cell_length: 1.0,
            repeats: [1, 1, 1],
            species: vec!["A".to_string()],
        }
    }

    /// Set the lattice type
    pub fn lattice(mut self, lattice: LatticeType) -> Self {
        self.lattice = lattice;
        self
    }

    /// Set the unit cell length (Å)
    pub fn cell_length(mut self, length: f64) -> Self {
        self.cell_length = length;
        self
    }

    /// Set the number of unit cells along each axis
    pub fn repeats(mut self, repeats: [usize; 3]) -> Self {
        self.repeats = repeats;
        self
    }

    /// Use one or two named species
    pub fn species(mut self, names: &[&str]) -> Self {
        self.species = names.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Generate the configuration
    pub fn build(self) -> Result<Configuration> {
        if self.species.is_empty() || self.species.len() > 2 {
            return Err(ConfigurationError::InvalidCrystal(format!(
                "one or two species are supported, got {}",
                self.species.len()
            )));
        }
        if self.repeats.contains(&0) {
            return Err(ConfigurationError::InvalidCrystal(
                "repeats must be at least one along every axis".to_string(),
            ));
        }

        let [nx, ny, nz] = self.repeats;
        let a = self.cell_length;
        let mut cfg = Configuration::new(&self.name);
        cfg.set_box(SimulationBox::orthorhombic(
            a * nx as f64,
            a * ny as f64,
            a * nz as f64,
        )?);

        let types: Vec<usize> = self.species.iter().map(|s| cfg.add_atom_type(s)).collect();
        let basis = self.lattice.basis();

        for i in 0..nx {
            for j in 0..ny {
                for k in 0..nz {
                    for (b, site) in basis.iter().enumerate() {
                        let species = match (types.len(), self.lattice) {
                            (1, _) => 0,
                            (_, LatticeType::SimpleCubic) => (i + j + k) % 2,
                            _ => b % 2,
                        };
                        let position = Vector3D::new(
                            (i as f64 + site[0]) * a,
                            (j as f64 + site[1]) * a,
                            (k as f64 + site[2]) * a,
                        );
                        cfg.add_atom(types[species], position)?;
                    }
                }
            }
        }

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fcc_atom_count() {
        let cfg = ConfigurationBuilder::new("fcc")
            .lattice(LatticeType::FaceCentred)
            .cell_length(4.0)
            .repeats([2, 2, 2])
            .build()
            .unwrap();

        assert_eq!(cfg.n_atoms(), 32);
        assert_eq!(cfg.n_atom_types(), 1);
        assert!((cfg.simulation_box().unwrap().volume() - 512.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_species_bcc() {
        let cfg = ConfigurationBuilder::new("cscl")
            .lattice(LatticeType::BodyCentred)
            .cell_length(4.1)
            .repeats([3, 3, 3])
            .species(&["Cs", "Cl"])
            .build()
            .unwrap();

        assert_eq!(cfg.atom_types()[0].population, 27);
        assert_eq!(cfg.atom_types()[1].population, 27);
    }

    #[test]
    fn test_invalid_builder_input() {
        assert!(ConfigurationBuilder::new("x").repeats([0, 1, 1]).build().is_err());
        assert!(ConfigurationBuilder::new("x")
            .species(&["A", "B", "C"])
            .build()
            .is_err());
        assert!("hcp".parse::<LatticeType>().is_err());
        assert_eq!("FCC".parse::<LatticeType>().unwrap(), LatticeType::FaceCentred);
    }
}
