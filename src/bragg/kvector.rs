/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Reciprocal lattice vectors and their per-type structure factor sums

use super::errors::{BraggError, Result};
use super::reflection::BraggReflection;

/// One reciprocal lattice point `(h, k, l)`
///
/// Holds the cosine and sine parts of the structure factor, summed separately
/// for each atom type, and the index of the reflection it contributes to.
/// Lattices are enumerated over the half-sphere `h >= 0` only.
#[derive(Debug, Clone, PartialEq)]
pub struct KVector {
    hkl: [i32; 3],
    reflection_index: usize,
    cos_terms: Vec<f64>,
    sin_terms: Vec<f64>,
}

impl KVector {
    /// Create a k-vector with zeroed sums for `n_types` atom types
    pub fn new(h: i32, k: i32, l: i32, reflection_index: usize, n_types: usize) -> Self {
        Self {
            hkl: [h, k, l],
            reflection_index,
            cos_terms: vec![0.0; n_types],
            sin_terms: vec![0.0; n_types],
        }
    }

    /// Miller indices
    pub fn hkl(&self) -> [i32; 3] {
        self.hkl
    }

    /// The h index
    pub fn h(&self) -> i32 {
        self.hkl[0]
    }

    /// The k index
    pub fn k(&self) -> i32 {
        self.hkl[1]
    }

    /// The l index
    pub fn l(&self) -> i32 {
        self.hkl[2]
    }

    /// Index of the reflection this vector contributes to
    pub fn reflection_index(&self) -> usize {
        self.reflection_index
    }

    /// Re-point the vector at a different reflection
    pub fn set_reflection_index(&mut self, index: usize) {
        self.reflection_index = index;
    }

    /// Number of atom types tracked
    pub fn n_types(&self) -> usize {
        self.cos_terms.len()
    }

    /// Per-type cosine sums
    pub fn cos_terms(&self) -> &[f64] {
        &self.cos_terms
    }

    /// Per-type sine sums
    pub fn sin_terms(&self) -> &[f64] {
        &self.sin_terms
    }

    /// Zero both sums ahead of a new accumulation
    pub fn zero_cos_sin_terms(&mut self) {
        self.cos_terms.fill(0.0);
        self.sin_terms.fill(0.0);
    }

    /// Add to the cosine sum of an atom type
    pub fn add_cos_term(&mut self, atom_type: usize, value: f64) {
        self.cos_terms[atom_type] += value;
    }

    /// Add to the sine sum of an atom type
    pub fn add_sin_term(&mut self, atom_type: usize, value: f64) {
        self.sin_terms[atom_type] += value;
    }

    /// Weight for half-sphere folding
    ///
    /// A vector with `h > 0` stands for itself and its `-h` mirror, which is
    /// never enumerated. Vectors with `h == 0` are enumerated on both sides.
    pub fn half_sphere_norm(&self) -> f64 {
        if self.hkl[0] == 0 {
            1.0
        } else {
            2.0
        }
    }

    /// Intensity of this vector alone for the pair `(i, j)`
    pub fn intensity(&self, i: usize, j: usize) -> f64 {
        (self.cos_terms[i] * self.cos_terms[j] + self.sin_terms[i] * self.sin_terms[j])
            * self.half_sphere_norm()
    }

    /// Fold this vector into `reflection`
    ///
    /// Every pair `i <= j` receives its intensity once; unlike pairs are not
    /// doubled.
    pub fn add_intensities_into(&self, reflection: &mut BraggReflection) -> Result<()> {
        let n_types = self.n_types();
        if reflection.n_types() < n_types {
            return Err(BraggError::AtomTypeOutOfRange {
                index: n_types - 1,
                n_types: reflection.n_types(),
            });
        }

        let norm = self.half_sphere_norm();
        reflection.add_kvectors(norm as usize);
        for i in 0..n_types {
            for j in i..n_types {
                let value = (self.cos_terms[i] * self.cos_terms[j]
                    + self.sin_terms[i] * self.sin_terms[j])
                    * norm;
                reflection.add_intensity(i, j, value)?;
            }
        }
        Ok(())
    }

    /// Fold this vector into its reflection within `reflections`
    pub fn calculate_intensities(&self, reflections: &mut [BraggReflection]) -> Result<()> {
        let n_reflections = reflections.len();
        let reflection = reflections.get_mut(self.reflection_index).ok_or(
            BraggError::ReflectionOutOfRange {
                index: self.reflection_index,
                n_reflections,
            },
        )?;
        self.add_intensities_into(reflection)
    }
}
