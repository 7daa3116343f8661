/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Bragg reflections: intensity accumulated over one Q bin

use super::errors::{BraggError, Result};
use super::restart::{next_line, parse_field};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use std::ops::{AddAssign, Mul, MulAssign};

/// Intensity of one Bragg reflection, split by atom type pair
///
/// The intensity matrix is logically symmetric. Only the upper triangle is
/// stored and both `(i, j)` and `(j, i)` address the same element. Unlike
/// pairs are not doubled here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BraggReflection {
    /// Bin-centre Q value (Å⁻¹)
    q: f64,
    /// Dense index after compaction, -1 before
    index: i64,
    /// Per atom type pair intensities
    intensities: Array2<f64>,
    /// Number of k-vectors folded into this reflection
    n_kvectors: usize,
    /// Representative Miller indices
    hkl: [i32; 3],
}

impl Default for BraggReflection {
    fn default() -> Self {
        Self {
            q: 0.0,
            index: -1,
            intensities: Array2::zeros((0, 0)),
            n_kvectors: 0,
            hkl: [0, 0, 0],
        }
    }
}

impl BraggReflection {
    /// Create a reflection at `q` with storage for `n_types` atom types
    pub fn new(q: f64, index: i64, n_types: usize) -> Self {
        let mut reflection = Self::default();
        reflection.initialise(q, index, n_types);
        reflection
    }

    /// (Re)initialise the reflection, zeroing intensities and multiplicity
    pub fn initialise(&mut self, q: f64, index: i64, n_types: usize) {
        self.q = q;
        self.index = index;
        self.intensities = Array2::zeros((n_types, n_types));
        self.n_kvectors = 0;
    }

    /// Bin-centre Q value
    pub fn q(&self) -> f64 {
        self.q
    }

    /// Dense index, or -1 if not yet assigned
    pub fn index(&self) -> i64 {
        self.index
    }

    /// Assign the dense index
    pub fn set_index(&mut self, index: i64) {
        self.index = index;
    }

    /// Number of atom types the intensity matrix covers
    pub fn n_types(&self) -> usize {
        self.intensities.nrows()
    }

    /// Representative Miller indices
    pub fn hkl(&self) -> [i32; 3] {
        self.hkl
    }

    /// Set the representative Miller indices
    pub fn set_hkl(&mut self, hkl: [i32; 3]) {
        self.hkl = hkl;
    }

    /// Number of k-vectors contributing to this reflection
    pub fn n_kvectors(&self) -> usize {
        self.n_kvectors
    }

    /// Note additional contributing k-vectors
    pub fn add_kvectors(&mut self, count: usize) {
        self.n_kvectors += count;
    }

    /// Overwrite the number of contributing k-vectors
    pub fn set_n_kvectors(&mut self, count: usize) {
        self.n_kvectors = count;
    }

    fn element(&self, i: usize, j: usize) -> Result<(usize, usize)> {
        let n_types = self.n_types();
        if i >= n_types || j >= n_types {
            return Err(BraggError::AtomTypeOutOfRange {
                index: i.max(j),
                n_types,
            });
        }
        Ok((i.min(j), i.max(j)))
    }

    /// Add `value` to the intensity of the pair `(i, j)`
    pub fn add_intensity(&mut self, i: usize, j: usize, value: f64) -> Result<()> {
        let element = self.element(i, j)?;
        self.intensities[element] += value;
        Ok(())
    }

    /// Intensity of the pair `(i, j)`
    ///
    /// # Panics
    ///
    /// Panics if either index is not below [`Self::n_types`].
    pub fn intensity(&self, i: usize, j: usize) -> f64 {
        self.intensities[[i.min(j), i.max(j)]]
    }

    /// Intensity of the pair `(i, j)`, or `None` if either index is out of range
    pub fn get_intensity(&self, i: usize, j: usize) -> Option<f64> {
        self.element(i, j).ok().map(|element| self.intensities[element])
    }

    /// Raw intensity storage (upper triangle populated)
    pub fn intensities(&self) -> &Array2<f64> {
        &self.intensities
    }

    /// Zero intensities and multiplicity, keeping Q, index and hkl
    pub fn reset(&mut self) {
        self.intensities.fill(0.0);
        self.n_kvectors = 0;
    }

    /// Multiply every intensity by `factor`
    pub fn scale_intensities(&mut self, factor: f64) {
        self.intensities *= factor;
    }

    /// Multiply the intensity of one pair by `factor`
    pub fn scale_intensity(&mut self, i: usize, j: usize, factor: f64) -> Result<()> {
        let element = self.element(i, j)?;
        self.intensities[element] *= factor;
        Ok(())
    }

    /// Write the reflection in restart format
    pub fn serialise<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(
            writer,
            "{} {:e} {} {} {} {}",
            self.index, self.q, self.n_kvectors, self.hkl[0], self.hkl[1], self.hkl[2]
        )?;

        let n_types = self.n_types();
        writeln!(writer, "{}", n_types)?;
        for i in 0..n_types {
            let row: Vec<String> = (i..n_types)
                .map(|j| format!("{:e}", self.intensities[[i, j]]))
                .collect();
            writeln!(writer, "{}", row.join(" "))?;
        }

        Ok(())
    }

    /// Read a reflection written by [`Self::serialise`]
    pub fn deserialise<R: BufRead>(reader: &mut R) -> Result<Self> {
        let header = next_line(reader, "reflection header")?;
        let mut tokens = header.split_whitespace();
        let index: i64 = parse_field(tokens.next(), "reflection index")?;
        let q: f64 = parse_field(tokens.next(), "reflection q")?;
        let n_kvectors: usize = parse_field(tokens.next(), "reflection multiplicity")?;
        let h: i32 = parse_field(tokens.next(), "reflection h")?;
        let k: i32 = parse_field(tokens.next(), "reflection k")?;
        let l: i32 = parse_field(tokens.next(), "reflection l")?;

        let size_line = next_line(reader, "intensity matrix size")?;
        let n_types: usize = parse_field(size_line.split_whitespace().next(), "intensity matrix size")?;

        // Rows are read before allocating so the declared size cannot outrun the input
        let mut rows = Vec::new();
        for i in 0..n_types {
            let row = next_line(reader, "intensity matrix row")?;
            let values = row
                .split_whitespace()
                .map(|token| parse_field(Some(token), "intensity value"))
                .collect::<Result<Vec<f64>>>()?;
            if values.len() != n_types - i {
                return Err(BraggError::Deserialisation {
                    field: "intensity matrix row",
                    reason: format!("row {} has {} values, expected {}", i, values.len(), n_types - i),
                });
            }
            rows.push(values);
        }

        let mut reflection = Self::new(q, index, n_types);
        reflection.n_kvectors = n_kvectors;
        reflection.hkl = [h, k, l];
        for (i, row) in rows.into_iter().enumerate() {
            for (offset, value) in row.into_iter().enumerate() {
                reflection.intensities[[i, i + offset]] = value;
            }
        }

        Ok(reflection)
    }
}

impl AddAssign<&BraggReflection> for BraggReflection {
    /// Sum intensities and multiplicities
    ///
    /// An uninitialised left-hand side adopts the right-hand data directly.
    fn add_assign(&mut self, other: &BraggReflection) {
        if self.intensities.is_empty() {
            self.q = other.q;
            self.index = other.index;
            self.hkl = other.hkl;
            self.intensities = other.intensities.clone();
        } else {
            self.intensities += &other.intensities;
        }
        self.n_kvectors += other.n_kvectors;
    }
}

impl MulAssign<f64> for BraggReflection {
    fn mul_assign(&mut self, factor: f64) {
        self.scale_intensities(factor);
    }
}

impl Mul<f64> for &BraggReflection {
    type Output = BraggReflection;

    fn mul(self, factor: f64) -> BraggReflection {
        let mut result = self.clone();
        result *= factor;
        result
    }
}
