/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Per-atom trigonometric phase tables
//!
//! For every atom and reciprocal axis `a`, the tables hold `cos(m θ)` and
//! `sin(m θ)` for all integer multiples `m` up to the largest Miller index
//! along that axis, where `θ = r · b_a`. Multiples are generated from the
//! first one with the angle-addition recurrence
//!
//! ```text
//! cos(mθ) = cos θ cos((m-1)θ) - sin θ sin((m-1)θ)
//! sin(mθ) = cos θ sin((m-1)θ) + sin θ cos((m-1)θ)
//! ```
//!
//! so each atom costs one `sin_cos` per axis regardless of the lattice extent.

use super::errors::{BraggError, Result};
use crate::geometry::{Matrix3, Vector3D};
use ndarray::{Array2, ArrayView1, Zip};
use num_complex::Complex64;

/// Cosine/sine table for one reciprocal axis
///
/// Cosines are stored for `0..=max_index` (cosine is even); sines for
/// `-max_index..=max_index` at storage offset `m + max_index`.
#[derive(Debug, Clone, Default)]
pub struct AxisPhaseTable {
    max_index: usize,
    cos: Array2<f64>,
    sin: Array2<f64>,
}

impl AxisPhaseTable {
    fn new(n_atoms: usize, max_index: usize) -> Self {
        Self {
            max_index,
            cos: Array2::zeros((n_atoms, max_index + 1)),
            sin: Array2::zeros((n_atoms, 2 * max_index + 1)),
        }
    }

    /// Largest multiple held
    pub fn max_index(&self) -> usize {
        self.max_index
    }

    #[inline]
    fn sin_offset(&self, multiple: i32) -> usize {
        debug_assert!(
            multiple.unsigned_abs() as usize <= self.max_index,
            "multiple {} outside table of extent {}",
            multiple,
            self.max_index
        );
        (multiple + self.max_index as i32) as usize
    }

    /// `cos(m θ)` for an atom
    #[inline]
    pub fn cos(&self, atom: usize, multiple: i32) -> f64 {
        self.cos[[atom, multiple.unsigned_abs() as usize]]
    }

    /// `sin(m θ)` for an atom
    #[inline]
    pub fn sin(&self, atom: usize, multiple: i32) -> f64 {
        self.sin[[atom, self.sin_offset(multiple)]]
    }

    /// `exp(i m θ)` for an atom
    #[inline]
    pub fn phase(&self, atom: usize, multiple: i32) -> Complex64 {
        Complex64::new(self.cos(atom, multiple), self.sin(atom, multiple))
    }

    /// Fill the table from one angle per atom, in parallel over atoms
    fn fill(&mut self, angles: ArrayView1<f64>) {
        let max_index = self.max_index;
        Zip::from(self.cos.rows_mut())
            .and(self.sin.rows_mut())
            .and(angles)
            .par_for_each(|mut cos, mut sin, &theta| {
                // sin row is offset so that multiple zero sits at max_index
                cos[0] = 1.0;
                sin[max_index] = 0.0;
                if max_index == 0 {
                    return;
                }

                let (sin1, cos1) = theta.sin_cos();
                cos[1] = cos1;
                sin[max_index + 1] = sin1;
                sin[max_index - 1] = -sin1;

                for m in 2..=max_index {
                    let previous_cos = cos[m - 1];
                    let previous_sin = sin[max_index + m - 1];
                    cos[m] = cos1 * previous_cos - sin1 * previous_sin;
                    sin[max_index + m] = cos1 * previous_sin + sin1 * previous_cos;
                    sin[max_index - m] = -sin[max_index + m];
                }
            });
    }
}

/// Phase tables for all atoms along the three reciprocal axes
#[derive(Debug, Clone, Default)]
pub struct PhaseTables {
    n_atoms: usize,
    axes: [AxisPhaseTable; 3],
}

impl PhaseTables {
    /// Allocate tables for `n_atoms` atoms and the given maximum Miller indices
    pub fn new(n_atoms: usize, max_hkl: [usize; 3]) -> Self {
        Self {
            n_atoms,
            axes: [
                AxisPhaseTable::new(n_atoms, max_hkl[0]),
                AxisPhaseTable::new(n_atoms, max_hkl[1]),
                AxisPhaseTable::new(n_atoms, max_hkl[2]),
            ],
        }
    }

    /// Number of atoms covered
    pub fn n_atoms(&self) -> usize {
        self.n_atoms
    }

    /// Maximum Miller index per axis
    pub fn max_hkl(&self) -> [usize; 3] {
        [
            self.axes[0].max_index,
            self.axes[1].max_index,
            self.axes[2].max_index,
        ]
    }

    /// Table for one axis (0 = h, 1 = k, 2 = l)
    pub fn axis(&self, axis: usize) -> &AxisPhaseTable {
        &self.axes[axis]
    }

    /// Recalculate every table from atomic positions
    ///
    /// `reciprocal_axes` are the (multiplicity-scaled) reciprocal axes, so
    /// the angle for axis `a` is the projection of the position onto `b_a`.
    pub fn calculate(&mut self, positions: &[Vector3D], reciprocal_axes: &Matrix3) -> Result<()> {
        if positions.len() != self.n_atoms {
            return Err(BraggError::Mismatch(format!(
                "phase tables hold {} atoms but {} positions were supplied",
                self.n_atoms,
                positions.len()
            )));
        }

        let angles = Array2::from_shape_fn((self.n_atoms, 3), |(n, axis)| {
            reciprocal_axes.column(axis).dot(&positions[n])
        });

        for (axis, table) in self.axes.iter_mut().enumerate() {
            table.fill(angles.column(axis));
        }

        Ok(())
    }

    /// Complex phase `exp(i G·r)` of an atom at the lattice point `hkl`
    ///
    /// Formed as `(e_h ⊗ e_k) ⊗ e_l` from the three axis tables.
    #[inline]
    pub fn phase(&self, atom: usize, hkl: [i32; 3]) -> Complex64 {
        let hk = self.axes[0].phase(atom, hkl[0]) * self.axes[1].phase(atom, hkl[1]);
        hk * self.axes[2].phase(atom, hkl[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_recurrence_matches_direct_evaluation() {
        let reciprocal_axes = Matrix3::diagonal(0.7, 1.1, 0.3);
        let positions = vec![
            Vector3D::new(0.0, 0.0, 0.0),
            Vector3D::new(1.3, -2.2, 4.9),
            Vector3D::new(-7.1, 3.3, 0.25),
        ];
        let mut tables = PhaseTables::new(positions.len(), [6, 4, 9]);
        tables.calculate(&positions, &reciprocal_axes).unwrap();

        for (n, position) in positions.iter().enumerate() {
            let theta = reciprocal_axes.transpose_multiply(position);
            for axis in 0..3 {
                let table = tables.axis(axis);
                let max = table.max_index() as i32;
                for m in -max..=max {
                    let angle = m as f64 * theta[axis];
                    assert_relative_eq!(table.cos(n, m), angle.cos(), epsilon = 1e-10);
                    assert_relative_eq!(table.sin(n, m), angle.sin(), epsilon = 1e-10);
                }
            }
        }
    }

    #[test]
    fn test_phase_product() {
        let reciprocal_axes = Matrix3::diagonal(0.5, 0.5, 0.5);
        let position = Vector3D::new(0.4, 1.7, -0.9);
        let mut tables = PhaseTables::new(1, [3, 3, 3]);
        tables.calculate(&[position], &reciprocal_axes).unwrap();

        let hkl = [2, -3, 1];
        let g = reciprocal_axes.multiply_indices(hkl);
        let expected = Complex64::from_polar(1.0, g.dot(&position));
        let phase = tables.phase(0, hkl);

        assert_relative_eq!(phase.re, expected.re, epsilon = 1e-12);
        assert_relative_eq!(phase.im, expected.im, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_extent_axis() {
        let mut tables = PhaseTables::new(1, [0, 2, 0]);
        tables
            .calculate(&[Vector3D::new(1.0, 1.0, 1.0)], &Matrix3::identity())
            .unwrap();
        assert_eq!(tables.axis(0).cos(0, 0), 1.0);
        assert_eq!(tables.axis(0).sin(0, 0), 0.0);
        assert_eq!(tables.max_hkl(), [0, 2, 0]);
    }

    #[test]
    fn test_position_count_mismatch() {
        let mut tables = PhaseTables::new(2, [1, 1, 1]);
        assert!(tables.calculate(&[Vector3D::zero()], &Matrix3::identity()).is_err());
    }
}
