/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! 3x3 matrix whose columns are lattice axes

use super::vector::Vector3D;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// A 3x3 matrix with one lattice axis per column
///
/// `m * (h, k, l)` is the lattice vector `h·a + k·b + l·c`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix3 {
    inner: nalgebra::Matrix3<f64>,
}

impl Matrix3 {
    /// Build a matrix from three column vectors
    pub fn from_columns(a: Vector3D, b: Vector3D, c: Vector3D) -> Self {
        Self {
            inner: nalgebra::Matrix3::from_columns(&[a.into(), b.into(), c.into()]),
        }
    }

    /// Diagonal matrix (orthorhombic cell)
    pub fn diagonal(x: f64, y: f64, z: f64) -> Self {
        Self {
            inner: nalgebra::Matrix3::from_diagonal(&Vector3::new(x, y, z)),
        }
    }

    pub fn identity() -> Self {
        Self {
            inner: nalgebra::Matrix3::identity(),
        }
    }

    /// Column `n` as a vector
    pub fn column(&self, n: usize) -> Vector3D {
        let column = self.inner.column(n);
        Vector3D::new(column[0], column[1], column[2])
    }

    /// Multiply column `n` by `factor` in place
    pub fn column_multiply(&mut self, n: usize, factor: f64) {
        self.inner.column_mut(n).scale_mut(factor);
    }

    /// Lengths of the three column vectors
    pub fn column_lengths(&self) -> Vector3D {
        Vector3D::new(
            self.inner.column(0).norm(),
            self.inner.column(1).norm(),
            self.inner.column(2).norm(),
        )
    }

    /// Determinant, i.e. the signed volume spanned by the columns
    pub fn determinant(&self) -> f64 {
        self.inner.determinant()
    }

    /// Inverse, or `None` for a singular matrix
    pub fn try_inverse(&self) -> Option<Self> {
        self.inner.try_inverse().map(|inner| Self { inner })
    }

    pub fn transpose(&self) -> Self {
        Self {
            inner: self.inner.transpose(),
        }
    }

    /// Every element multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            inner: self.inner * factor,
        }
    }

    /// Project `v` onto each column, giving `(v·a, v·b, v·c)`
    pub fn transpose_multiply(&self, v: &Vector3D) -> Vector3D {
        self.inner.tr_mul(&Vector3::from(*v)).into()
    }

    /// Multiply by an integer triple, e.g. Miller indices
    pub fn multiply_indices(&self, hkl: [i32; 3]) -> Vector3D {
        let hkl = Vector3::new(hkl[0] as f64, hkl[1] as f64, hkl[2] as f64);
        (self.inner * hkl).into()
    }
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul<Vector3D> for Matrix3 {
    type Output = Vector3D;

    fn mul(self, v: Vector3D) -> Vector3D {
        (self.inner * Vector3::from(v)).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_matrix_products() {
        let m = Matrix3::from_columns(
            Vector3D::new(1.0, 0.0, 0.0),
            Vector3D::new(1.0, 2.0, 0.0),
            Vector3D::new(0.0, 1.0, 3.0),
        );

        assert_relative_eq!(m.determinant(), 6.0, epsilon = 1e-12);
        assert_eq!(m.multiply_indices([1, 1, 1]), Vector3D::new(2.0, 3.0, 3.0));
        assert_eq!(m * Vector3D::new(1.0, 1.0, 1.0), Vector3D::new(2.0, 3.0, 3.0));
        assert_eq!(m.column(1), Vector3D::new(1.0, 2.0, 0.0));

        let projected = m.transpose_multiply(&Vector3D::new(1.0, 1.0, 1.0));
        assert_eq!(projected, Vector3D::new(1.0, 3.0, 4.0));
    }

    #[test]
    fn test_column_multiply() {
        let mut m = Matrix3::diagonal(1.0, 2.0, 3.0);
        m.column_multiply(1, 2.0);

        let lengths = m.column_lengths();
        assert_relative_eq!(lengths.x, 1.0);
        assert_relative_eq!(lengths.y, 4.0);
        assert_relative_eq!(lengths.z, 3.0);
    }

    #[test]
    fn test_inverse() {
        let m = Matrix3::from_columns(
            Vector3D::new(2.0, 0.0, 0.0),
            Vector3D::new(1.0, 4.0, 0.0),
            Vector3D::new(0.0, 0.5, 8.0),
        );
        let inverse = m.try_inverse().unwrap();
        let v = Vector3D::new(0.3, -1.2, 2.5);
        let round_trip = inverse * (m * v);

        assert_relative_eq!(round_trip.x, v.x, epsilon = 1e-12);
        assert_relative_eq!(round_trip.y, v.y, epsilon = 1e-12);
        assert_relative_eq!(round_trip.z, v.z, epsilon = 1e-12);
        assert_eq!(m.transpose().column(0), Vector3D::new(2.0, 1.0, 0.0));

        let singular = Matrix3::diagonal(1.0, 0.0, 1.0);
        assert!(singular.try_inverse().is_none());
    }
}
