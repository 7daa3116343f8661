/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Periodic simulation box and its reciprocal lattice

use super::errors::{ConfigurationError, Result};
use crate::geometry::{Matrix3, Vector3D};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Periodic box defined by three real-space axes (Å)
///
/// The reciprocal axes include the factor of 2π, so `b_i · a_j = 2π δ_ij`
/// and a reciprocal lattice vector's magnitude is directly a Q value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationBox {
    axes: Matrix3,
    reciprocal_axes: Matrix3,
    volume: f64,
}

impl SimulationBox {
    /// Create a box from a cell matrix whose columns are the axes
    pub fn new(axes: Matrix3) -> Result<Self> {
        let determinant = axes.determinant();
        if determinant.abs() < 1e-12 {
            return Err(ConfigurationError::InvalidBox(format!(
                "axes are degenerate (determinant {:e})",
                determinant
            )));
        }

        // Columns of 2π (A⁻¹)ᵀ satisfy b_i · a_j = 2π δ_ij
        let reciprocal_axes = axes
            .try_inverse()
            .ok_or_else(|| ConfigurationError::InvalidBox("axes are not invertible".to_string()))?
            .transpose()
            .scaled(2.0 * PI);

        Ok(Self {
            axes,
            reciprocal_axes,
            volume: determinant.abs(),
        })
    }

    /// Orthorhombic box with the given side lengths
    pub fn orthorhombic(x: f64, y: f64, z: f64) -> Result<Self> {
        if x <= 0.0 || y <= 0.0 || z <= 0.0 {
            return Err(ConfigurationError::InvalidBox(format!(
                "side lengths must be positive, got {} x {} x {}",
                x, y, z
            )));
        }
        Self::new(Matrix3::diagonal(x, y, z))
    }

    /// Cubic box with side length `a`
    pub fn cubic(a: f64) -> Result<Self> {
        Self::orthorhombic(a, a, a)
    }

    /// Real-space axes (columns)
    pub fn axes(&self) -> &Matrix3 {
        &self.axes
    }

    /// Reciprocal axes (columns, including 2π)
    pub fn reciprocal_axes(&self) -> &Matrix3 {
        &self.reciprocal_axes
    }

    /// Lengths of the reciprocal axes (Å⁻¹)
    pub fn reciprocal_axis_lengths(&self) -> Vector3D {
        self.reciprocal_axes.column_lengths()
    }

    /// Box volume (Å³)
    pub fn volume(&self) -> f64 {
        self.volume
    }
}
