/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! One-dimensional tabulated data

use serde::{Deserialize, Serialize};

/// Values tabulated on an ascending abscissa
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Data1D {
    x: Vec<f64>,
    values: Vec<f64>,
}

impl Data1D {
    /// Zero-valued data on the given abscissa
    pub fn new(x: Vec<f64>) -> Self {
        let values = vec![0.0; x.len()];
        Self { x, values }
    }

    /// Zero-valued data on `min + n·delta` for every point not exceeding `max`
    pub fn regular(min: f64, delta: f64, max: f64) -> Self {
        let mut x = Vec::new();
        if delta > 0.0 {
            // Tolerance keeps `max` itself when it sits on a grid point
            let n_points = ((max - min) / delta + 1.0e-9).floor();
            if n_points >= 0.0 {
                x = (0..=n_points as usize).map(|n| min + n as f64 * delta).collect();
            }
        }
        Self::new(x)
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Number of points
    pub fn n_values(&self) -> usize {
        self.values.len()
    }

    /// Add `value` at point `index`, returning false if the index is out of range
    pub fn add_at(&mut self, index: usize, value: f64) -> bool {
        match self.values.get_mut(index) {
            Some(v) => {
                *v += value;
                true
            }
            None => false,
        }
    }

    /// Multiply every value by `factor`
    pub fn scale(&mut self, factor: f64) {
        self.values.iter_mut().for_each(|v| *v *= factor);
    }

    /// Add `factor · other` point by point
    ///
    /// Only the overlapping leading points are touched when lengths differ.
    pub fn add_scaled(&mut self, other: &Data1D, factor: f64) {
        for (v, o) in self.values.iter_mut().zip(other.values.iter()) {
            *v += factor * o;
        }
    }
}
