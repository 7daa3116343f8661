/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Reflection intensities gathered onto Q grids

use super::errors::{BraggError, Result};
use super::reflection::BraggReflection;
use crate::configuration::AtomTypeData;
use crate::utils::Data1D;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Regular Q grid with points at `min + n·delta` not exceeding `max`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QGrid {
    pub min: f64,
    pub delta: f64,
    pub max: f64,
}

impl QGrid {
    pub fn new(min: f64, delta: f64, max: f64) -> Self {
        Self { min, delta, max }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.delta.is_finite() && self.delta > 0.0) {
            return Err(BraggError::InvalidQGrid(format!(
                "grid spacing must be positive, got {}",
                self.delta
            )));
        }
        if !(self.min.is_finite() && self.max.is_finite() && self.max >= self.min) {
            return Err(BraggError::InvalidQGrid(format!(
                "grid range {} to {} is not ascending",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Q values of the grid points
    pub fn points(&self) -> Vec<f64> {
        Data1D::regular(self.min, self.delta, self.max).x().to_vec()
    }

    /// Point whose bin `[q_n, q_n + delta)` contains `q`
    fn bin(&self, q: f64, n_points: usize) -> Option<usize> {
        if q < self.min {
            return None;
        }
        let bin = ((q - self.min) / self.delta).floor() as usize;
        (bin < n_points).then_some(bin)
    }
}

/// Pair-resolved reflection functions and their total
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReflectionFunctions {
    partials: BTreeMap<(usize, usize), Data1D>,
    labels: BTreeMap<(usize, usize), String>,
    total: Data1D,
}

impl ReflectionFunctions {
    /// Function for the type pair `(i, j)`, in either order
    pub fn partial(&self, i: usize, j: usize) -> Option<&Data1D> {
        self.partials.get(&(i.min(j), i.max(j)))
    }

    /// Label `"A-B"` of the type pair `(i, j)`
    pub fn label(&self, i: usize, j: usize) -> Option<&str> {
        self.labels.get(&(i.min(j), i.max(j))).map(String::as_str)
    }

    /// Sum over pairs, with unlike pairs counted twice
    pub fn total(&self) -> &Data1D {
        &self.total
    }

    /// All stored pairs `(i, j)` with `i <= j`
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.partials.keys().copied()
    }
}

fn check_types(reflections: &[BraggReflection], n_types: usize) -> Result<()> {
    if let Some(reflection) = reflections.iter().find(|r| r.n_types() < n_types) {
        return Err(BraggError::Mismatch(format!(
            "reflection {} holds {} atom types but {} were requested",
            reflection.index(),
            reflection.n_types(),
            n_types
        )));
    }
    Ok(())
}

/// Histogram reflection intensities onto `grid`, one function per type pair
///
/// Each reflection adds into the point `floor((q - min) / delta)`; those
/// outside the grid are left out.
///
/// The pair functions are not weighted by concentration or scattering
/// length. `atom_types` only sets the number of types and the `"A-B"`
/// labels; populations are ignored. Apply any weighting to the result.
pub fn form_reflection_functions(
    reflections: &[BraggReflection],
    atom_types: &[AtomTypeData],
    grid: &QGrid,
) -> Result<ReflectionFunctions> {
    grid.validate()?;
    let n_types = atom_types.len();
    if n_types == 0 {
        return Err(BraggError::Mismatch(
            "no atom types supplied for reflection functions".to_string(),
        ));
    }
    check_types(reflections, n_types)?;

    let template = Data1D::regular(grid.min, grid.delta, grid.max);
    let n_points = template.n_values();

    let mut functions = ReflectionFunctions {
        total: template.clone(),
        ..Default::default()
    };
    for i in 0..n_types {
        for j in i..n_types {
            functions.partials.insert((i, j), template.clone());
            functions
                .labels
                .insert((i, j), format!("{}-{}", atom_types[i].name, atom_types[j].name));
        }
    }

    let mut n_skipped = 0;
    for reflection in reflections {
        let Some(bin) = grid.bin(reflection.q(), n_points) else {
            n_skipped += 1;
            continue;
        };
        for (&(i, j), data) in functions.partials.iter_mut() {
            data.add_at(bin, reflection.intensity(i, j));
        }
    }
    if n_skipped > 0 {
        debug!("{} reflections fall outside the Q grid", n_skipped);
    }

    for (&(i, j), data) in &functions.partials {
        let weight = if i == j { 1.0 } else { 2.0 };
        functions.total.add_scaled(data, weight);
    }

    Ok(functions)
}

/// Redistribute reflections onto an arbitrary ascending set of Q values
///
/// Point `n` collects the reflections between the midpoints to its
/// neighbours; the outermost points extend by the same half-spacing
/// outwards. Intensities landing in one point are averaged and their
/// multiplicities summed. Returns one reflection per Q value.
pub fn rebin_reflections(
    reflections: &[BraggReflection],
    n_types: usize,
    q_values: &[f64],
) -> Result<Vec<BraggReflection>> {
    if q_values.len() < 2 {
        return Err(BraggError::InvalidQGrid(format!(
            "at least two Q values are needed, got {}",
            q_values.len()
        )));
    }
    if q_values.iter().any(|q| !q.is_finite()) || q_values.windows(2).any(|w| w[1] <= w[0]) {
        return Err(BraggError::InvalidQGrid(
            "Q values must be finite and strictly ascending".to_string(),
        ));
    }
    check_types(reflections, n_types)?;

    let last = q_values.len() - 1;
    let mut edges = Vec::with_capacity(q_values.len() + 1);
    edges.push(q_values[0] - 0.5 * (q_values[1] - q_values[0]));
    edges.extend(q_values.windows(2).map(|w| 0.5 * (w[0] + w[1])));
    edges.push(q_values[last] + 0.5 * (q_values[last] - q_values[last - 1]));

    let mut rebinned: Vec<BraggReflection> = q_values
        .iter()
        .enumerate()
        .map(|(n, &q)| BraggReflection::new(q, n as i64, n_types))
        .collect();
    let mut counts = vec![0usize; q_values.len()];

    for reflection in reflections {
        let q = reflection.q();
        if q < edges[0] || q >= edges[edges.len() - 1] {
            warn!(
                "Reflection {} at Q = {} lies outside the rebinning range {} to {} and is ignored",
                reflection.index(),
                q,
                edges[0],
                edges[edges.len() - 1]
            );
            continue;
        }

        let point = edges.partition_point(|&edge| edge <= q) - 1;
        let target = &mut rebinned[point];
        if counts[point] == 0 {
            target.set_hkl(reflection.hkl());
        }
        target.add_kvectors(reflection.n_kvectors());
        for i in 0..n_types {
            for j in i..n_types {
                target.add_intensity(i, j, reflection.intensity(i, j))?;
            }
        }
        counts[point] += 1;
    }

    for (target, &count) in rebinned.iter_mut().zip(counts.iter()) {
        if count > 1 {
            target.scale_intensities(1.0 / count as f64);
        }
    }

    Ok(rebinned)
}
