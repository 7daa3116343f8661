/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Enumeration of reciprocal lattice vectors within a Q range

use super::calculator::BraggParameters;
use super::errors::Result;
use super::kvector::KVector;
use super::reflection::BraggReflection;
use crate::configuration::SimulationBox;
use crate::geometry::Matrix3;
use log::{debug, info};
use std::ops::Range;
use std::time::Instant;

/// Result of enumerating the reciprocal lattice
#[derive(Debug, Clone, Default)]
pub struct LatticeEnumeration {
    /// Maximum |h|, |k|, |l|
    pub max_hkl: [usize; 3],
    /// Populated reflections in ascending Q, densely indexed
    pub reflections: Vec<BraggReflection>,
    /// K-vectors sorted by reflection index
    pub kvectors: Vec<KVector>,
    /// Range of `kvectors` belonging to each reflection
    pub ranges: Vec<Range<usize>>,
}

/// Reciprocal axes of `sim_box` with each column scaled by the multiplicity
pub fn scaled_reciprocal_axes(sim_box: &SimulationBox, multiplicity: [usize; 3]) -> Matrix3 {
    let mut axes = *sim_box.reciprocal_axes();
    for (n, &factor) in multiplicity.iter().enumerate() {
        axes.column_multiply(n, factor as f64);
    }
    axes
}

/// Enumerate all `(h, k, l)` with `h >= 0` whose |G| lies in the Q range
///
/// Vectors are binned by `floor(|G| / q_delta)`. Empty bins are discarded and
/// the remaining reflections are renumbered in Q order; each reflection's
/// multiplicity holds the raw number of enumerated vectors until the first
/// intensity calculation replaces it with the half-sphere weighted count.
pub fn enumerate_kvectors(
    reciprocal_axes: &Matrix3,
    params: &BraggParameters,
    n_types: usize,
) -> Result<LatticeEnumeration> {
    params.validate()?;
    let timer = Instant::now();

    let lengths = reciprocal_axes.column_lengths();
    let max_hkl = [
        (params.q_max / lengths.x).floor() as usize,
        (params.q_max / lengths.y).floor() as usize,
        (params.q_max / lengths.z).floor() as usize,
    ];
    debug!(
        "Reciprocal axis lengths {:e} {:e} {:e} give max hkl {:?}",
        lengths.x, lengths.y, lengths.z, max_hkl
    );

    // Bin centres sit at (n + 0.5) * q_delta
    let n_bins = (params.q_max / params.q_delta).floor() as usize + 1;
    let mut bins: Vec<BraggReflection> = (0..n_bins)
        .map(|n| BraggReflection::new((n as f64 + 0.5) * params.q_delta, -1, n_types))
        .collect();

    let q_min_sq = params.q_min * params.q_min;
    let q_max_sq = params.q_max * params.q_max;
    let [max_h, max_k, max_l] = max_hkl.map(|m| m as i32);

    let mut kvectors = Vec::new();
    for h in 0..=max_h {
        for k in -max_k..=max_k {
            for l in -max_l..=max_l {
                if h == 0 && k == 0 && l == 0 {
                    continue;
                }

                let mag_sq = reciprocal_axes.multiply_indices([h, k, l]).magnitude_sq();
                if mag_sq < q_min_sq || mag_sq > q_max_sq {
                    continue;
                }

                let bin = ((mag_sq.sqrt() / params.q_delta) as usize).min(n_bins - 1);
                let reflection = &mut bins[bin];
                if reflection.n_kvectors() == 0 {
                    reflection.set_hkl([h, k, l]);
                }
                reflection.add_kvectors(1);
                kvectors.push(KVector::new(h, k, l, bin, n_types));
            }
        }
    }

    // Compact: keep populated bins only, renumbering densely in Q order
    let mut dense_index = vec![usize::MAX; n_bins];
    let mut reflections = Vec::new();
    for (bin, mut reflection) in bins.into_iter().enumerate() {
        if reflection.n_kvectors() == 0 {
            continue;
        }
        dense_index[bin] = reflections.len();
        reflection.set_index(reflections.len() as i64);
        reflections.push(reflection);
    }

    for kvec in kvectors.iter_mut() {
        kvec.set_reflection_index(dense_index[kvec.reflection_index()]);
    }
    kvectors.sort_by_key(|kvec| kvec.reflection_index());

    let mut ranges = Vec::with_capacity(reflections.len());
    let mut start = 0;
    for reflection in &reflections {
        let end = start + reflection.n_kvectors();
        ranges.push(start..end);
        start = end;
    }

    info!(
        "Bragg calculation spans {} k-vectors (max hkl = {} x {} x {}) over {} <= Q <= {} ({:.2?} elapsed)",
        kvectors.len(),
        max_hkl[0],
        max_hkl[1],
        max_hkl[2],
        params.q_min,
        params.q_max,
        timer.elapsed()
    );
    info!(
        "{} unique Bragg reflections found using a Q resolution of {} Å⁻¹",
        reflections.len(),
        params.q_delta
    );

    Ok(LatticeEnumeration {
        max_hkl,
        reflections,
        kvectors,
        ranges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn cubic_axes(length: f64) -> Matrix3 {
        Matrix3::diagonal(length, length, length)
    }

    fn params(q_min: f64, q_delta: f64, q_max: f64) -> BraggParameters {
        BraggParameters {
            q_min,
            q_delta,
            q_max,
            multiplicity: [1, 1, 1],
        }
    }

    #[test]
    fn test_half_sphere_uniqueness() {
        let enumeration = enumerate_kvectors(&cubic_axes(0.3), &params(0.0, 0.05, 1.0), 1).unwrap();

        let unique: HashSet<[i32; 3]> = enumeration.kvectors.iter().map(|k| k.hkl()).collect();
        assert_eq!(unique.len(), enumeration.kvectors.len());
        assert!(enumeration.kvectors.iter().all(|k| k.h() >= 0));
        assert!(!unique.contains(&[0, 0, 0]));

        // No vector should be enumerated together with its exact inverse, except along h = 0
        for kvec in enumeration.kvectors.iter().filter(|k| k.h() > 0) {
            assert!(!unique.contains(&[-kvec.h(), -kvec.k(), -kvec.l()]));
        }
    }

    #[test]
    fn test_ranges_cover_sorted_kvectors() {
        let enumeration = enumerate_kvectors(&cubic_axes(0.25), &params(0.1, 0.02, 1.2), 2).unwrap();

        assert_eq!(enumeration.ranges.len(), enumeration.reflections.len());
        for (n, range) in enumeration.ranges.iter().enumerate() {
            assert_eq!(enumeration.reflections[n].index(), n as i64);
            assert!(!range.is_empty());
            for kvec in &enumeration.kvectors[range.clone()] {
                assert_eq!(kvec.reflection_index(), n);
            }
        }
        assert_eq!(
            enumeration.ranges.last().map(|r| r.end),
            Some(enumeration.kvectors.len())
        );
    }

    #[test]
    fn test_reflections_ascend_in_q() {
        let axes = Matrix3::from_columns(
            crate::geometry::Vector3D::new(0.4, 0.0, 0.0),
            crate::geometry::Vector3D::new(0.1, 0.35, 0.0),
            crate::geometry::Vector3D::new(0.05, 0.02, 0.5),
        );
        let enumeration = enumerate_kvectors(&axes, &params(0.2, 0.01, 1.5), 1).unwrap();

        assert!(!enumeration.reflections.is_empty());
        for pair in enumeration.reflections.windows(2) {
            assert!(pair[0].q() <= pair[1].q());
        }
    }

    #[test]
    fn test_multiplicity_scaling() {
        let sim_box = SimulationBox::cubic(20.0).unwrap();
        let axes = scaled_reciprocal_axes(&sim_box, [2, 1, 3]);
        let lengths = axes.column_lengths();
        let base = 2.0 * std::f64::consts::PI / 20.0;

        assert!((lengths.x - 2.0 * base).abs() < 1e-12);
        assert!((lengths.y - base).abs() < 1e-12);
        assert!((lengths.z - 3.0 * base).abs() < 1e-12);
    }
}
