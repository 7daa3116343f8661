/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Folding k-vector sums into reflections and normalising

use super::errors::{BraggError, Result};
use super::kvector::KVector;
use super::reflection::BraggReflection;
use rayon::prelude::*;
use std::ops::Range;

/// Normalisation factor `1 / (n_atoms · mx · my · mz)`
pub fn normalisation_factor(n_atoms: usize, multiplicity: [usize; 3]) -> f64 {
    let cells: usize = multiplicity.iter().product();
    1.0 / (n_atoms * cells) as f64
}

/// Reset every reflection, fold its k-vectors into it, and scale by `factor`
///
/// `ranges[n]` is the slice of `kvectors` belonging to reflection `n`, so
/// each reflection is finalised independently (in parallel) and always sums
/// its vectors in the same order.
pub fn finalise_intensities(
    reflections: &mut [BraggReflection],
    kvectors: &[KVector],
    ranges: &[Range<usize>],
    factor: f64,
) -> Result<()> {
    if ranges.len() != reflections.len() {
        return Err(BraggError::Mismatch(format!(
            "{} k-vector ranges supplied for {} reflections",
            ranges.len(),
            reflections.len()
        )));
    }
    if let Some(range) = ranges.iter().find(|r| r.end > kvectors.len()) {
        return Err(BraggError::Mismatch(format!(
            "k-vector range {:?} exceeds {} k-vectors",
            range,
            kvectors.len()
        )));
    }

    reflections
        .par_iter_mut()
        .zip(ranges.par_iter())
        .enumerate()
        .try_for_each(|(n, (reflection, range))| {
            reflection.reset();
            for kvec in &kvectors[range.clone()] {
                debug_assert_eq!(kvec.reflection_index(), n);
                kvec.add_intensities_into(reflection)?;
            }
            reflection.scale_intensities(factor);
            Ok(())
        })
}
