/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Averaging of reflection lists across successive calculations

use super::errors::{BraggError, Result};
use super::reflection::BraggReflection;

/// Average matching reflection lists from several calculations
///
/// Every list must hold the same reflections (same count and intensity
/// matrix size). Intensities are averaged; the multiplicity of each result
/// is that of the first list, since the enumeration is shared.
pub fn average_reflections(history: &[Vec<BraggReflection>]) -> Result<Vec<BraggReflection>> {
    let Some(first) = history.first() else {
        return Ok(Vec::new());
    };

    for (step, reflections) in history.iter().enumerate().skip(1) {
        if reflections.len() != first.len() {
            return Err(BraggError::Mismatch(format!(
                "step {} holds {} reflections but step 0 holds {}",
                step,
                reflections.len(),
                first.len()
            )));
        }
        if let Some((n, r)) = reflections
            .iter()
            .enumerate()
            .find(|(n, r)| r.n_types() != first[*n].n_types())
        {
            return Err(BraggError::Mismatch(format!(
                "reflection {} in step {} holds {} atom types but step 0 holds {}",
                n,
                step,
                r.n_types(),
                first[n].n_types()
            )));
        }
    }

    let mut averaged = vec![BraggReflection::default(); first.len()];
    for reflections in history {
        for (sum, reflection) in averaged.iter_mut().zip(reflections.iter()) {
            *sum += reflection;
        }
    }

    let factor = 1.0 / history.len() as f64;
    for (sum, reflection) in averaged.iter_mut().zip(first.iter()) {
        *sum *= factor;
        sum.set_n_kvectors(reflection.n_kvectors());
    }

    Ok(averaged)
}
