/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Structure factor accumulation over atoms

use super::errors::{BraggError, Result};
use super::kvector::KVector;
use super::phase::PhaseTables;
use crate::configuration::Atom;
use rayon::prelude::*;

/// Accumulate every present atom's phase into every k-vector
///
/// Parallel over k-vectors: each worker owns a disjoint set of vectors and
/// only reads the shared phase tables, so per-vector sums are identical
/// regardless of thread count.
pub fn accumulate_structure_factors(
    kvectors: &mut [KVector],
    phases: &PhaseTables,
    atoms: &[Atom],
    n_types: usize,
) -> Result<()> {
    if atoms.len() != phases.n_atoms() {
        return Err(BraggError::Mismatch(format!(
            "phase tables hold {} atoms but the configuration has {}",
            phases.n_atoms(),
            atoms.len()
        )));
    }

    let mut contributors = Vec::with_capacity(atoms.len());
    for (n, atom) in atoms.iter().enumerate() {
        if atom.local_type_index >= n_types {
            return Err(BraggError::AtomTypeOutOfRange {
                index: atom.local_type_index,
                n_types,
            });
        }
        if atom.present {
            contributors.push((n, atom.local_type_index));
        }
    }

    kvectors.par_iter_mut().for_each(|kvec| {
        kvec.zero_cos_sin_terms();
        let hkl = kvec.hkl();
        for &(atom, atom_type) in &contributors {
            let phase = phases.phase(atom, hkl);
            kvec.add_cos_term(atom_type, phase.re);
            kvec.add_sin_term(atom_type, phase.im);
        }
    });

    Ok(())
}
