/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Bragg calculation context and reciprocal-space cache

use super::accumulate::accumulate_structure_factors;
use super::enumerate::{enumerate_kvectors, scaled_reciprocal_axes};
use super::errors::{BraggError, Result};
use super::finalise::{finalise_intensities, normalisation_factor};
use super::kvector::KVector;
use super::phase::PhaseTables;
use super::reflection::BraggReflection;
use crate::configuration::Configuration;
use crate::geometry::{Matrix3, Vector3D};
use crate::store::GenericDataStore;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::time::Instant;

/// Store item name of the reciprocal-space cache
pub const CACHE_ITEM: &str = "BraggCache";

/// Store item name of the published reflection list
pub const REFLECTIONS_ITEM: &str = "BraggReflections";

/// Parameters controlling the Bragg calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BraggParameters {
    /// Minimum Q (Å⁻¹) of k-vectors to include
    pub q_min: f64,
    /// Width of the Q bins reflections are gathered into (Å⁻¹)
    pub q_delta: f64,
    /// Maximum Q (Å⁻¹) of k-vectors to include
    pub q_max: f64,
    /// Integer scaling of the reciprocal axes, for supercells of a unit cell
    pub multiplicity: [usize; 3],
}

impl Default for BraggParameters {
    fn default() -> Self {
        Self {
            q_min: 0.01,
            q_delta: 0.001,
            q_max: 1.0,
            multiplicity: [1, 1, 1],
        }
    }
}

impl BraggParameters {
    /// Check the parameters describe a usable Q range
    pub fn validate(&self) -> Result<()> {
        if !(self.q_delta.is_finite() && self.q_delta > 0.0) {
            return Err(BraggError::InvalidParameter(format!(
                "Q delta must be positive, got {}",
                self.q_delta
            )));
        }
        if !(self.q_min.is_finite() && self.q_min >= 0.0) {
            return Err(BraggError::InvalidParameter(format!(
                "Q min must be non-negative, got {}",
                self.q_min
            )));
        }
        if !(self.q_max.is_finite() && self.q_max > self.q_min) {
            return Err(BraggError::InvalidParameter(format!(
                "Q max ({}) must exceed Q min ({})",
                self.q_max, self.q_min
            )));
        }
        if self.multiplicity.contains(&0) {
            return Err(BraggError::InvalidParameter(format!(
                "multiplicity must be at least one along each axis, got {:?}",
                self.multiplicity
            )));
        }
        Ok(())
    }
}

/// Outcome of a call to [`calculate_bragg_terms`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BraggStatus {
    /// Intensities were (re)calculated
    Calculated,
    /// The cache already matched the configuration; nothing was done
    AlreadyUpToDate,
}

/// Inputs an enumeration depends on; any change forces re-enumeration
#[derive(Debug, Clone, PartialEq)]
struct EnumerationKey {
    params: BraggParameters,
    reciprocal_axes: Matrix3,
    n_atoms: usize,
    n_types: usize,
}

/// Reciprocal-space data cached for one configuration
#[derive(Debug, Default)]
pub struct ReciprocalCache {
    max_hkl: [usize; 3],
    reflections: Vec<BraggReflection>,
    kvectors: Vec<KVector>,
    ranges: Vec<Range<usize>>,
    phases: PhaseTables,
    configuration_id: Option<u64>,
    version: Option<u64>,
    key: Option<EnumerationKey>,
}

impl ReciprocalCache {
    /// Maximum Miller indices of the current enumeration
    pub fn max_hkl(&self) -> [usize; 3] {
        self.max_hkl
    }

    /// Finalised reflections, densely indexed in ascending Q
    pub fn reflections(&self) -> &[BraggReflection] {
        &self.reflections
    }

    /// K-vectors, grouped by reflection
    pub fn kvectors(&self) -> &[KVector] {
        &self.kvectors
    }

    /// Per-atom phase tables from the last calculation
    pub fn phases(&self) -> &PhaseTables {
        &self.phases
    }

    /// Configuration version the intensities correspond to
    pub fn version(&self) -> Option<u64> {
        self.version
    }

    /// Whether no enumeration is held
    pub fn is_empty(&self) -> bool {
        self.key.is_none()
    }

    /// Discard everything, forcing a full rebuild on the next calculation
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn is_current(&self, cfg: &Configuration, params: &BraggParameters) -> bool {
        self.configuration_id == Some(cfg.id())
            && self.version == Some(cfg.contents_version())
            && self.key.as_ref().map(|key| &key.params) == Some(params)
    }
}

/// Calculate Bragg intensities for a configuration, reusing `cache` where possible
///
/// Returns [`BraggStatus::AlreadyUpToDate`] without touching the cache when it
/// was built for the configuration's current version with the same
/// parameters. The k-vector enumeration is redone only when the Q range,
/// multiplicity, reciprocal axes, atom count or type count change. On error
/// the cache is cleared.
pub fn calculate_bragg_terms(
    cache: &mut ReciprocalCache,
    cfg: &Configuration,
    params: &BraggParameters,
) -> Result<BraggStatus> {
    if cache.is_current(cfg, params) {
        debug!(
            "Bragg data for configuration '{}' is up to date (version {})",
            cfg.name(),
            cfg.contents_version()
        );
        return Ok(BraggStatus::AlreadyUpToDate);
    }

    let result = recalculate(cache, cfg, params);
    if result.is_err() {
        cache.clear();
    }
    result
}

fn recalculate(
    cache: &mut ReciprocalCache,
    cfg: &Configuration,
    params: &BraggParameters,
) -> Result<BraggStatus> {
    params.validate()?;
    let sim_box = cfg
        .simulation_box()
        .ok_or_else(|| BraggError::MissingBox(cfg.name().to_string()))?;
    let n_types = cfg.n_atom_types();
    if n_types == 0 {
        return Err(BraggError::NoAtomTypes(cfg.name().to_string()));
    }
    let n_present = cfg.n_present_atoms();
    if n_present == 0 {
        return Err(BraggError::NoAtoms(cfg.name().to_string()));
    }

    let reciprocal_axes = scaled_reciprocal_axes(sim_box, params.multiplicity);
    for axis in 0..3 {
        let column = reciprocal_axes.column(axis);
        debug!(
            "Reciprocal axis {} (with multiplicity) = {:e} {:e} {:e} ({:e})",
            axis,
            column.x,
            column.y,
            column.z,
            column.magnitude()
        );
    }

    let key = EnumerationKey {
        params: *params,
        reciprocal_axes,
        n_atoms: cfg.n_atoms(),
        n_types,
    };
    if cache.key.as_ref() != Some(&key) {
        info!("Performing set up of Bragg arrays for configuration '{}'", cfg.name());
        let enumeration = enumerate_kvectors(&reciprocal_axes, params, n_types)?;
        cache.max_hkl = enumeration.max_hkl;
        cache.reflections = enumeration.reflections;
        cache.kvectors = enumeration.kvectors;
        cache.ranges = enumeration.ranges;
        cache.phases = PhaseTables::new(cfg.n_atoms(), enumeration.max_hkl);
        cache.key = Some(key);
    }

    let timer = Instant::now();
    let positions: Vec<Vector3D> = cfg.atoms().iter().map(|atom| atom.position).collect();
    cache.phases.calculate(&positions, &reciprocal_axes)?;
    debug!("Calculated atomic cos/sin terms ({:.2?} elapsed)", timer.elapsed());

    let timer = Instant::now();
    accumulate_structure_factors(&mut cache.kvectors, &cache.phases, cfg.atoms(), n_types)?;
    debug!(
        "Calculated atomic contributions to {} k-vectors ({:.2?} elapsed)",
        cache.kvectors.len(),
        timer.elapsed()
    );

    let factor = normalisation_factor(n_present, params.multiplicity);
    finalise_intensities(&mut cache.reflections, &cache.kvectors, &cache.ranges, factor)?;

    cache.configuration_id = Some(cfg.id());
    cache.version = Some(cfg.contents_version());
    Ok(BraggStatus::Calculated)
}

/// Run the calculation against a cache held in a data store
///
/// The cache lives under [`CACHE_ITEM`] with the configuration name as
/// prefix. After a recalculation the reflections are also published under
/// [`REFLECTIONS_ITEM`] for downstream consumers.
pub fn calculate_bragg_terms_in_store(
    store: &mut GenericDataStore,
    cfg: &Configuration,
    params: &BraggParameters,
) -> Result<BraggStatus> {
    let cache = store.realise::<ReciprocalCache>(CACHE_ITEM, cfg.name())?;
    let status = calculate_bragg_terms(cache, cfg, params)?;

    if status == BraggStatus::Calculated {
        let reflections = cache.reflections().to_vec();
        store.set(REFLECTIONS_ITEM, cfg.name(), reflections);
    }

    Ok(status)
}

/// Bragg calculation context owning the cache for one configuration
#[derive(Debug, Default)]
pub struct BraggCalculator {
    params: BraggParameters,
    cache: ReciprocalCache,
}

impl BraggCalculator {
    /// Create a calculator with validated parameters
    pub fn new(params: BraggParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            cache: ReciprocalCache::default(),
        })
    }

    /// Current parameters
    pub fn parameters(&self) -> &BraggParameters {
        &self.params
    }

    /// Replace the parameters; the next calculation re-enumerates if they differ
    pub fn set_parameters(&mut self, params: BraggParameters) -> Result<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    /// Calculate (or confirm) intensities for `cfg`
    pub fn calculate(&mut self, cfg: &Configuration) -> Result<BraggStatus> {
        calculate_bragg_terms(&mut self.cache, cfg, &self.params)
    }

    /// The cache
    pub fn cache(&self) -> &ReciprocalCache {
        &self.cache
    }

    /// Finalised reflections from the last calculation
    pub fn reflections(&self) -> &[BraggReflection] {
        self.cache.reflections()
    }
}
