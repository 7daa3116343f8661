/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

use approx::assert_relative_eq;
use bragg_rs::bragg::{
    average_reflections, form_reflection_functions, rebin_reflections, BraggCalculator,
    BraggError, BraggParameters, BraggReflection, QGrid,
};
use bragg_rs::configuration::{Configuration, ConfigurationBuilder, LatticeType};
use rstest::rstest;

fn crystal(lattice: LatticeType, species: &[&str]) -> Configuration {
    ConfigurationBuilder::new("crystal")
        .lattice(lattice)
        .cell_length(4.0)
        .repeats([3, 3, 3])
        .species(species)
        .build()
        .unwrap()
}

fn reflections_of(cfg: &Configuration) -> Vec<BraggReflection> {
    let mut calculator = BraggCalculator::new(BraggParameters {
        q_min: 0.1,
        q_delta: 0.01,
        q_max: 3.5,
        multiplicity: [1, 1, 1],
    })
    .unwrap();
    calculator.calculate(cfg).unwrap();
    calculator.reflections().to_vec()
}

#[rstest]
#[case(LatticeType::SimpleCubic)]
#[case(LatticeType::BodyCentred)]
#[case(LatticeType::FaceCentred)]
fn test_grid_total_conserves_intensity(#[case] lattice: LatticeType) {
    let cfg = crystal(lattice, &["A", "B"]);
    let reflections = reflections_of(&cfg);
    let grid = QGrid::new(0.0, 0.05, 4.0);
    let functions = form_reflection_functions(&reflections, cfg.atom_types(), &grid).unwrap();

    let expected: f64 = reflections
        .iter()
        .map(|r| r.intensity(0, 0) + 2.0 * r.intensity(0, 1) + r.intensity(1, 1))
        .sum();
    let binned: f64 = functions.total().values().iter().sum();
    assert_relative_eq!(binned, expected, max_relative = 1e-12);

    assert_eq!(functions.pairs().collect::<Vec<_>>(), vec![(0, 0), (0, 1), (1, 1)]);
    assert_eq!(functions.label(0, 1), Some("A-B"));
}

#[rstest]
#[case(0.0, 0.1, 4.0, 41)]
#[case(0.5, 0.1, 1.3, 9)]
#[case(1.0, 0.25, 1.1, 1)]
fn test_grid_points(#[case] min: f64, #[case] delta: f64, #[case] max: f64, #[case] n: usize) {
    let points = QGrid::new(min, delta, max).points();
    assert_eq!(points.len(), n);
    assert_relative_eq!(points[0], min);
}

#[rstest]
#[case(QGrid::new(0.0, 0.0, 1.0))]
#[case(QGrid::new(0.0, f64::NAN, 1.0))]
#[case(QGrid::new(2.0, 0.1, 1.0))]
fn test_invalid_grids(#[case] grid: QGrid) {
    let cfg = crystal(LatticeType::SimpleCubic, &["A"]);
    assert!(matches!(
        form_reflection_functions(&[], cfg.atom_types(), &grid),
        Err(BraggError::InvalidQGrid(_))
    ));
}

#[test]
fn test_single_species_partial_equals_total() {
    let cfg = crystal(LatticeType::FaceCentred, &["Cu"]);
    let reflections = reflections_of(&cfg);
    let functions =
        form_reflection_functions(&reflections, cfg.atom_types(), &QGrid::new(0.0, 0.1, 4.0)).unwrap();

    assert_eq!(functions.partial(0, 0), Some(functions.total()));
    assert!(functions.partial(0, 1).is_none());
}

#[test]
fn test_rebin_onto_coarse_axis() {
    let cfg = crystal(LatticeType::SimpleCubic, &["A"]);
    let reflections = reflections_of(&cfg);
    let q_values: Vec<f64> = (1..=7).map(|n| 0.5 * n as f64).collect();
    let rebinned = rebin_reflections(&reflections, 1, &q_values).unwrap();

    assert_eq!(rebinned.len(), q_values.len());
    for (reflection, &q) in rebinned.iter().zip(q_values.iter()) {
        assert_relative_eq!(reflection.q(), q);
    }

    // Every reflection lands somewhere: all lie within [0.25, 3.75)
    let total_multiplicity: usize = reflections.iter().map(|r| r.n_kvectors()).sum();
    let rebinned_multiplicity: usize = rebinned.iter().map(|r| r.n_kvectors()).sum();
    assert_eq!(rebinned_multiplicity, total_multiplicity);
}

#[rstest]
#[case(vec![])]
#[case(vec![1.0])]
#[case(vec![1.0, 0.5])]
#[case(vec![1.0, 1.5, 1.5])]
fn test_rebin_rejects_axis(#[case] q_values: Vec<f64>) {
    assert!(matches!(
        rebin_reflections(&[], 1, &q_values),
        Err(BraggError::InvalidQGrid(_))
    ));
}

#[test]
fn test_averaging_successive_calculations() {
    let mut cfg = crystal(LatticeType::BodyCentred, &["Fe"]);
    let first = reflections_of(&cfg);
    cfg.translate_atom(1, bragg_rs::geometry::Vector3D::new(0.2, 0.0, -0.1))
        .unwrap();
    let second = reflections_of(&cfg);

    let averaged = average_reflections(&[first.clone(), second.clone()]).unwrap();
    assert_eq!(averaged.len(), first.len());
    for ((a, b), mean) in first.iter().zip(second.iter()).zip(averaged.iter()) {
        assert_relative_eq!(
            mean.intensity(0, 0),
            0.5 * (a.intensity(0, 0) + b.intensity(0, 0)),
            epsilon = 1e-10
        );
        assert_eq!(mean.n_kvectors(), a.n_kvectors());
    }
}
