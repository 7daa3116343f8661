/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

use bragg_rs::bragg::{
    load_reflections, read_reflections, save_reflections, BraggCalculator, BraggError,
    BraggParameters, BraggReflection,
};
use bragg_rs::configuration::{ConfigurationBuilder, LatticeType};
use std::fs::File;
use std::io::{Cursor, Write};
use tempfile::tempdir;

fn calculated_reflections() -> Vec<BraggReflection> {
    let cfg = ConfigurationBuilder::new("cu3au")
        .lattice(LatticeType::FaceCentred)
        .cell_length(3.75)
        .repeats([2, 2, 2])
        .species(&["Cu", "Au"])
        .build()
        .unwrap();
    let mut calculator = BraggCalculator::new(BraggParameters {
        q_min: 0.1,
        q_delta: 0.01,
        q_max: 4.0,
        multiplicity: [1, 1, 1],
    })
    .unwrap();
    calculator.calculate(&cfg).unwrap();
    calculator.reflections().to_vec()
}

#[test]
fn test_save_and_load_calculated_reflections() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bragg.restart");

    let reflections = calculated_reflections();
    assert!(!reflections.is_empty());
    save_reflections(&path, &reflections).unwrap();

    let loaded = load_reflections(&path).unwrap();
    assert_eq!(loaded, reflections);
}

#[test]
fn test_blank_lines_are_tolerated() {
    let text = "\n1\n\n0 6.5e-1 6 1 0 0\n2\n1e0 5e-1\n\n2e0\n";
    let reflections = read_reflections(&mut Cursor::new(text)).unwrap();

    assert_eq!(reflections.len(), 1);
    assert_eq!(reflections[0].hkl(), [1, 0, 0]);
    assert_eq!(reflections[0].n_kvectors(), 6);
    assert_eq!(reflections[0].intensity(1, 0), 0.5);
    assert_eq!(reflections[0].intensity(1, 1), 2.0);
}

#[test]
fn test_truncated_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("truncated.restart");
    let mut file = File::create(&path).unwrap();
    writeln!(file, "2").unwrap();
    writeln!(file, "0 6.5e-1 6 1 0 0").unwrap();
    writeln!(file, "1").unwrap();
    writeln!(file, "3e0").unwrap();
    drop(file);

    match load_reflections(&path) {
        Err(BraggError::Deserialisation { field, .. }) => assert_eq!(field, "reflection header"),
        other => panic!("expected a deserialisation error, got {:?}", other),
    }
}

#[test]
fn test_malformed_values() {
    let bad_q = "1\n0 abc 6 1 0 0\n1\n1e0\n";
    assert!(matches!(
        read_reflections(&mut Cursor::new(bad_q)),
        Err(BraggError::Deserialisation { field: "reflection q", .. })
    ));

    let long_row = "1\n0 6.5e-1 6 1 0 0\n1\n1e0 2e0\n";
    assert!(matches!(
        read_reflections(&mut Cursor::new(long_row)),
        Err(BraggError::Deserialisation { field: "intensity matrix row", .. })
    ));

    let huge_matrix = "1\n0 6.5e-1 6 1 0 0\n100000000000\n1e0\n";
    assert!(matches!(
        read_reflections(&mut Cursor::new(huge_matrix)),
        Err(BraggError::Deserialisation { .. })
    ));

    let bad_count = "many\n";
    assert!(matches!(
        read_reflections(&mut Cursor::new(bad_count)),
        Err(BraggError::Deserialisation { field: "reflection count", .. })
    ));
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        load_reflections(dir.path().join("absent.restart")),
        Err(BraggError::Io(_))
    ));
}
