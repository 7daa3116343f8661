/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Command line interface
//!
//! Generates a cubic crystal, runs the Bragg calculation on it and reports
//! the reflections as a table or as JSON.

use crate::bragg::{
    form_reflection_functions, save_reflections, BraggCalculator, BraggParameters,
    BraggReflection, QGrid,
};
use crate::configuration::{Configuration, ConfigurationBuilder, LatticeType};
use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use log::info;
use serde::Serialize;
use std::path::PathBuf;

/// Lattice choices exposed on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LatticeArg {
    Sc,
    Bcc,
    Fcc,
}

impl From<LatticeArg> for LatticeType {
    fn from(arg: LatticeArg) -> Self {
        match arg {
            LatticeArg::Sc => LatticeType::SimpleCubic,
            LatticeArg::Bcc => LatticeType::BodyCentred,
            LatticeArg::Fcc => LatticeType::FaceCentred,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "bragg-rs", version, about = "Bragg intensities of cubic crystals")]
pub struct Cli {
    /// Crystal lattice
    #[arg(long, value_enum, default_value_t = LatticeArg::Fcc)]
    pub lattice: LatticeArg,

    /// Cubic cell length (Å)
    #[arg(long, default_value_t = 4.05)]
    pub cell_length: f64,

    /// Unit cells along each axis
    #[arg(long, default_value_t = 4)]
    pub repeats: usize,

    /// Populate the lattice with two alternating species
    #[arg(long)]
    pub two_species: bool,

    /// Minimum Q (Å⁻¹)
    #[arg(long, default_value_t = 0.01)]
    pub q_min: f64,

    /// Q bin width (Å⁻¹)
    #[arg(long, default_value_t = 0.001)]
    pub q_delta: f64,

    /// Maximum Q (Å⁻¹)
    #[arg(long, default_value_t = 2.0)]
    pub q_max: f64,

    /// Reciprocal axis multiplicity, as three comma-separated integers
    #[arg(long, value_delimiter = ',', default_values_t = vec![1usize, 1, 1])]
    pub multiplicity: Vec<usize>,

    /// Print reflections as JSON
    #[arg(long)]
    pub json: bool,

    /// Write the reflections to a restart file
    #[arg(long, value_name = "PATH")]
    pub restart: Option<PathBuf>,

    /// Also print the total reflection function on a Q grid of this spacing
    #[arg(long, value_name = "DELTA")]
    pub grid_delta: Option<f64>,
}

impl Cli {
    /// Calculation parameters from the flags
    pub fn parameters(&self) -> anyhow::Result<BraggParameters> {
        let multiplicity: [usize; 3] = match self.multiplicity.as_slice() {
            &[x, y, z] => [x, y, z],
            other => bail!("--multiplicity needs three values, got {}", other.len()),
        };
        let params = BraggParameters {
            q_min: self.q_min,
            q_delta: self.q_delta,
            q_max: self.q_max,
            multiplicity,
        };
        params.validate()?;
        Ok(params)
    }

    /// Crystal described by the flags
    pub fn configuration(&self) -> anyhow::Result<Configuration> {
        let species: &[&str] = if self.two_species { &["A", "B"] } else { &["A"] };
        let cfg = ConfigurationBuilder::new("crystal")
            .lattice(self.lattice.into())
            .cell_length(self.cell_length)
            .repeats([self.repeats; 3])
            .species(species)
            .build()
            .context("failed to generate crystal")?;
        Ok(cfg)
    }
}

#[derive(Serialize)]
struct Report<'a> {
    parameters: &'a BraggParameters,
    atom_types: Vec<&'a str>,
    reflections: &'a [BraggReflection],
}

/// Sum of pair intensities with unlike pairs counted twice
fn total_intensity(reflection: &BraggReflection) -> f64 {
    let n_types = reflection.n_types();
    (0..n_types)
        .flat_map(|i| (i..n_types).map(move |j| (i, j)))
        .filter_map(|(i, j)| {
            let weight = if i == j { 1.0 } else { 2.0 };
            reflection.get_intensity(i, j).map(|value| weight * value)
        })
        .sum()
}

/// Run the program for parsed arguments
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let params = cli.parameters()?;
    let cfg = cli.configuration()?;
    info!(
        "Generated {} crystal with {} atoms in {} types",
        LatticeType::from(cli.lattice),
        cfg.n_atoms(),
        cfg.n_atom_types()
    );

    let mut calculator = BraggCalculator::new(params)?;
    calculator
        .calculate(&cfg)
        .context("Bragg calculation failed")?;
    let reflections = calculator.reflections();

    if cli.json {
        let report = Report {
            parameters: calculator.parameters(),
            atom_types: cfg.atom_types().iter().map(|t| t.name.as_str()).collect(),
            reflections,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{:>6} {:>12} {:>6} {:>12} {:>14}", "Index", "Q (1/A)", "Mult", "hkl", "Intensity");
        for reflection in reflections {
            let [h, k, l] = reflection.hkl();
            println!(
                "{:>6} {:>12.6} {:>6} {:>12} {:>14.6e}",
                reflection.index(),
                reflection.q(),
                reflection.n_kvectors(),
                format!("{} {} {}", h, k, l),
                total_intensity(reflection)
            );
        }
    }

    if let Some(delta) = cli.grid_delta {
        let grid = QGrid::new(0.0, delta, params.q_max);
        let functions = form_reflection_functions(reflections, cfg.atom_types(), &grid)?;
        println!("\n{:>12} {:>14}", "Q (1/A)", "Total");
        let total = functions.total();
        for (q, value) in total.x().iter().zip(total.values().iter()) {
            println!("{:>12.6} {:>14.6e}", q, value);
        }
    }

    if let Some(path) = &cli.restart {
        save_reflections(path, reflections)
            .with_context(|| format!("failed to write restart file {}", path.display()))?;
        info!("Wrote {} reflections to {}", reflections.len(), path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bragg::load_reflections;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["bragg-rs"]).unwrap();
        assert_eq!(cli.lattice, LatticeArg::Fcc);
        assert_eq!(cli.parameters().unwrap().multiplicity, [1, 1, 1]);
        assert!(cli.restart.is_none());
    }

    #[test]
    fn test_multiplicity_parsing() {
        let cli = Cli::try_parse_from(["bragg-rs", "--multiplicity", "2,1,3"]).unwrap();
        assert_eq!(cli.parameters().unwrap().multiplicity, [2, 1, 3]);

        let cli = Cli::try_parse_from(["bragg-rs", "--multiplicity", "2,1"]).unwrap();
        assert!(cli.parameters().is_err());
    }

    #[test]
    fn test_two_species_configuration() {
        let cli = Cli::try_parse_from(["bragg-rs", "--lattice", "bcc", "--repeats", "2", "--two-species"])
            .unwrap();
        let cfg = cli.configuration().unwrap();
        assert_eq!(cfg.n_atoms(), 16);
        assert_eq!(cfg.n_atom_types(), 2);
    }

    #[test]
    fn test_run_writes_restart() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bragg.restart");
        let cli = Cli::try_parse_from([
            "bragg-rs",
            "--lattice",
            "sc",
            "--repeats",
            "2",
            "--q-delta",
            "0.01",
            "--q-max",
            "2.0",
            "--grid-delta",
            "0.1",
            "--restart",
            path.to_str().unwrap(),
        ])
        .unwrap();
        run(cli).unwrap();

        let reflections = load_reflections(&path).unwrap();
        assert!(!reflections.is_empty());
    }
}
