/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Main executable for bragg-rs

use bragg_rs::cli::{run, Cli};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    if !cli.json {
        println!("bragg-rs v{}", bragg_rs::VERSION);
        println!("-----------------------------------------------------------");
    }

    run(cli)
}
