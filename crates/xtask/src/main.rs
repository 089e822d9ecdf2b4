mod build;
mod cli;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Test { features } => {
            println!("Running host tests...");
            build::run_tests(features.as_deref())?;
            println!("All tests passed!");
        }
        Commands::Build { features, release } => {
            println!("Building for {}...", build::TARGET);
            build::build_all(features.as_deref(), *release)?;
            println!("Build complete!");
        }
    }

    Ok(())
}
