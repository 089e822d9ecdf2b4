use anyhow::{Context, Result};
use std::process::Command;

/// Target used to check that the libraries stay `no_std`.
pub const TARGET: &str = "thumbv7em-none-eabihf";

/// Library crates, in dependency order.
const CRATES: [&str; 3] = ["sdio-bus", "besdbg-icd", "besdbg"];

pub fn run_tests(features: Option<&str>) -> Result<()> {
    let mut cargo_test = Command::new("cargo");
    cargo_test.arg("test");
    for krate in CRATES {
        cargo_test.args(["--package", krate]);
    }

    if let Some(features) = features {
        cargo_test.args(["--features", features]);
    }

    let status = cargo_test.status().context("Failed to run cargo test")?;

    if !status.success() {
        anyhow::bail!("Tests failed");
    }

    Ok(())
}

pub fn build_all(features: Option<&str>, release: bool) -> Result<()> {
    for krate in CRATES {
        println!("Building {}...", krate);
        build_no_std(krate, features, release)?;
    }

    Ok(())
}

fn build_no_std(
    krate: &str,
    features: Option<&str>,
    release: bool,
) -> Result<()> {
    let mut cargo_build = Command::new("cargo");
    cargo_build
        .arg("build")
        .arg("--package")
        .arg(krate)
        .arg("--target")
        .arg(TARGET);

    if release {
        cargo_build.arg("--release");
    }

    if let Some(features) = features {
        cargo_build.args(["--features", features]);
    }

    let status = cargo_build
        .status()
        .with_context(|| format!("Failed to build {}", krate))?;

    if !status.success() {
        anyhow::bail!("Build failed for {}", krate);
    }

    Ok(())
}
