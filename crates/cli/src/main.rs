//! Command-line driver: reads a YAML run configuration, builds the
//! polyhedron from its mesh files, evaluates every field point and
//! writes the results to the log and (optionally) a CSV file.

mod config;
mod error;
mod output;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use error::CliError;
use gravity_kernel::{GravityEvaluator, MetricUnit, NormalOrientation, Polyhedron, Vec3};
use mesh_io::MeshFiles;

#[derive(Debug, Parser)]
#[command(
    name = "polygrav",
    version,
    about = "Exact gravitational field of a constant-density polyhedron"
)]
struct Args {
    /// Path to the YAML run configuration.
    config: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args.config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: &Path) -> Result<(), CliError> {
    let config = config::load(config_path)?;
    let input = &config.gravity_model.input;

    info!(
        files = ?input.polyhedron,
        density = input.density,
        points = input.points.len(),
        check_mesh = input.check_mesh,
        "starting gravity evaluation"
    );

    let source = MeshFiles::new(input.polyhedron.iter().cloned());
    let polyhedron = Polyhedron::from_source(
        &source,
        input.density,
        NormalOrientation::Outwards,
        input.integrity_policy(),
        MetricUnit::Meter,
    )?;
    info!(%polyhedron, "mesh loaded");

    let evaluator = GravityEvaluator::new(&polyhedron);
    let points: Vec<Vec3> = input.points.iter().map(|&p| Vec3::from_array(p)).collect();
    let results = evaluator.evaluate_many(&points, true);

    for (point, result) in points.iter().zip(results.iter()) {
        info!(
            point = ?point.to_array(),
            potential = result.potential,
            acceleration = ?result.acceleration.to_array(),
            tensor = ?result.tensor.to_array(),
            "field point evaluated"
        );
    }

    if let Some(filename) = &config.gravity_model.output.filename {
        output::write_csv_file(filename, &points, &results)?;
        info!(file = %filename.display(), rows = results.len(), "results written");
    }

    Ok(())
}
