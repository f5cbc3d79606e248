//! optrace CLI - sequential lens analysis from the terminal
//!
//! Loads a JSON prescription, brings the model up to date and prints
//! first-order data, paraxial traces, real rays, ray fans or vignetting.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use optrace::{EngineConfig, MaterialLibrary, OpticalSystem, Vec2};
use std::path::{Path, PathBuf};
use tracing::info;

mod log_setup;
mod report;

#[derive(Parser)]
#[command(name = "optrace")]
#[command(about = "Sequential optical ray tracer", long_about = None)]
struct Cli {
    /// Engine configuration file
    #[arg(short, long, global = true, default_value = "optrace.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the prescription and its first-order data
    Info {
        /// Prescription file (.json)
        file: PathBuf,
        /// Print first-order data as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print paraxial marginal and chief ray heights and slopes
    Paraxial {
        /// Prescription file (.json)
        file: PathBuf,
        /// Wavelength index
        #[arg(short, long)]
        wvl: Option<usize>,
    },
    /// Trace one real ray surface by surface
    Trace {
        /// Prescription file (.json)
        file: PathBuf,
        /// Field index
        #[arg(short, long, default_value_t = 0)]
        field: usize,
        /// Wavelength index
        #[arg(short, long)]
        wvl: Option<usize>,
        /// Relative pupil x
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        px: f64,
        /// Relative pupil y
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        py: f64,
    },
    /// Trace a ray fan and print image-plane errors
    Fan {
        /// Prescription file (.json)
        file: PathBuf,
        /// Field index
        #[arg(short, long, default_value_t = 0)]
        field: usize,
        /// Wavelength index
        #[arg(short, long)]
        wvl: Option<usize>,
        /// Fan direction in degrees from the x axis
        #[arg(long, default_value_t = 90.0)]
        azimuth: f64,
        /// Rays in the fan
        #[arg(short, long, default_value_t = 11)]
        samples: usize,
    },
    /// Compute and print vignetting factors for every field
    Vignetting {
        /// Prescription file (.json)
        file: PathBuf,
        /// Write the factors back into the prescription
        #[arg(long)]
        save: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    log_setup::setup_logging(&config.log_level)?;

    match cli.command {
        Commands::Info { file, json } => {
            let system = open_system(&file, &config)?;
            if json {
                let fod = system.first_order().context("model has no first-order data")?;
                println!("{}", serde_json::to_string_pretty(fod)?);
            } else {
                report::print_info(&system)?;
            }
        }
        Commands::Paraxial { file, wvl } => {
            let system = open_system(&file, &config)?;
            let wvl = wvl.unwrap_or_else(|| system.spec().wvl_spec.reference_index());
            report::print_paraxial(&system, wvl)?;
        }
        Commands::Trace {
            file,
            field,
            wvl,
            px,
            py,
        } => {
            let system = open_system(&file, &config)?;
            let wvl = wvl.unwrap_or_else(|| system.spec().wvl_spec.reference_index());
            let ray = system.trace_pupil_ray(field, wvl, Vec2::new(px, py))?;
            report::print_ray(&system, &ray);
        }
        Commands::Fan {
            file,
            field,
            wvl,
            azimuth,
            samples,
        } => {
            let system = open_system(&file, &config)?;
            let wvl = wvl.unwrap_or_else(|| system.spec().wvl_spec.reference_index());
            let rays = system.trace_fan(field, wvl, azimuth, samples)?;
            let chief = system.trace_pupil_ray(field, wvl, Vec2::zeros())?;
            report::print_fan(&rays, &chief);
        }
        Commands::Vignetting { file, save } => {
            let mut system = open_system(&file, &config)?;
            system.compute_vignetting()?;
            report::print_vignetting(&system);
            if save {
                system.save(&file)?;
                println!("Saved vignetting factors to {}", file.display());
            }
        }
    }

    Ok(())
}

/// Read the configuration, or fall back to defaults when the file is absent.
fn load_config(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        return Ok(EngineConfig::default());
    }
    EngineConfig::load(path).with_context(|| format!("reading config {}", path.display()))
}

fn open_system(file: &Path, config: &EngineConfig) -> Result<OpticalSystem> {
    let library = MaterialLibrary::new(config.environment);
    let mut system =
        OpticalSystem::load(file, library).with_context(|| format!("loading prescription {}", file.display()))?;
    system.set_options(config.trace);
    system.update_model()?;
    info!(file = %file.display(), surfaces = system.assembly().surface_count(), "system ready");
    Ok(system)
}
