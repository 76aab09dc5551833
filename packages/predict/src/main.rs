#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the damage prediction demo.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use damage_map_predict::{DemoConfig, run_demo};

#[derive(Parser)]
#[command(name = "damage_map_predict", about = "Damage prediction demo tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the trained model over sample pre/post pairs and write
    /// prediction and overlay images
    Demo {
        /// Path to the trained `.onnx` model artifact
        #[arg(long, default_value = "results/models/xbd_model_best.onnx")]
        model: PathBuf,
        /// Directory of raw pre/post disaster images
        #[arg(long, default_value = "data/raw/xbd/tier1/images")]
        images_dir: PathBuf,
        /// Output directory for prediction and overlay PNGs
        #[arg(long, default_value = "results/predictions")]
        output_dir: PathBuf,
        /// Number of samples to predict
        #[arg(long, default_value = "3")]
        samples: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = damage_map_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo {
            model,
            images_dir,
            output_dir,
            samples,
        } => {
            let mut config = DemoConfig::new(model, images_dir, output_dir);
            config.samples = samples;

            let progress = damage_map_cli_utils::IndicatifProgress::samples_bar(
                &multi,
                "Predicting",
                samples as u64,
            );
            let predicted = run_demo(&config, &progress)?;

            if predicted == 0 {
                log::warn!("No samples were predicted; check the images directory");
            }
        }
    }

    Ok(())
}
