#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interactive CLI orchestrator for the damage map toolchain.
//!
//! Provides a unified entry point that lets users interactively select
//! which tool to run (mask generation, dataset verification, prediction
//! demo) and guides them through the configuration for each.
//!
//! Uses `indicatif-log-bridge` (via [`damage_map_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

use dialoguer::{Input, Select};

/// Top-level tool selection for the damage map toolchain.
enum Tool {
    GenerateMasks,
    VerifyDataset,
    PredictDemo,
}

impl Tool {
    const ALL: &[Self] = &[Self::GenerateMasks, Self::VerifyDataset, Self::PredictDemo];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::GenerateMasks => "Generate training masks",
            Self::VerifyDataset => "Verify dataset paths",
            Self::PredictDemo => "Run prediction demo",
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = damage_map_cli_utils::init_logger();

    println!("Damage Map Toolchain");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::GenerateMasks => damage_map_masks::interactive::run(&multi)?,
        Tool::VerifyDataset => verify_dataset()?,
        Tool::PredictDemo => damage_map_predict::interactive::run(&multi)?,
    }

    Ok(())
}

/// Prompts for the dataset directories and prints a verification report.
fn verify_dataset() -> Result<(), Box<dyn std::error::Error>> {
    let images_dir: String = Input::new()
        .with_prompt("Raw image directory")
        .default("data/raw/xbd/tier1/images".to_string())
        .interact_text()?;

    let masks_dir: String = Input::new()
        .with_prompt("Mask directory")
        .default("data/processed/train_masks".to_string())
        .interact_text()?;

    let report = damage_map_dataset::verify::verify(
        std::path::Path::new(&images_dir),
        std::path::Path::new(&masks_dir),
    );

    log::info!("Found {} pre-disaster images", report.pre_image_count);
    log::info!("Found {} masks", report.mask_count);
    match &report.pairing {
        Some(pairing) if pairing.matched => {
            log::info!("Matched {} with {}", pairing.image, pairing.expected_mask);
        }
        Some(pairing) => {
            log::error!(
                "Could not find mask for {} (expected {})",
                pairing.image,
                pairing.expected_mask
            );
        }
        None => log::warn!("Not enough files to check pairing"),
    }

    if report.is_ok() {
        log::info!("Dataset layout looks good");
    } else {
        log::error!("Dataset verification failed");
    }

    Ok(())
}
