#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for training mask generation.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use damage_map_masks::{MaskJobConfig, audit, generate_all};

#[derive(Parser)]
#[command(name = "damage_map_masks", about = "xBD training mask generation tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate class-index masks for every scene in a labels directory
    Generate {
        /// Directory containing `*_pre_disaster.json` / `*_post_disaster.json`
        #[arg(long, default_value = "data/raw/xbd/tier1/labels")]
        labels_dir: PathBuf,
        /// Flat output directory for mask PNGs (created if absent)
        #[arg(long, default_value = "data/processed/train_masks")]
        output_dir: PathBuf,
        /// Mask width in pixels
        #[arg(long, default_value_t = MaskJobConfig::DEFAULT_SIZE)]
        width: u32,
        /// Mask height in pixels
        #[arg(long, default_value_t = MaskJobConfig::DEFAULT_SIZE)]
        height: u32,
    },
    /// Verify the raw image and mask directories and the filename pairing
    Verify {
        /// Raw image directory
        #[arg(long, default_value = "data/raw/xbd/tier1/images")]
        images_dir: PathBuf,
        /// Generated mask directory
        #[arg(long, default_value = "data/processed/train_masks")]
        masks_dir: PathBuf,
    },
    /// Report the distinct class values present in one mask file
    Audit {
        /// Path to a generated mask PNG
        mask: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = damage_map_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            labels_dir,
            output_dir,
            width,
            height,
        } => {
            let mut config = MaskJobConfig::new(labels_dir, output_dir);
            config.width = width;
            config.height = height;

            let progress =
                damage_map_cli_utils::IndicatifProgress::scenes_bar(&multi, "Generating masks");
            let summary = generate_all(&config, &progress)?;

            log::info!(
                "{} masks written, {} scenes missing their pair, {} malformed",
                summary.generated,
                summary.skipped_missing_pair,
                summary.skipped_malformed
            );
        }
        Commands::Verify {
            images_dir,
            masks_dir,
        } => {
            let report = damage_map_dataset::verify::verify(&images_dir, &masks_dir);

            log::info!(
                "Found {} pre-disaster images in {}",
                report.pre_image_count,
                images_dir.display()
            );
            log::info!(
                "Found {} masks in {}",
                report.mask_count,
                masks_dir.display()
            );

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

            if !report.is_ok() {
                return Err("dataset verification failed".into());
            }
        }
        Commands::Audit { mask } => {
            let audit = audit::audit_mask(&mask)?;
            log::info!(
                "Classes found in {}: {:?} ({})",
                mask.display(),
                audit.values,
                audit.labels().join(", ")
            );
            if !audit.all_valid() {
                return Err("mask contains values outside the valid class range".into());
            }
        }
    }

    Ok(())
}
