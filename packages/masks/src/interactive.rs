#![allow(clippy::module_name_repetitions)]

//! Interactive prompts for mask generation.
//!
//! Menu-driven front end using `dialoguer`, for running mask generation
//! without memorizing CLI flags.

use dialoguer::{Confirm, Input};

use crate::MaskJobConfig;
use damage_map_cli_utils::{IndicatifProgress, MultiProgress};

/// Prompts for a mask-generation configuration and runs the batch.
///
/// # Errors
///
/// Returns an error if a prompt fails or mask generation halts.
pub fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let labels_dir: String = Input::new()
        .with_prompt("Labels directory (annotation JSON documents)")
        .default("data/raw/xbd/tier1/labels".to_string())
        .interact_text()?;

    let output_dir: String = Input::new()
        .with_prompt("Output directory for masks")
        .default("data/processed/train_masks".to_string())
        .interact_text()?;

    let config = MaskJobConfig::new(labels_dir, output_dir);

    let proceed = Confirm::new()
        .with_prompt(format!(
            "Generate {}x{} masks into {}?",
            config.width,
            config.height,
            config.output_dir.display()
        ))
        .default(true)
        .interact()?;

    if !proceed {
        return Ok(());
    }

    let progress = IndicatifProgress::scenes_bar(multi, "Generating masks");
    let summary = crate::generate_all(&config, &progress)?;

    log::info!(
        "Done: {} masks written ({} scenes skipped)",
        summary.generated,
        summary.total() - summary.generated
    );

    Ok(())
}
