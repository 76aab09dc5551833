#![allow(clippy::module_name_repetitions)]

//! Interactive prompts for the prediction demo.

use dialoguer::Input;

use crate::DemoConfig;
use damage_map_cli_utils::{IndicatifProgress, MultiProgress};

/// Prompts for a demo configuration and runs it.
///
/// # Errors
///
/// Returns an error if a prompt fails, the model artifact is missing, or
/// the demo cannot read its directories.
pub fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let model_path: String = Input::new()
        .with_prompt("Trained model artifact (.onnx)")
        .default("results/models/xbd_model_best.onnx".to_string())
        .interact_text()?;

    let images_dir: String = Input::new()
        .with_prompt("Raw image directory")
        .default("data/raw/xbd/tier1/images".to_string())
        .interact_text()?;

    let output_dir: String = Input::new()
        .with_prompt("Output directory for predictions")
        .default("results/predictions".to_string())
        .interact_text()?;

    let samples: usize = Input::new()
        .with_prompt("Number of samples")
        .default(3)
        .interact_text()?;

    let mut config = DemoConfig::new(model_path, images_dir, output_dir);
    config.samples = samples;

    let progress = IndicatifProgress::samples_bar(multi, "Predicting", samples as u64);
    crate::run_demo(&config, &progress)?;

    Ok(())
}
