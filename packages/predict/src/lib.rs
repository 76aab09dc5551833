#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Damage prediction and overlay visualization.
//!
//! Runs a trained segmentation model over pre/post disaster image pairs,
//! decodes the per-pixel class probabilities into a color mask, and blends
//! it with the post-disaster image for visual inspection. The model itself
//! is an opaque artifact behind the [`model::DamageModel`] trait; mask
//! generation never depends on this crate.

pub mod codec;
pub mod infer;
pub mod interactive;
pub mod model;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use damage_map_dataset::pairing;
use damage_map_dataset::progress::ProgressCallback;
use thiserror::Error;

use infer::InputShape;
use model::OnnxModel;

/// Errors from model loading and inference.
#[derive(Debug, Error)]
pub enum PredictError {
    /// The model artifact does not exist.
    #[error("Model not found at {}. Did you finish training?", path.display())]
    MissingModel {
        /// The configured model path.
        path: PathBuf,
    },

    /// Filesystem access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decode/encode failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// ONNX Runtime failure.
    #[error("Inference error: {0}")]
    Ort(#[from] ort::Error),

    /// The model returned a tensor with an unexpected shape.
    #[error("Unexpected tensor shape: {message}")]
    Shape {
        /// Description of the mismatch.
        message: String,
    },
}

/// Configuration for a prediction demo run.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Path to the trained `.onnx` artifact.
    pub model_path: PathBuf,
    /// Directory of raw `*_pre_disaster.png` / `*_post_disaster.png` pairs.
    pub images_dir: PathBuf,
    /// Directory that receives `<base>_prediction.png` and
    /// `<base>_overlay.png` per sample. Created if absent.
    pub output_dir: PathBuf,
    /// Number of samples to run, taken from the front of the sorted
    /// image list so demo runs are reproducible.
    pub samples: usize,
    /// Model input geometry.
    pub input_shape: InputShape,
}

impl DemoConfig {
    /// Creates a demo config with the default 512x512 input shape and a
    /// three-sample run.
    #[must_use]
    pub fn new(
        model_path: impl Into<PathBuf>,
        images_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            model_path: model_path.into(),
            images_dir: images_dir.into(),
            output_dir: output_dir.into(),
            samples: 3,
            input_shape: InputShape::default(),
        }
    }
}

/// Runs the demo: loads the model, predicts over the first N image pairs,
/// and writes prediction and overlay PNGs.
///
/// A failure on one sample (unreadable image, inference error) is logged
/// and skipped; it never aborts the remaining samples. Returns the number
/// of samples successfully predicted.
///
/// # Errors
///
/// Returns [`PredictError`] if the model artifact is missing or fails to
/// load, the images directory cannot be read, or the output directory
/// cannot be created.
pub fn run_demo(
    config: &DemoConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<usize, PredictError> {
    let model = OnnxModel::load(&config.model_path)?;

    let pre_images = list_pre_images(&config.images_dir)?;
    if pre_images.is_empty() {
        log::warn!(
            "No pre-disaster images found in {}",
            config.images_dir.display()
        );
        return Ok(0);
    }

    std::fs::create_dir_all(&config.output_dir)?;

    let selected: Vec<&PathBuf> = pre_images.iter().take(config.samples).collect();
    progress.set_total(selected.len() as u64);

    let mut predicted = 0;
    for pre_path in selected {
        match run_sample(&model, pre_path, config) {
            Ok(true) => predicted += 1,
            Ok(false) => {}
            Err(e) => {
                log::error!("Skipping {}: {e}", pre_path.display());
            }
        }
        progress.inc(1);
    }

    progress.finish(format!("{predicted} samples predicted"));
    log::info!("Prediction demo complete: {predicted} samples");

    Ok(predicted)
}

/// Predicts one sample and writes its outputs. Returns `Ok(false)` when
/// the post-disaster counterpart is absent.
fn run_sample(
    model: &OnnxModel,
    pre_path: &Path,
    config: &DemoConfig,
) -> Result<bool, PredictError> {
    let pre_name = pre_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let Some(post_name) = pairing::post_name_for(&pre_name) else {
        return Ok(false);
    };
    let post_path = config.images_dir.join(&post_name);
    if !post_path.exists() {
        log::debug!("{pre_name}: post-disaster image absent, skipping");
        return Ok(false);
    }

    log::info!("Running inference on {pre_name}...");

    let pre = image::open(pre_path)?;
    let post = image::open(&post_path)?;

    let prediction = infer::predict_pair(model, &pre, &post, config.input_shape)?;

    let base = post_name.trim_end_matches(".png");
    prediction
        .color
        .save(config.output_dir.join(format!("{base}_prediction.png")))?;
    prediction
        .overlay
        .save(config.output_dir.join(format!("{base}_overlay.png")))?;

    Ok(true)
}

/// Lists `*_pre_disaster.png` images in a directory, sorted by name.
fn list_pre_images(images_dir: &Path) -> Result<Vec<PathBuf>, PredictError> {
    let mut images: Vec<PathBuf> = std::fs::read_dir(images_dir)?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            let name = path.file_name()?.to_str()?;
            name.ends_with(&format!("{}.png", pairing::PRE_MARKER))
                .then_some(path)
        })
        .collect();

    images.sort();
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_is_reported_before_loading() {
        let config = DemoConfig::new(
            std::env::temp_dir().join("damage-map-no-model.onnx"),
            std::env::temp_dir(),
            std::env::temp_dir(),
        );
        assert!(matches!(
            run_demo(&config, &damage_map_dataset::progress::null_progress()),
            Err(PredictError::MissingModel { .. })
        ));
    }

    #[test]
    fn lists_only_sorted_pre_images() {
        let dir = std::env::temp_dir().join(format!(
            "damage-map-predict-list-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        for name in [
            "b_00000002_pre_disaster.png",
            "a_00000001_pre_disaster.png",
            "a_00000001_post_disaster.png",
            "a_00000001_pre_disaster.json",
        ] {
            std::fs::write(dir.join(name), b"x").unwrap();
        }

        let images = list_pre_images(&dir).unwrap();
        let names: Vec<_> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "a_00000001_pre_disaster.png",
                "b_00000002_pre_disaster.png"
            ]
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
