#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Training mask generation for the xBD damage assessment dataset.
//!
//! Joins each scene's pre-disaster annotation document (building geometry)
//! with its post-disaster document (damage classification) on the building
//! `uid`, rasterizes the result into a single-channel class-index image,
//! and writes one mask per scene into a flat output directory.
//!
//! Batch processing never aborts on a bad scene: per-scene problems are
//! reported as [`SceneOutcome`] values and aggregated into a
//! [`BatchSummary`] so callers can log counts.

pub mod audit;
pub mod interactive;
pub mod rasterize;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use damage_map_dataset::DatasetError;
use damage_map_dataset::pairing::{self, ScenePair};
use damage_map_dataset::progress::ProgressCallback;
use damage_map_masks_models::annotation::AnnotationDocument;
use damage_map_masks_models::damage::DamageClassTable;
use thiserror::Error;

/// Errors that halt mask generation entirely.
///
/// Per-scene recoverable conditions (missing pair, malformed document) are
/// not errors; they surface as [`SceneOutcome`] variants instead.
#[derive(Debug, Error)]
pub enum MaskError {
    /// Filesystem access failed (including mask output writes).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset discovery failed (e.g. the labels directory is absent).
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Mask encoding failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Configuration for one mask-generation run.
///
/// Explicit rather than global so tests can inject synthetic directories,
/// dimensions, and class tables.
#[derive(Debug, Clone)]
pub struct MaskJobConfig {
    /// Directory containing `*_pre_disaster.json` / `*_post_disaster.json`
    /// annotation documents.
    pub labels_dir: PathBuf,
    /// Flat directory that receives one mask PNG per scene. Created if
    /// absent.
    pub output_dir: PathBuf,
    /// Output mask width in pixels.
    pub width: u32,
    /// Output mask height in pixels.
    pub height: u32,
    /// Subtype-string-to-class lookup table.
    pub classes: DamageClassTable,
}

impl MaskJobConfig {
    /// xBD imagery is 1024x1024, so masks default to the same size.
    pub const DEFAULT_SIZE: u32 = 1024;

    /// Creates a config with the standard xBD dimensions and class table.
    #[must_use]
    pub fn new(labels_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            labels_dir: labels_dir.into(),
            output_dir: output_dir.into(),
            width: Self::DEFAULT_SIZE,
            height: Self::DEFAULT_SIZE,
            classes: DamageClassTable::default(),
        }
    }
}

/// Per-scene result of mask generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneOutcome {
    /// A mask was written for this scene.
    Generated,
    /// The post-disaster document is absent; no output, not an error.
    SkippedMissingPair,
    /// One of the scene's documents failed to parse; logged and skipped.
    SkippedMalformed,
}

/// Aggregated outcome counts for a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub generated: usize,
    pub skipped_missing_pair: usize,
    pub skipped_malformed: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: SceneOutcome) {
        match outcome {
            SceneOutcome::Generated => self.generated += 1,
            SceneOutcome::SkippedMissingPair => self.skipped_missing_pair += 1,
            SceneOutcome::SkippedMalformed => self.skipped_malformed += 1,
        }
    }

    /// Total scenes examined.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.generated + self.skipped_missing_pair + self.skipped_malformed
    }
}

/// Generates masks for every scene in the configured labels directory.
///
/// Scenes are processed in sorted order. A single bad scene never aborts
/// the batch; re-running on unchanged inputs overwrites each mask with
/// byte-identical output.
///
/// # Errors
///
/// Returns [`MaskError`] if the labels directory is missing, the output
/// directory cannot be created, or a mask file cannot be written. Per-scene
/// parse failures are counted in the returned [`BatchSummary`] instead.
pub fn generate_all(
    config: &MaskJobConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<BatchSummary, MaskError> {
    let start = Instant::now();

    let scenes = pairing::discover_scenes(&config.labels_dir)?;
    log::info!(
        "Found {} scenes to process in {}",
        scenes.len(),
        config.labels_dir.display()
    );
    if scenes.is_empty() {
        log::warn!(
            "No annotation documents found in {}; check the labels path",
            config.labels_dir.display()
        );
    }

    std::fs::create_dir_all(&config.output_dir)?;

    progress.set_total(scenes.len() as u64);

    let mut summary = BatchSummary::default();
    for scene in &scenes {
        let outcome = generate_scene(scene, config)?;
        summary.record(outcome);
        progress.inc(1);
    }

    progress.finish(format!("{} masks written", summary.generated));
    log::info!(
        "Mask generation complete: {} written, {} missing pair, {} malformed ({:.1}s)",
        summary.generated,
        summary.skipped_missing_pair,
        summary.skipped_malformed,
        start.elapsed().as_secs_f64()
    );

    Ok(summary)
}

/// Generates the mask for a single scene.
///
/// # Errors
///
/// Returns [`MaskError`] only for output I/O failures; input problems are
/// reported through the returned [`SceneOutcome`].
pub fn generate_scene(
    scene: &ScenePair,
    config: &MaskJobConfig,
) -> Result<SceneOutcome, MaskError> {
    if !scene.post.exists() {
        log::debug!("{}: post-disaster document absent, skipping", scene.base);
        return Ok(SceneOutcome::SkippedMissingPair);
    }

    let Some(pre_doc) = parse_document(&scene.pre) else {
        return Ok(SceneOutcome::SkippedMalformed);
    };
    let Some(post_doc) = parse_document(&scene.post) else {
        return Ok(SceneOutcome::SkippedMalformed);
    };

    let mask = rasterize::render_mask(&pre_doc, &post_doc, config);
    let output_path = config.output_dir.join(scene.mask_name());
    write_mask_atomic(&mask, &output_path)?;

    Ok(SceneOutcome::Generated)
}

/// Parses an annotation document, logging and returning `None` on failure
/// so the caller can skip the scene.
fn parse_document(path: &Path) -> Option<AnnotationDocument> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Error reading {}: {e}", path.display());
            return None;
        }
    };

    match serde_json::from_str(&contents) {
        Ok(doc) => Some(doc),
        Err(e) => {
            log::warn!("Error parsing {}: {e}", path.display());
            None
        }
    }
}

/// Writes a mask PNG atomically: encode to a temporary sibling file, then
/// rename over the final path. An interrupted batch never leaves a partial
/// mask behind.
fn write_mask_atomic(mask: &image::GrayImage, path: &Path) -> Result<(), MaskError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    mask.save_with_format(&tmp, image::ImageFormat::Png)?;
    std::fs::rename(&tmp, path)?;

    Ok(())
}
