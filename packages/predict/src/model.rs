//! The trained-model seam.
//!
//! The segmentation model is an external artifact, opaque to this crate: a
//! function from a pair of fixed-size RGB batches to a per-pixel 5-class
//! probability tensor. [`DamageModel`] keeps the rest of the pipeline
//! independent of any particular runtime, and [`OnnxModel`] provides the
//! ONNX Runtime implementation.

use std::path::Path;

use ndarray::{Array4, Ix4};
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;

use crate::PredictError;

/// A trained damage segmentation model.
///
/// Inputs are NHWC batches of size 1 with values in [0, 1]; the output is a
/// `(1, height, width, classes)` probability tensor.
pub trait DamageModel {
    /// Runs the model on a pre/post image pair.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError`] if inference fails or the output tensor has
    /// an unexpected shape.
    fn predict(&self, pre: &Array4<f32>, post: &Array4<f32>) -> Result<Array4<f32>, PredictError>;
}

/// ONNX Runtime backed [`DamageModel`].
pub struct OnnxModel {
    session: Session,
}

impl OnnxModel {
    /// Loads a model from an `.onnx` file.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::MissingModel`] if the artifact does not
    /// exist (checked up front for a clear diagnostic), or
    /// [`PredictError::Ort`] if the session cannot be built.
    pub fn load(path: &Path) -> Result<Self, PredictError> {
        if !path.is_file() {
            return Err(PredictError::MissingModel {
                path: path.to_path_buf(),
            });
        }

        log::info!("Loading model from {}", path.display());
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(path)?;

        Ok(Self { session })
    }
}

impl DamageModel for OnnxModel {
    fn predict(&self, pre: &Array4<f32>, post: &Array4<f32>) -> Result<Array4<f32>, PredictError> {
        // Inputs are bound positionally: the exported model takes the
        // pre-disaster batch first, then the post-disaster batch.
        let inputs = ort::inputs![pre.view(), post.view()]?;
        let outputs = self.session.run(inputs)?;

        let output_name = self
            .session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| PredictError::Shape {
                message: "model has no outputs".to_string(),
            })?;

        let probabilities = outputs[output_name.as_str()].try_extract_tensor::<f32>()?;

        probabilities
            .view()
            .to_owned()
            .into_dimensionality::<Ix4>()
            .map_err(|e| PredictError::Shape {
                message: format!("expected (batch, height, width, classes) output: {e}"),
            })
    }
}
