//! Pre/post image preprocessing, arg-max decoding, and overlay blending.

use damage_map_masks_models::damage::DamageClass;
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use ndarray::Array4;

use crate::codec;
use crate::model::DamageModel;
use crate::PredictError;

/// Blend weight of the source image in the overlay (the mask gets the
/// remainder). Colored buildings pop while the imagery stays readable.
pub const OVERLAY_IMAGE_WEIGHT: f32 = 0.7;

/// Model input geometry.
#[derive(Debug, Clone, Copy)]
pub struct InputShape {
    pub width: u32,
    pub height: u32,
}

impl Default for InputShape {
    /// The trained model takes 512x512 inputs (half the native xBD tile).
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
        }
    }
}

/// Everything produced for one pre/post sample.
pub struct SamplePrediction {
    /// Per-pixel class indices at model resolution.
    pub mask: GrayImage,
    /// The mask decoded through the color codec.
    pub color: RgbImage,
    /// 70% post-disaster image, 30% color mask.
    pub overlay: RgbImage,
}

/// Resizes an image to the model input shape, keeping u8 RGB.
#[must_use]
pub fn resize_to_input(image: &DynamicImage, shape: InputShape) -> RgbImage {
    image
        .resize_exact(shape.width, shape.height, FilterType::Triangle)
        .to_rgb8()
}

/// Converts an RGB image into a normalized NHWC batch of size 1.
#[must_use]
pub fn image_to_batch(image: &RgbImage) -> Array4<f32> {
    let (width, height) = image.dimensions();
    Array4::from_shape_fn(
        (1, height as usize, width as usize, 3),
        |(_, y, x, channel)| {
            #[allow(clippy::cast_possible_truncation)]
            let pixel = image.get_pixel(x as u32, y as u32);
            f32::from(pixel[channel]) / 255.0
        },
    )
}

/// Reduces a `(1, height, width, classes)` probability tensor to a
/// class-index mask via arg-max over the class axis.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn class_mask_from_probabilities(probabilities: &Array4<f32>) -> GrayImage {
    let shape = probabilities.shape();
    let (height, width, classes) = (shape[1], shape[2], shape[3]);

    let mut mask = GrayImage::new(width as u32, height as u32);
    for y in 0..height {
        for x in 0..width {
            let mut best = 0u8;
            let mut best_prob = f32::MIN;
            for class in 0..classes {
                let prob = probabilities[[0, y, x, class]];
                if prob > best_prob {
                    best_prob = prob;
                    best = class as u8;
                }
            }
            mask.put_pixel(x as u32, y as u32, Luma([best]));
        }
    }

    mask
}

/// Blends the post-disaster image with the colored prediction mask.
///
/// Matches the reference weighting: 70% original imagery, 30% mask. The
/// black background darkens the image slightly while colored buildings
/// stand out.
#[must_use]
pub fn blend_overlay(base: &RgbImage, mask_rgb: &RgbImage) -> RgbImage {
    let mut overlay = RgbImage::new(base.width(), base.height());
    for (x, y, pixel) in overlay.enumerate_pixels_mut() {
        let b = base.get_pixel(x, y);
        let m = mask_rgb.get_pixel(x, y);
        let mut channels = [0u8; 3];
        for (i, channel) in channels.iter_mut().enumerate() {
            let blended = OVERLAY_IMAGE_WEIGHT.mul_add(
                f32::from(b[i]),
                (1.0 - OVERLAY_IMAGE_WEIGHT) * f32::from(m[i]),
            );
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                *channel = blended.round().clamp(0.0, 255.0) as u8;
            }
        }
        *pixel = Rgb(channels);
    }
    overlay
}

/// Runs the full inference pipeline on one pre/post image pair.
///
/// # Errors
///
/// Returns [`PredictError`] if the model fails or returns a tensor whose
/// spatial dimensions do not match the input shape.
pub fn predict_pair(
    model: &dyn DamageModel,
    pre: &DynamicImage,
    post: &DynamicImage,
    shape: InputShape,
) -> Result<SamplePrediction, PredictError> {
    let pre_resized = resize_to_input(pre, shape);
    let post_resized = resize_to_input(post, shape);

    let pre_batch = image_to_batch(&pre_resized);
    let post_batch = image_to_batch(&post_resized);

    let probabilities = model.predict(&pre_batch, &post_batch)?;

    let expected_classes = DamageClass::ALL.len();
    let dims = probabilities.shape();
    if dims[0] != 1 || dims[3] != expected_classes {
        return Err(PredictError::Shape {
            message: format!(
                "expected (1, h, w, {expected_classes}) probabilities, got {dims:?}"
            ),
        });
    }

    let mask = class_mask_from_probabilities(&probabilities);
    let color = codec::decode_mask(&mask);
    let overlay = blend_overlay(&post_resized, &color);

    Ok(SamplePrediction {
        mask,
        color,
        overlay,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Model stub that marks every pixel with a fixed class.
    struct ConstantModel {
        class: usize,
    }

    impl DamageModel for ConstantModel {
        fn predict(
            &self,
            pre: &Array4<f32>,
            _post: &Array4<f32>,
        ) -> Result<Array4<f32>, PredictError> {
            let shape = pre.shape();
            let mut probs = Array4::zeros((1, shape[1], shape[2], 5));
            for y in 0..shape[1] {
                for x in 0..shape[2] {
                    probs[[0, y, x, self.class]] = 1.0;
                }
            }
            Ok(probs)
        }
    }

    #[test]
    fn argmax_picks_highest_probability_class() {
        let mut probs = Array4::zeros((1, 1, 2, 5));
        probs[[0, 0, 0, 3]] = 0.9;
        probs[[0, 0, 0, 1]] = 0.1;
        probs[[0, 0, 1, 0]] = 0.6;
        probs[[0, 0, 1, 4]] = 0.4;

        let mask = class_mask_from_probabilities(&probs);
        assert_eq!(mask.get_pixel(0, 0)[0], 3);
        assert_eq!(mask.get_pixel(1, 0)[0], 0);
    }

    #[test]
    fn batch_is_normalized_nhwc() {
        let mut image = RgbImage::new(2, 1);
        image.put_pixel(0, 0, Rgb([255, 0, 51]));
        image.put_pixel(1, 0, Rgb([0, 255, 0]));

        let batch = image_to_batch(&image);
        assert_eq!(batch.shape(), &[1, 1, 2, 3]);
        assert!((batch[[0, 0, 0, 0]] - 1.0).abs() < f32::EPSILON);
        assert!((batch[[0, 0, 0, 2]] - 0.2).abs() < f32::EPSILON);
        assert!((batch[[0, 0, 1, 1]] - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn overlay_uses_seventy_thirty_weights() {
        let mut base = RgbImage::new(1, 1);
        base.put_pixel(0, 0, Rgb([100, 100, 100]));
        let mut mask = RgbImage::new(1, 1);
        mask.put_pixel(0, 0, Rgb([0, 255, 0]));

        let overlay = blend_overlay(&base, &mask);
        // 0.7 * 100 + 0.3 * 0 = 70; 0.7 * 100 + 0.3 * 255 = 146.5 -> 147
        assert_eq!(*overlay.get_pixel(0, 0), Rgb([70, 147, 70]));
    }

    #[test]
    fn predict_pair_produces_model_resolution_outputs() {
        let model = ConstantModel { class: 4 };
        let pre = DynamicImage::new_rgb8(64, 64);
        let post = DynamicImage::new_rgb8(64, 64);
        let shape = InputShape {
            width: 16,
            height: 16,
        };

        let prediction = predict_pair(&model, &pre, &post, shape).unwrap();
        assert_eq!(prediction.mask.dimensions(), (16, 16));
        assert_eq!(prediction.color.dimensions(), (16, 16));
        assert_eq!(prediction.overlay.dimensions(), (16, 16));
        assert!(prediction.mask.pixels().all(|p| p[0] == 4));
        assert_eq!(*prediction.color.get_pixel(0, 0), Rgb([255, 0, 0]));
        // Black post image blended with red mask: 0.3 * 255 = 76.5 -> 77
        assert_eq!(*prediction.overlay.get_pixel(0, 0), Rgb([77, 0, 0]));
    }
}
