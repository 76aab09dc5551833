//! Damage-class color codec.
//!
//! Fixed mapping between class indices and display colors, used only for
//! visualization. Masks on disk always store raw class indices, never
//! colors.

use damage_map_masks_models::damage::DamageClass;
use image::{GrayImage, Rgb, RgbImage};

/// Display color for a damage class.
#[must_use]
pub const fn class_color(class: DamageClass) -> Rgb<u8> {
    match class {
        DamageClass::Background => Rgb([0, 0, 0]),
        DamageClass::NoDamage => Rgb([0, 255, 0]),
        DamageClass::MinorDamage => Rgb([255, 255, 0]),
        DamageClass::MajorDamage => Rgb([255, 165, 0]),
        DamageClass::Destroyed => Rgb([255, 0, 0]),
    }
}

/// Display color for a raw pixel value. Values above 4 violate the mask
/// contract; they are clamped to the destroyed color rather than panicking,
/// so a corrupt mask still renders visibly.
#[must_use]
pub const fn pixel_color(value: u8) -> Rgb<u8> {
    class_color(DamageClass::from_pixel(value))
}

/// Converts a class-index mask into an RGB image via the color table.
#[must_use]
pub fn decode_mask(mask: &GrayImage) -> RgbImage {
    let mut rgb = RgbImage::new(mask.width(), mask.height());
    for (x, y, pixel) in mask.enumerate_pixels() {
        rgb.put_pixel(x, y, pixel_color(pixel[0]));
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn fixed_color_table() {
        assert_eq!(class_color(DamageClass::Background), Rgb([0, 0, 0]));
        assert_eq!(class_color(DamageClass::NoDamage), Rgb([0, 255, 0]));
        assert_eq!(class_color(DamageClass::MinorDamage), Rgb([255, 255, 0]));
        assert_eq!(class_color(DamageClass::MajorDamage), Rgb([255, 165, 0]));
        assert_eq!(class_color(DamageClass::Destroyed), Rgb([255, 0, 0]));
    }

    #[test]
    fn out_of_range_pixel_clamps_to_destroyed() {
        assert_eq!(pixel_color(7), Rgb([255, 0, 0]));
    }

    #[test]
    fn decodes_every_pixel() {
        let mut mask = GrayImage::new(2, 2);
        mask.put_pixel(0, 0, Luma([0]));
        mask.put_pixel(1, 0, Luma([1]));
        mask.put_pixel(0, 1, Luma([4]));
        mask.put_pixel(1, 1, Luma([2]));

        let rgb = decode_mask(&mask);
        assert_eq!(*rgb.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*rgb.get_pixel(1, 0), Rgb([0, 255, 0]));
        assert_eq!(*rgb.get_pixel(0, 1), Rgb([255, 0, 0]));
        assert_eq!(*rgb.get_pixel(1, 1), Rgb([255, 255, 0]));
    }
}
