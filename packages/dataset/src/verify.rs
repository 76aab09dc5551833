//! Dataset path verification.
//!
//! Confirms that the raw image directory and the generated mask directory
//! contain what the training dataloader expects, and that the filename
//! pairing convention holds for a sample. Returns a structured report so
//! callers (CLI, tests) decide how to present it.

use std::path::{Path, PathBuf};

use crate::pairing::{self, PRE_MARKER};

/// Result of checking one expected image/mask pairing.
#[derive(Debug, Clone)]
pub struct PairingCheck {
    /// The sampled pre-disaster image filename.
    pub image: String,
    /// The mask filename derived from it.
    pub expected_mask: String,
    /// Whether that mask exists on disk.
    pub matched: bool,
}

/// Outcome of a dataset verification pass.
#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    /// Whether the raw image directory exists.
    pub images_dir_exists: bool,
    /// Number of `*_pre_disaster.png` images found.
    pub pre_image_count: usize,
    /// Whether the mask directory exists.
    pub masks_dir_exists: bool,
    /// Number of `*.png` masks found.
    pub mask_count: usize,
    /// Pairing check on the first image, when both directories have content.
    pub pairing: Option<PairingCheck>,
}

impl VerifyReport {
    /// True when every check passed: both directories exist, both are
    /// non-empty, and the sampled pairing matched.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.images_dir_exists
            && self.masks_dir_exists
            && self.pre_image_count > 0
            && self.mask_count > 0
            && self.pairing.as_ref().is_some_and(|p| p.matched)
    }
}

/// Verifies the image and mask directories and the pairing convention.
///
/// Never fails: missing directories are reported, not returned as errors,
/// since the whole point of this check is to diagnose a broken layout.
#[must_use]
pub fn verify(images_dir: &Path, masks_dir: &Path) -> VerifyReport {
    let mut report = VerifyReport {
        images_dir_exists: images_dir.is_dir(),
        masks_dir_exists: masks_dir.is_dir(),
        ..VerifyReport::default()
    };

    let mut pre_images = if report.images_dir_exists {
        list_png(images_dir, Some(PRE_MARKER))
    } else {
        log::error!("Raw image directory does not exist: {}", images_dir.display());
        Vec::new()
    };
    pre_images.sort();
    report.pre_image_count = pre_images.len();

    let masks = if report.masks_dir_exists {
        list_png(masks_dir, None)
    } else {
        log::error!(
            "Mask directory does not exist: {} (was mask generation run?)",
            masks_dir.display()
        );
        Vec::new()
    };
    report.mask_count = masks.len();

    if let Some(first) = pre_images.first()
        && report.mask_count > 0
    {
        let image = first
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        // Same substitution the dataloader performs: the mask carries the
        // post-disaster name.
        if let Some(expected_mask) = pairing::post_name_for(&image) {
            let matched = masks_dir.join(&expected_mask).exists();
            report.pairing = Some(PairingCheck {
                image,
                expected_mask,
                matched,
            });
        }
    }

    report
}

/// Lists `*.png` files in a directory, optionally requiring a marker
/// substring in the filename.
fn list_png(dir: &Path, marker: Option<&str>) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    entries
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            let name = path.file_name()?.to_str()?;
            if !name.ends_with(".png") {
                return None;
            }
            if let Some(m) = marker
                && !name.contains(m)
            {
                return None;
            }
            Some(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dirs(tag: &str) -> (PathBuf, PathBuf) {
        let root = std::env::temp_dir().join(format!(
            "damage-map-verify-{tag}-{}",
            std::process::id()
        ));
        let images = root.join("images");
        let masks = root.join("masks");
        std::fs::create_dir_all(&images).unwrap();
        std::fs::create_dir_all(&masks).unwrap();
        (images, masks)
    }

    #[test]
    fn reports_matched_pairing() {
        let (images, masks) = temp_dirs("ok");
        std::fs::write(images.join("fire_00000001_pre_disaster.png"), b"x").unwrap();
        std::fs::write(masks.join("fire_00000001_post_disaster.png"), b"x").unwrap();

        let report = verify(&images, &masks);
        assert!(report.is_ok());
        assert_eq!(report.pre_image_count, 1);
        assert_eq!(report.mask_count, 1);
        let pairing = report.pairing.unwrap();
        assert_eq!(pairing.expected_mask, "fire_00000001_post_disaster.png");
        assert!(pairing.matched);

        std::fs::remove_dir_all(images.parent().unwrap()).unwrap();
    }

    #[test]
    fn reports_missing_mask() {
        let (images, masks) = temp_dirs("missing");
        std::fs::write(images.join("fire_00000001_pre_disaster.png"), b"x").unwrap();
        std::fs::write(masks.join("flood_00000009_post_disaster.png"), b"x").unwrap();

        let report = verify(&images, &masks);
        assert!(!report.is_ok());
        assert!(!report.pairing.unwrap().matched);

        std::fs::remove_dir_all(images.parent().unwrap()).unwrap();
    }

    #[test]
    fn missing_directories_do_not_panic() {
        let root = std::env::temp_dir().join("damage-map-verify-nonexistent");
        let report = verify(&root.join("images"), &root.join("masks"));
        assert!(!report.images_dir_exists);
        assert!(!report.masks_dir_exists);
        assert!(!report.is_ok());
    }

    #[test]
    fn post_images_are_not_counted() {
        let (images, masks) = temp_dirs("filter");
        std::fs::write(images.join("fire_00000001_pre_disaster.png"), b"x").unwrap();
        std::fs::write(images.join("fire_00000001_post_disaster.png"), b"x").unwrap();

        let report = verify(&images, &masks);
        assert_eq!(report.pre_image_count, 1);

        std::fs::remove_dir_all(images.parent().unwrap()).unwrap();
    }
}
