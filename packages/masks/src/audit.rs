//! Spot-check of generated masks.
//!
//! Reads a mask back from disk and reports the distinct class values it
//! contains, confirming nothing outside the valid {0..4} range was written.

use std::collections::BTreeSet;
use std::path::Path;

use crate::MaskError;
use damage_map_masks_models::damage::DamageClass;

/// Distinct class values found in a mask file.
#[derive(Debug, Clone)]
pub struct MaskAudit {
    /// Sorted distinct pixel values.
    pub values: Vec<u8>,
}

impl MaskAudit {
    /// True when every pixel value is a valid damage class.
    #[must_use]
    pub fn all_valid(&self) -> bool {
        self.values.iter().all(|&v| v <= DamageClass::Destroyed.as_u8())
    }

    /// Labels for the classes present, for display.
    #[must_use]
    pub fn labels(&self) -> Vec<&'static str> {
        self.values
            .iter()
            .map(|&v| DamageClass::from_pixel(v).label())
            .collect()
    }
}

/// Reads a mask and collects its distinct pixel values.
///
/// # Errors
///
/// Returns [`MaskError`] if the file cannot be read or decoded.
pub fn audit_mask(path: &Path) -> Result<MaskAudit, MaskError> {
    let mask = image::open(path)?.into_luma8();

    let values: BTreeSet<u8> = mask.pixels().map(|p| p[0]).collect();

    Ok(MaskAudit {
        values: values.into_iter().collect(),
    })
}
