//! Damage classification for building footprints.
//!
//! xBD labels each post-disaster building with a damage subtype string.
//! Masks store these as small integers so a single-channel raster can
//! hold the full classification.

use std::collections::BTreeMap;

/// Per-pixel damage classification, stored as the raw pixel value in
/// generated masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum DamageClass {
    /// No building at this pixel.
    Background = 0,
    /// Undamaged building. Also the fallback for buildings present in the
    /// pre-disaster document but missing from the post-disaster document,
    /// and for the `"un-classified"` subtype.
    NoDamage = 1,
    MinorDamage = 2,
    MajorDamage = 3,
    Destroyed = 4,
}

impl DamageClass {
    /// All classes, in pixel-value order.
    pub const ALL: &[Self] = &[
        Self::Background,
        Self::NoDamage,
        Self::MinorDamage,
        Self::MajorDamage,
        Self::Destroyed,
    ];

    /// The raw pixel value written into masks.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a raw pixel value back to a class. Values above 4 do not
    /// occur in valid masks and are clamped to [`Self::Destroyed`].
    #[must_use]
    pub const fn from_pixel(value: u8) -> Self {
        match value {
            0 => Self::Background,
            1 => Self::NoDamage,
            2 => Self::MinorDamage,
            3 => Self::MajorDamage,
            _ => Self::Destroyed,
        }
    }

    /// Human-readable label, matching the xBD subtype strings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::NoDamage => "no-damage",
            Self::MinorDamage => "minor-damage",
            Self::MajorDamage => "major-damage",
            Self::Destroyed => "destroyed",
        }
    }
}

/// Lookup table from xBD subtype strings to damage classes.
///
/// The default table is the fixed xBD mapping. Tests (or alternative
/// datasets) can inject their own entries instead of relying on globals.
#[derive(Debug, Clone)]
pub struct DamageClassTable {
    entries: BTreeMap<String, DamageClass>,
}

impl Default for DamageClassTable {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert("background".to_string(), DamageClass::Background);
        entries.insert("no-damage".to_string(), DamageClass::NoDamage);
        entries.insert("minor-damage".to_string(), DamageClass::MinorDamage);
        entries.insert("major-damage".to_string(), DamageClass::MajorDamage);
        entries.insert("destroyed".to_string(), DamageClass::Destroyed);
        // Treat unclassified buildings as undamaged, per standard xBD practice.
        entries.insert("un-classified".to_string(), DamageClass::NoDamage);
        Self { entries }
    }
}

impl DamageClassTable {
    /// Builds a table from explicit entries.
    #[must_use]
    pub fn from_entries(entries: BTreeMap<String, DamageClass>) -> Self {
        Self { entries }
    }

    /// Resolves a subtype string from a post-disaster document.
    ///
    /// An absent subtype field defaults to no-damage; a subtype string not
    /// present in the table maps to background.
    #[must_use]
    pub fn class_for(&self, subtype: Option<&str>) -> DamageClass {
        match subtype {
            None => DamageClass::NoDamage,
            Some(s) => self
                .entries
                .get(s)
                .copied()
                .unwrap_or(DamageClass::Background),
        }
    }
}
