#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Data types shared across the damage map toolchain: damage classes and
//! the xBD annotation document structure.

pub mod annotation;
pub mod damage;

pub use annotation::{AnnotationDocument, Feature, FeatureProperties};
pub use damage::{DamageClass, DamageClassTable};
