#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset layout for the xBD damage assessment toolchain.
//!
//! xBD scenes are paired purely by filename: pre-disaster artifacts end in
//! `_pre_disaster` and post-disaster artifacts end in `_post_disaster`,
//! sharing an otherwise identical base name. There is no manifest; the
//! substring substitution in [`pairing`] is the sole pairing mechanism and
//! must match the training dataloader exactly.

pub mod pairing;
pub mod progress;
pub mod verify;

use thiserror::Error;

/// Errors that can occur while walking the dataset on disk.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Filesystem access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required dataset directory does not exist.
    #[error("Directory not found: {}", path.display())]
    MissingDirectory {
        /// The directory that was expected to exist.
        path: std::path::PathBuf,
    },
}
