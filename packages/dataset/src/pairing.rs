//! Pre/post filename pairing and scene discovery.

use std::path::{Path, PathBuf};

use crate::DatasetError;

/// Marker substring for pre-disaster artifacts.
pub const PRE_MARKER: &str = "_pre_disaster";

/// Marker substring for post-disaster artifacts.
pub const POST_MARKER: &str = "_post_disaster";

/// One disaster-event location: a pre-disaster annotation document and its
/// expected post-disaster counterpart.
#[derive(Debug, Clone)]
pub struct ScenePair {
    /// Shared base name, e.g. `guatemala-volcano_00000000`.
    pub base: String,
    /// Path to the `*_pre_disaster.json` document (exists on disk).
    pub pre: PathBuf,
    /// Path to the `*_post_disaster.json` document (may be absent).
    pub post: PathBuf,
}

impl ScenePair {
    /// Output mask filename for this scene: the post-disaster base name
    /// with a `.png` extension. The mask represents the post-disaster
    /// state, so it is keyed by the post name.
    #[must_use]
    pub fn mask_name(&self) -> String {
        format!("{}{POST_MARKER}.png", self.base)
    }
}

/// Derives the post-disaster counterpart of a pre-disaster filename, e.g.
/// `x_pre_disaster.json` -> `x_post_disaster.json`. Returns `None` when
/// the name does not contain the pre-disaster marker.
#[must_use]
pub fn post_name_for(pre_name: &str) -> Option<String> {
    if pre_name.contains(PRE_MARKER) {
        Some(pre_name.replace(PRE_MARKER, POST_MARKER))
    } else {
        None
    }
}

/// Derives the pre-disaster counterpart of a post-disaster filename.
#[must_use]
pub fn pre_name_for(post_name: &str) -> Option<String> {
    if post_name.contains(POST_MARKER) {
        Some(post_name.replace(POST_MARKER, PRE_MARKER))
    } else {
        None
    }
}

/// Lists all scenes in a labels directory, sorted by base name.
///
/// A scene is discovered from its `*_pre_disaster.json` document; the post
/// path is derived by name substitution and may not exist on disk (callers
/// decide how to treat incomplete pairs).
///
/// # Errors
///
/// Returns [`DatasetError::MissingDirectory`] if `labels_dir` does not
/// exist, or [`DatasetError::Io`] if it cannot be read.
pub fn discover_scenes(labels_dir: &Path) -> Result<Vec<ScenePair>, DatasetError> {
    if !labels_dir.is_dir() {
        return Err(DatasetError::MissingDirectory {
            path: labels_dir.to_path_buf(),
        });
    }

    let mut scenes = Vec::new();

    for entry in std::fs::read_dir(labels_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(base) = name.strip_suffix(&format!("{PRE_MARKER}.json")) else {
            continue;
        };
        let Some(post_name) = post_name_for(name) else {
            continue;
        };

        scenes.push(ScenePair {
            base: base.to_string(),
            pre: path.clone(),
            post: labels_dir.join(post_name),
        });
    }

    scenes.sort_by(|a, b| a.base.cmp(&b.base));
    log::debug!(
        "Discovered {} scenes in {}",
        scenes.len(),
        labels_dir.display()
    );

    Ok(scenes)
}
