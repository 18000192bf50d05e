//! Derived-artifact naming, filtering, and scoped cleanup.
//!
//! Rotated and enhanced images are written next to their source so the
//! external decoder can read them, and must be gone by the time the decode
//! attempt that created them returns. [`TempArtifact`] ties deletion to
//! scope exit, so every return path (success, no-result, fault) cleans up.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Suffix inserted before the extension of a rotated artifact.
pub const ROTATED_SUFFIX: &str = "_rotated";

/// Suffix inserted before the extension of an enhanced artifact.
pub const ENHANCED_SUFFIX: &str = "_enhanced";

/// Input extensions accepted by the pipeline, matched case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Builds the path of a derived artifact: `photo.jpg` with `_rotated`
/// becomes `photo_rotated.jpg` in the same directory.
pub fn derived_path(original: &Path, suffix: &str) -> PathBuf {
    let stem = original
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match original.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    };
    original.with_file_name(name)
}

/// Whether the file name carries a derived-artifact marker. Used by the
/// watcher to keep the pipeline from re-ingesting its own temp outputs.
pub fn is_derived_artifact(path: &Path) -> bool {
    path.file_name()
        .map(|n| {
            let name = n.to_string_lossy();
            name.contains(ROTATED_SUFFIX) || name.contains(ENHANCED_SUFFIX)
        })
        .unwrap_or(false)
}

/// Whether the path has an accepted image extension (case-insensitive).
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e))
        })
        .unwrap_or(false)
}

/// Owns a derived image file and removes it on drop.
///
/// Cleanup failures are transient filesystem noise: they are logged and
/// never propagated.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
}

impl TempArtifact {
    /// Takes ownership of the file at `path`.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The artifact's on-disk location.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = %self.path.display(), error = %e, "failed to remove derived artifact");
        }
    }
}

/// An image reference flowing through a decode attempt: either the caller's
/// original file or a scope-owned derived artifact.
#[derive(Debug)]
pub enum ImageArtifact<'a> {
    /// The unmodified input; never deleted.
    Original(&'a Path),
    /// A derived file owned by this decode attempt.
    Derived(TempArtifact),
}

impl ImageArtifact<'_> {
    /// The path to hand to the decoder.
    pub fn path(&self) -> &Path {
        match self {
            ImageArtifact::Original(path) => path,
            ImageArtifact::Derived(artifact) => artifact.path(),
        }
    }
}
