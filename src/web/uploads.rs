// Transient storage for uploaded documents.
//
// Each request gets its own randomly named directory under the upload
// folder, with one subdirectory per form field so two uploads sharing a
// file name don't overwrite each other. The directory is removed when the
// UploadDir is dropped, unless retention is configured.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

pub struct UploadDir {
    path: PathBuf,
    keep: bool,
}

impl UploadDir {
    /// Create a fresh request directory under `root`.
    pub fn create(root: &Path, keep: bool) -> Result<Self> {
        let name = hex::encode(rand::random::<[u8; 8]>());
        let path = root.join(name);
        std::fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create upload directory {}", path.display()))?;
        Ok(Self { path, keep })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write an uploaded file as `<dir>/<field>/<file_name>` and return its path.
    /// `file_name` must already be sanitized.
    pub fn save(&self, field: &str, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let dir = self.path.join(field);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let dest = dir.join(file_name);
        std::fs::write(&dest, bytes)
            .with_context(|| format!("Failed to save upload to {}", dest.display()))?;
        debug!(path = %dest.display(), bytes = bytes.len(), "Saved upload");
        Ok(dest)
    }
}

impl Drop for UploadDir {
    fn drop(&mut self) {
        if self.keep {
            debug!(path = %self.path.display(), "Retaining uploaded files");
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            warn!(path = %self.path.display(), error = %e, "Failed to remove uploaded files");
        }
    }
}

/// Reduce a client-supplied file name to its final path component.
///
/// Browsers normally send a bare name, but some send a full path (and a
/// hostile client can send anything), so both separators are stripped.
/// Returns `None` when nothing usable remains.
pub fn sanitize_file_name(raw: &str) -> Option<String> {
    let name: String = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .chars()
        .filter(|c| !c.is_control())
        .collect();
    let name = name.trim();
    match name {
        "" | "." | ".." => None,
        _ => Some(name.to_string()),
    }
}
