use std::env;
use std::path::PathBuf;

use anyhow::Result;

use crate::diff::DEFAULT_CONTEXT_LINES;

/// Default request body limit for the upload form, in megabytes.
pub const DEFAULT_MAX_UPLOAD_MB: usize = 32;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the sentence embedding model (DOCCMP_MODEL_DIR)
    pub model_dir: PathBuf,
    /// Where the web form saves uploaded documents (DOCCMP_UPLOAD_DIR)
    pub upload_dir: PathBuf,
    /// Keep uploaded files after the comparison instead of deleting them
    pub keep_uploads: bool,
    /// Lines of unchanged context around each diff hunk
    pub diff_context: usize,
    /// Maximum accepted upload request size in megabytes
    pub max_upload_mb: usize,
}

impl Config {
    /// Load configuration from environment variables. Everything has a default.
    pub fn load() -> Result<Self> {
        let model_dir = env::var("DOCCMP_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::similarity::download::default_model_dir());

        let diff_context = match env::var("DOCCMP_DIFF_CONTEXT") {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                anyhow::anyhow!("DOCCMP_DIFF_CONTEXT must be a non-negative integer, got {raw:?}")
            })?,
            Err(_) => DEFAULT_CONTEXT_LINES,
        };

        let max_upload_mb = match env::var("DOCCMP_MAX_UPLOAD_MB") {
            Ok(raw) => parse_upload_limit(&raw)?,
            Err(_) => DEFAULT_MAX_UPLOAD_MB,
        };

        Ok(Self {
            model_dir,
            upload_dir: env::var("DOCCMP_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./uploads")),
            keep_uploads: env::var("DOCCMP_KEEP_UPLOADS")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            diff_context,
            max_upload_mb,
        })
    }

    /// Check that the embedding model has been downloaded.
    /// Call this before anything that computes a similarity score.
    pub fn require_model(&self) -> Result<()> {
        if !crate::similarity::download::embedding_files_present(&self.model_dir) {
            anyhow::bail!(
                "Embedding model files not found in {}\n\
                 Run `doccmp download-model` to download them.",
                crate::similarity::download::embedding_model_dir(&self.model_dir).display()
            );
        }
        Ok(())
    }
}

/// A zero limit would reject every upload, so it's refused here.
fn parse_upload_limit(raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(mb) if mb > 0 => Ok(mb),
        _ => anyhow::bail!("DOCCMP_MAX_UPLOAD_MB must be a positive integer, got {raw:?}"),
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
