// Model download helper.
//
// Fetches all-MiniLM-L6-v2 (ONNX export + tokenizer, ~90MB) from
// HuggingFace into a platform-appropriate data directory
// (~/.local/share/doccmp/models/ on Linux) so it persists across runs.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// HuggingFace repo for the sentence embedding model.
const EMBEDDING_HF_URL: &str =
    "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main";

/// Name of the model's subdirectory inside the model dir.
const EMBEDDING_MODEL_NAME: &str = "all-MiniLM-L6-v2";

/// (remote path, local file name, show progress)
const EMBEDDING_FILES: [(&str, &str, bool); 2] = [
    ("tokenizer.json", "tokenizer.json", false),
    ("onnx/model.onnx", "model.onnx", true),
];

/// Returns the default directory for storing model files.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("doccmp")
        .join("models")
}

/// Subdirectory within the model dir holding the sentence embedding model.
pub fn embedding_model_dir(base: &Path) -> PathBuf {
    base.join(EMBEDDING_MODEL_NAME)
}

/// Check whether the model and tokenizer files exist.
pub fn embedding_files_present(base: &Path) -> bool {
    let dir = embedding_model_dir(base);
    EMBEDDING_FILES
        .iter()
        .all(|(_, local, _)| dir.join(local).exists())
}

/// Download the sentence embedding model into `base`.
///
/// Skips files that already exist. Creates directories as needed.
pub async fn download_model(base: &Path) -> Result<()> {
    let dir = embedding_model_dir(base);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create model directory: {}", dir.display()))?;

    println!("\nSentence embedding model ({EMBEDDING_MODEL_NAME}):");

    let client = reqwest::Client::new();
    for (remote, local, show_progress) in EMBEDDING_FILES {
        let dest = dir.join(local);
        if dest.exists() {
            info!(file = local, "Model file already exists, skipping");
            println!("  {local} (already exists)");
            continue;
        }
        println!("  Downloading {local}...");
        download_file(
            &client,
            &format!("{EMBEDDING_HF_URL}/{remote}"),
            &dest,
            show_progress,
        )
        .await?;
    }

    Ok(())
}

/// Stream a single file from `url` to `dest`.
///
/// Writes to a `.part` file first and renames on completion, so an
/// interrupted download never leaves a truncated model behind that
/// `embedding_files_present` would accept.
async fn download_file(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    show_progress: bool,
) -> Result<()> {
    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status {}: {}", response.status(), url);
    }

    let pb = show_progress.then(|| progress_bar(response.content_length()));

    let partial = dest.with_extension("part");
    let mut file = std::fs::File::create(&partial)
        .with_context(|| format!("Failed to create {}", partial.display()))?;
    let mut written: u64 = 0;
    while let Some(chunk) = response
        .chunk()
        .await
        .with_context(|| format!("Failed to read response body from {}", url))?
    {
        file.write_all(&chunk)
            .with_context(|| format!("Failed to write {}", partial.display()))?;
        written += chunk.len() as u64;
        if let Some(ref pb) = pb {
            pb.set_position(written);
        }
    }
    file.flush()
        .with_context(|| format!("Failed to write {}", partial.display()))?;
    drop(file);

    std::fs::rename(&partial, dest)
        .with_context(|| format!("Failed to move download into {}", dest.display()))?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    info!("Downloaded {} to {}", url, dest.display());
    Ok(())
}

fn progress_bar(total: Option<u64>) -> ProgressBar {
    match total {
        Some(size) => {
            let pb = ProgressBar::new(size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("    [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("    {spinner} {bytes}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb
        }
    }
}
