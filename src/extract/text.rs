// Plain text extraction with a lossy fallback.
//
// Files are read as UTF-8. When that fails, each invalid byte sequence is
// replaced with U+FFFD instead of failing, so an odd encoding never stops
// a comparison. Only I/O errors are fatal.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

pub fn extract(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let (text, lossy) = decode(bytes);
    if lossy {
        warn!(
            path = %path.display(),
            "File is not valid UTF-8, undecodable bytes replaced"
        );
    }
    Ok(text)
}

/// Decode bytes as UTF-8, falling back to lossy decoding.
/// Returns the text and whether the fallback was needed.
pub fn decode(bytes: Vec<u8>) -> (String, bool) {
    match String::from_utf8(bytes) {
        Ok(text) => (text, false),
        Err(err) => (String::from_utf8_lossy(err.as_bytes()).into_owned(), true),
    }
}
