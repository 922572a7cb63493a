// Comparison pipeline: extract both documents, then score and diff them.
//
// Both steps consume the same pair of texts and are independent; they run
// one after the other. The embedder is passed in so it's loaded once by the
// caller and reused for every comparison.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::diff::{diff_with_context, DiffReport, DEFAULT_CONTEXT_LINES};
use crate::error::CompareError;
use crate::extract::DocumentRef;
use crate::similarity::{similarity, TextEmbedder};

/// Result of comparing two documents.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    /// Cosine similarity of the two document embeddings
    pub similarity: f64,
    /// Unified line diff, File 1 → File 2
    pub diff: DiffReport,
    /// Extracted text length of each document, in characters
    pub text1_chars: usize,
    pub text2_chars: usize,
}

/// Options for a comparison. `Default` gives three lines of diff context.
#[derive(Debug, Clone, Copy)]
pub struct CompareOptions {
    pub context_lines: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            context_lines: DEFAULT_CONTEXT_LINES,
        }
    }
}

/// Extract both files and compare their text.
///
/// Both formats are validated before any file is read, so an unsupported
/// second file fails fast without parsing the first.
pub fn compare_files(
    embedder: &dyn TextEmbedder,
    path1: &Path,
    path2: &Path,
    options: CompareOptions,
) -> Result<Comparison, CompareError> {
    let doc1 = DocumentRef::new(path1)?;
    let doc2 = DocumentRef::new(path2)?;

    let text1 = doc1.extract()?;
    let text2 = doc2.extract()?;
    debug!(
        file1 = %path1.display(),
        file2 = %path2.display(),
        "Extracted both documents"
    );

    compare_texts(embedder, &text1, &text2, options)
}

/// Compare two already-extracted texts.
pub fn compare_texts(
    embedder: &dyn TextEmbedder,
    text1: &str,
    text2: &str,
    options: CompareOptions,
) -> Result<Comparison, CompareError> {
    let score =
        similarity(embedder, text1, text2).map_err(|e| CompareError::Scoring(e.into()))?;
    let diff = diff_with_context(text1, text2, options.context_lines);

    info!(
        similarity = score,
        added = diff.added(),
        removed = diff.removed(),
        "Compared documents"
    );

    Ok(Comparison {
        similarity: score,
        diff,
        text1_chars: text1.chars().count(),
        text2_chars: text2.chars().count(),
    })
}
