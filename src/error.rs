// Typed errors for the comparison pipeline.
//
// Extractors work with anyhow internally and attach context as they go.
// The dispatcher folds any extractor failure into ExtractionFailed so callers
// (CLI, web) can tell "bad input" apart from "we don't handle this format".

use std::error::Error as StdError;
use std::path::PathBuf;

/// Boxed cause carried by extraction and scoring failures.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    /// One or both documents were not supplied.
    #[error("missing input: {0}")]
    MissingInput(String),

    /// The file extension is not in the dispatch table.
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// The format-specific parser failed (corrupt file, wrong structure, I/O).
    #[error("failed to extract text from {}", path.display())]
    ExtractionFailed {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// The embedding model failed while encoding a document.
    #[error("similarity scoring failed")]
    Scoring(#[source] BoxError),
}

impl CompareError {
    /// HTTP status the upload boundary reports for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            CompareError::MissingInput(_) => 400,
            _ => 500,
        }
    }

    pub(crate) fn extraction(path: impl Into<PathBuf>, err: anyhow::Error) -> Self {
        CompareError::ExtractionFailed {
            path: path.into(),
            source: err.into(),
        }
    }
}

/// Render an error and all of its causes as one line, joined by ": ".
///
/// Display on a thiserror enum only shows the outermost message; the
/// underlying parser error is usually what the user needs to see.
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        let msg = cause.to_string();
        // anyhow contexts can repeat the inner message verbatim
        if !out.ends_with(&msg) {
            out.push_str(": ");
            out.push_str(&msg);
        }
        current = cause.source();
    }
    out
}
