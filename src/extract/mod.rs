// Text extraction: one extractor per document format, dispatched by extension.
//
// The extension is authoritative: there is no content sniffing. A .docx that
// is really a PDF fails inside the Word extractor with ExtractionFailed rather
// than being silently re-routed.

pub mod html;
pub mod ooxml;
pub mod pdf;
pub mod presentation;
pub mod spreadsheet;
pub mod text;
pub mod word;

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CompareError;

/// The document formats the dispatcher knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    PlainText,
    Html,
    Spreadsheet,
    Word,
    Pdf,
    Presentation,
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 6] = [
        DocumentFormat::PlainText,
        DocumentFormat::Html,
        DocumentFormat::Spreadsheet,
        DocumentFormat::Word,
        DocumentFormat::Pdf,
        DocumentFormat::Presentation,
    ];

    /// Look up a format by file extension (without the dot), case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" => Some(DocumentFormat::PlainText),
            "html" | "htm" => Some(DocumentFormat::Html),
            "xlsx" | "xls" => Some(DocumentFormat::Spreadsheet),
            "docx" => Some(DocumentFormat::Word),
            "pdf" => Some(DocumentFormat::Pdf),
            "pptx" => Some(DocumentFormat::Presentation),
            _ => None,
        }
    }

    /// Infer the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self, CompareError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_extension(ext).ok_or_else(|| {
            CompareError::UnsupportedFormat(if ext.is_empty() {
                format!("{} has no file extension", path.display())
            } else {
                format!(".{ext}")
            })
        })
    }

    /// Extensions routed to this format.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            DocumentFormat::PlainText => &["txt"],
            DocumentFormat::Html => &["html", "htm"],
            DocumentFormat::Spreadsheet => &["xlsx", "xls"],
            DocumentFormat::Word => &["docx"],
            DocumentFormat::Pdf => &["pdf"],
            DocumentFormat::Presentation => &["pptx"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DocumentFormat::PlainText => "plain text",
            DocumentFormat::Html => "HTML",
            DocumentFormat::Spreadsheet => "spreadsheet",
            DocumentFormat::Word => "Word document",
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::Presentation => "presentation",
        }
    }

    fn extractor(self) -> fn(&Path) -> anyhow::Result<String> {
        match self {
            DocumentFormat::PlainText => text::extract,
            DocumentFormat::Html => html::extract,
            DocumentFormat::Spreadsheet => spreadsheet::extract,
            DocumentFormat::Word => word::extract,
            DocumentFormat::Pdf => pdf::extract,
            DocumentFormat::Presentation => presentation::extract,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Every extension the dispatcher accepts, in table order.
pub fn supported_extensions() -> Vec<&'static str> {
    DocumentFormat::ALL
        .iter()
        .flat_map(|f| f.extensions().iter().copied())
        .collect()
}

/// A document on disk plus the format its extension declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub path: PathBuf,
    pub format: DocumentFormat,
}

impl DocumentRef {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, CompareError> {
        let path = path.into();
        let format = DocumentFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    /// Run the format's extractor over the file.
    pub fn extract(&self) -> Result<String, CompareError> {
        debug!(path = %self.path.display(), format = %self.format, "Extracting text");
        let text = (self.format.extractor())(&self.path)
            .map_err(|e| CompareError::extraction(&self.path, e))?;
        debug!(
            path = %self.path.display(),
            chars = text.chars().count(),
            "Extracted text"
        );
        Ok(text)
    }
}

/// Extract the text of any supported document, choosing the extractor by extension.
pub fn extract_any(path: impl AsRef<Path>) -> Result<String, CompareError> {
    DocumentRef::new(path.as_ref())?.extract()
}
