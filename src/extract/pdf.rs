// PDF extraction, page by page.
//
// Only text drawn with text operators is recovered; scanned pages without an
// OCR layer come back empty and are skipped. A page whose content stream
// can't be decoded is skipped too, with a debug log, so one broken page
// doesn't sink the whole document. Failing to load the file at all is an
// error.

use std::path::Path;

use anyhow::{Context, Result};
use lopdf::Document;
use tracing::debug;

pub fn extract(path: &Path) -> Result<String> {
    let document = Document::load(path)
        .with_context(|| format!("Failed to load PDF {}", path.display()))?;
    Ok(document_text(&document))
}

/// Text of every page in page order, each page followed by a line break.
pub fn document_text(document: &Document) -> String {
    let mut text = String::new();

    for page_number in document.get_pages().keys() {
        let page_text = match document.extract_text(&[*page_number]) {
            Ok(page_text) => page_text,
            Err(e) => {
                debug!(page = page_number, error = %e, "Skipping unreadable PDF page");
                continue;
            }
        };
        let page_text = page_text.trim_end();
        if page_text.is_empty() {
            debug!(page = page_number, "PDF page has no extractable text");
            continue;
        }
        text.push_str(page_text);
        text.push('\n');
    }

    text
}
