// Word (.docx) extraction: one line per body paragraph, in document order.
//
// Only paragraphs that sit directly in <w:body> count. Paragraphs inside
// tables, text boxes, headers and footers are skipped, as are images and
// all formatting.

use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

use super::ooxml::{ElementStack, Package};

const DOCUMENT_PART: &str = "word/document.xml";

pub fn extract(path: &Path) -> Result<String> {
    let mut package = Package::open(path)?;
    let xml = package.read_part(DOCUMENT_PART)?;
    let paragraphs = body_paragraphs(&xml)
        .with_context(|| format!("Failed to parse {} in {}", DOCUMENT_PART, path.display()))?;
    Ok(paragraphs.join("\n"))
}

/// Text of each top-level body paragraph of a WordprocessingML document.
pub fn body_paragraphs(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut stack = ElementStack::default();
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name();
                if name.as_ref() == b"p" && stack.parent_is(b"body") {
                    current = Some(String::new());
                }
                stack.push(name.as_ref());
            }
            Event::Empty(e) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"p" if stack.parent_is(b"body") => paragraphs.push(String::new()),
                    // <w:tab/> also appears in paragraph properties; only run-level ones are text
                    b"tab" if stack.parent_is(b"r") => push_run_char(&mut current, &stack, '\t'),
                    b"br" | b"cr" if stack.parent_is(b"r") => {
                        push_run_char(&mut current, &stack, '\n')
                    }
                    _ => {}
                }
            }
            Event::Text(t) => {
                if stack.parent_is(b"t") && !stack.contains(b"txbxContent") {
                    if let Some(para) = current.as_mut() {
                        para.push_str(&t.unescape()?);
                    }
                }
            }
            Event::End(_) => {
                if stack.pop().as_deref() == Some(b"p".as_slice()) && stack.parent_is(b"body") {
                    paragraphs.push(current.take().unwrap_or_default());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn push_run_char(current: &mut Option<String>, stack: &ElementStack, c: char) {
    if stack.contains(b"txbxContent") {
        return;
    }
    if let Some(para) = current.as_mut() {
        para.push(c);
    }
}
