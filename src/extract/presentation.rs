// PowerPoint (.pptx) extraction.
//
// Slide order comes from <p:sldIdLst> in ppt/presentation.xml, not from
// slide file names: slide3.xml can legitimately be shown first. Each
// top-level text shape on a slide contributes one entry; its paragraphs are
// joined by newlines.

use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use super::ooxml::{ElementStack, Package};

const PRESENTATION_PART: &str = "ppt/presentation.xml";

pub fn extract(path: &Path) -> Result<String> {
    let mut package = Package::open(path)?;
    let presentation = package.read_part(PRESENTATION_PART)?;
    let rels = package.relationships(PRESENTATION_PART)?;

    let slide_ids = slide_rel_ids(&presentation)
        .with_context(|| format!("Failed to parse {PRESENTATION_PART}"))?;

    let mut lines = Vec::new();
    for (index, rel_id) in slide_ids.iter().enumerate() {
        let part = rels
            .get(rel_id)
            .with_context(|| format!("Slide relationship {rel_id} not found"))?;
        let xml = package.read_part(part)?;
        let shapes =
            shape_texts(&xml).with_context(|| format!("Failed to parse slide part {part}"))?;
        debug!(slide = index + 1, shapes = shapes.len(), "Read slide");
        lines.extend(shapes);
    }

    Ok(lines.join("\n"))
}

/// Relationship ids of the slides listed in <p:sldIdLst>, in presentation order.
fn slide_rel_ids(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut stack = ElementStack::default();
    let mut ids = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(e.local_name().as_ref()),
            Event::Empty(e)
                if e.local_name().as_ref() == b"sldId" && stack.parent_is(b"sldIdLst") =>
            {
                for attr in e.attributes() {
                    let attr = attr?;
                    // r:id, as opposed to the numeric un-prefixed id
                    if attr.key.prefix().is_some() && attr.key.local_name().as_ref() == b"id" {
                        ids.push(attr.unescape_value()?.into_owned());
                    }
                }
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(ids)
}

/// Text of each top-level shape with a text body, in shape order.
pub fn shape_texts(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut stack = ElementStack::default();
    let mut shapes = Vec::new();
    // Paragraphs of the text body being read, if any
    let mut body: Option<Vec<String>> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"txBody" if stack.ends_with(&[b"spTree", b"sp"]) => body = Some(Vec::new()),
                    b"p" if stack.parent_is(b"txBody") => {
                        if let Some(paras) = body.as_mut() {
                            paras.push(String::new());
                        }
                    }
                    _ => {}
                }
                stack.push(name.as_ref());
            }
            Event::Empty(e) => {
                let name = e.local_name();
                if let Some(paras) = body.as_mut() {
                    match name.as_ref() {
                        b"p" if stack.parent_is(b"txBody") => paras.push(String::new()),
                        b"br" if stack.parent_is(b"p") => {
                            if let Some(para) = paras.last_mut() {
                                para.push('\n');
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::Text(t) => {
                if stack.parent_is(b"t") {
                    if let Some(para) = body.as_mut().and_then(|paras| paras.last_mut()) {
                        para.push_str(&t.unescape()?);
                    }
                }
            }
            Event::End(_) => {
                if stack.pop().as_deref() == Some(b"txBody".as_slice())
                    && stack.ends_with(&[b"spTree", b"sp"])
                {
                    if let Some(paras) = body.take() {
                        shapes.push(paras.join("\n"));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(shapes)
}
