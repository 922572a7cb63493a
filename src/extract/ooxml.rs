// Shared plumbing for Office Open XML packages (.docx, .pptx).
//
// Both formats are zip archives of XML parts wired together by
// relationship files (`_rels/*.rels`). The extractors only need three
// things from the package: read a part as text, resolve a part's
// relationships, and track where they are in the element tree while
// streaming through the XML.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

/// An opened OOXML package.
pub struct Package {
    archive: ZipArchive<File>,
}

impl Package {
    pub fn open(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let archive = ZipArchive::new(file)
            .with_context(|| format!("{} is not a valid Office document", path.display()))?;
        Ok(Self { archive })
    }

    /// Read a part (e.g. `word/document.xml`) as UTF-8 text.
    pub fn read_part(&mut self, name: &str) -> Result<String> {
        let mut part = self
            .archive
            .by_name(name)
            .with_context(|| format!("Document part missing: {name}"))?;
        let mut xml = String::new();
        part.read_to_string(&mut xml)
            .with_context(|| format!("Failed to read document part {name}"))?;
        Ok(xml)
    }

    /// Relationship id → absolute part name, for the relationships of `part`.
    /// A part without a relationships file has none.
    pub fn relationships(&mut self, part: &str) -> Result<HashMap<String, String>> {
        let rels_name = rels_path(part);
        match self.archive.by_name(&rels_name) {
            Ok(_) => {}
            Err(ZipError::FileNotFound) => return Ok(HashMap::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to open document part {rels_name}"))
            }
        }
        let xml = self.read_part(&rels_name)?;

        let mut reader = Reader::from_str(&xml);
        let mut rels = HashMap::new();
        loop {
            match reader
                .read_event()
                .with_context(|| format!("Malformed XML in {rels_name}"))?
            {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                    let mut id = None;
                    let mut target = None;
                    let mut external = false;
                    for attr in e.attributes() {
                        let attr = attr.with_context(|| format!("Bad attribute in {rels_name}"))?;
                        let value = attr.unescape_value()?.into_owned();
                        match attr.key.as_ref() {
                            b"Id" => id = Some(value),
                            b"Target" => target = Some(value),
                            b"TargetMode" => external = value == "External",
                            _ => {}
                        }
                    }
                    if let (Some(id), Some(target), false) = (id, target, external) {
                        rels.insert(id, resolve_target(part, &target));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(rels)
    }
}

/// `ppt/presentation.xml` → `ppt/_rels/presentation.xml.rels`
fn rels_path(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None => format!("_rels/{part}.rels"),
    }
}

/// Resolve a relationship target against the directory of its source part.
/// Absolute targets (leading `/`) are relative to the package root.
fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return normalize(absolute.split('/'));
    }
    let dir = source_part.rsplit_once('/').map_or("", |(dir, _)| dir);
    normalize(dir.split('/').chain(target.split('/')))
}

fn normalize<'a>(segments: impl Iterator<Item = &'a str>) -> String {
    let mut out: Vec<&str> = Vec::new();
    for seg in segments {
        match seg {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            s => out.push(s),
        }
    }
    out.join("/")
}

/// Local names of the currently open elements, outermost first.
///
/// Namespace prefixes are dropped: OOXML producers almost always use
/// `w:`/`p:`/`a:`, but nothing requires it.
#[derive(Debug, Default)]
pub struct ElementStack {
    names: Vec<Vec<u8>>,
}

impl ElementStack {
    pub fn push(&mut self, local_name: &[u8]) {
        self.names.push(local_name.to_vec());
    }

    pub fn pop(&mut self) -> Option<Vec<u8>> {
        self.names.pop()
    }

    /// The innermost open element is `name`.
    pub fn parent_is(&self, name: &[u8]) -> bool {
        self.names.last().is_some_and(|n| n == name)
    }

    /// The innermost open elements are exactly `path`, in order.
    pub fn ends_with(&self, path: &[&[u8]]) -> bool {
        path.len() <= self.names.len()
            && self.names[self.names.len() - path.len()..]
                .iter()
                .zip(path)
                .all(|(a, b)| a.as_slice() == *b)
    }

    pub fn contains(&self, name: &[u8]) -> bool {
        self.names.iter().any(|n| n == name)
    }
}
