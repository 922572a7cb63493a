// Line-level unified diff between two extracted texts.
//
// Output follows the classic unified format: `--- File 1` / `+++ File 2`
// headers, `@@ -a,b +c,d @@` hunks with three lines of context, and one
// prefixed line per text line. Lines carry no terminators and the report has
// no trailing newline. Identical inputs produce an empty report.

use std::fmt;

use serde::{Serialize, Serializer};
use similar::{Algorithm, ChangeTag, DiffOp, TextDiff};

/// Lines of unchanged context around each hunk.
pub const DEFAULT_CONTEXT_LINES: usize = 3;

pub const FROM_LABEL: &str = "File 1";
pub const TO_LABEL: &str = "File 2";

/// One line of a unified diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    /// `--- label`
    FromFile(String),
    /// `+++ label`
    ToFile(String),
    /// `@@ -old +new @@`, ranges 0-based with exclusive ends
    Hunk {
        old_start: usize,
        old_end: usize,
        new_start: usize,
        new_end: usize,
    },
    Context(String),
    Removed(String),
    Added(String),
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffLine::FromFile(label) => write!(f, "--- {label}"),
            DiffLine::ToFile(label) => write!(f, "+++ {label}"),
            DiffLine::Hunk {
                old_start,
                old_end,
                new_start,
                new_end,
            } => write!(
                f,
                "@@ -{} +{} @@",
                HunkRange(*old_start, *old_end),
                HunkRange(*new_start, *new_end)
            ),
            DiffLine::Context(line) => write!(f, " {line}"),
            DiffLine::Removed(line) => write!(f, "-{line}"),
            DiffLine::Added(line) => write!(f, "+{line}"),
        }
    }
}

/// A hunk range in unified-diff notation: 1-based start, `,len` omitted
/// when the length is 1, and an empty range named by the line before it.
struct HunkRange(usize, usize);

impl fmt::Display for HunkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let HunkRange(start, end) = *self;
        let len = end - start;
        match len {
            1 => write!(f, "{}", start + 1),
            0 => write!(f, "{start},0"),
            _ => write!(f, "{},{}", start + 1, len),
        }
    }
}

/// An ordered unified diff. Renders as text via `Display`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffReport {
    pub lines: Vec<DiffLine>,
}

impl DiffReport {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines present only in File 2.
    pub fn added(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| matches!(l, DiffLine::Added(_)))
            .count()
    }

    /// Number of lines present only in File 1.
    pub fn removed(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| matches!(l, DiffLine::Removed(_)))
            .count()
    }

    pub fn hunks(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| matches!(l, DiffLine::Hunk { .. }))
            .count()
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{line}")?;
        }
        Ok(())
    }
}

impl Serialize for DiffReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Unified diff of two texts with the default context radius.
pub fn diff(text1: &str, text2: &str) -> DiffReport {
    diff_with_context(text1, text2, DEFAULT_CONTEXT_LINES)
}

/// Unified diff of two texts with `context` lines around each hunk.
pub fn diff_with_context(text1: &str, text2: &str, context: usize) -> DiffReport {
    let old = split_lines(text1);
    let new = split_lines(text2);

    let text_diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_slices(&old, &new);

    let mut lines = Vec::new();
    for group in text_diff.grouped_ops(context) {
        if group.iter().all(|op| matches!(op, DiffOp::Equal { .. })) {
            continue;
        }
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };

        if lines.is_empty() {
            lines.push(DiffLine::FromFile(FROM_LABEL.to_string()));
            lines.push(DiffLine::ToFile(TO_LABEL.to_string()));
        }
        lines.push(DiffLine::Hunk {
            old_start: first.old_range().start,
            old_end: last.old_range().end,
            new_start: first.new_range().start,
            new_end: last.new_range().end,
        });

        for op in &group {
            for change in text_diff.iter_changes(op) {
                let value = change.value().to_string();
                lines.push(match change.tag() {
                    ChangeTag::Equal => DiffLine::Context(value),
                    ChangeTag::Delete => DiffLine::Removed(value),
                    ChangeTag::Insert => DiffLine::Added(value),
                });
            }
        }
    }

    DiffReport { lines }
}

/// Split text into lines on any line boundary (`\n`, `\r\n`, `\r`, form
/// feed, vertical tab, and the Unicode separators), dropping terminators.
/// Empty lines are kept; a final terminator does not produce an extra
/// empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                chars.next();
                start = j + 1;
            }
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'
            | '\u{1d}'
            | '\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}
