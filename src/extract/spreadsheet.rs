// Spreadsheet (.xlsx / .xls) extraction.
//
// Only the first sheet is read. The first row is treated as the header and
// the rest as data, rendered as a plain text table with a 0-based row index
// column. This is a textual approximation of the sheet: number formats,
// merged cells and formulas are not reproduced.

use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};

const COLUMN_GAP: &str = "  ";
const MISSING: &str = "NaN";

pub fn extract(path: &Path) -> Result<String> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open spreadsheet {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .with_context(|| format!("{} contains no worksheets", path.display()))?
        .with_context(|| format!("Failed to read first worksheet of {}", path.display()))?;
    Ok(render_table(&cells(&range)))
}

/// Render every cell as a string. Empty cells become empty strings.
fn cells(range: &Range<Data>) -> Vec<Vec<String>> {
    range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}

/// Lay out rows as a table: first row is the header, the rest are data rows.
///
/// ```text
///    name  qty
/// 0  apple    3
/// 1   pear   10
/// ```
pub fn render_table(rows: &[Vec<String>]) -> String {
    let Some((header_row, data_rows)) = rows.split_first() else {
        return "Empty DataFrame\nColumns: []\nIndex: []".to_string();
    };

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let headers: Vec<String> = (0..columns)
        .map(|i| match header_row.get(i).map(|h| h.trim()) {
            Some(h) if !h.is_empty() => h.to_string(),
            _ => format!("Unnamed: {i}"),
        })
        .collect();

    if data_rows.is_empty() {
        return format!(
            "Empty DataFrame\nColumns: [{}]\nIndex: []",
            headers.join(", ")
        );
    }

    let body: Vec<Vec<&str>> = data_rows
        .iter()
        .map(|row| {
            (0..columns)
                .map(|i| match row.get(i).map(String::as_str) {
                    Some(v) if !v.trim().is_empty() => v,
                    _ => MISSING,
                })
                .collect()
        })
        .collect();

    let index: Vec<String> = (0..body.len()).map(|i| i.to_string()).collect();
    let index_width = index.iter().map(|s| width(s)).max().unwrap_or(0);

    let col_widths: Vec<usize> = (0..columns)
        .map(|i| {
            body.iter()
                .map(|row| width(row[i]))
                .chain(std::iter::once(width(&headers[i])))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(body.len() + 1);

    let mut header_line = " ".repeat(index_width);
    for (h, w) in headers.iter().zip(&col_widths) {
        header_line.push_str(COLUMN_GAP);
        header_line.push_str(&pad_left(h, *w));
    }
    lines.push(header_line);

    for (idx, row) in index.iter().zip(&body) {
        let mut line = pad_right(idx, index_width);
        for (value, w) in row.iter().zip(&col_widths) {
            line.push_str(COLUMN_GAP);
            line.push_str(&pad_left(value, *w));
        }
        lines.push(line);
    }

    lines.join("\n")
}

fn width(s: &str) -> usize {
    s.chars().count()
}

fn pad_left(s: &str, w: usize) -> String {
    format!("{}{}", " ".repeat(w.saturating_sub(width(s))), s)
}

fn pad_right(s: &str, w: usize) -> String {
    format!("{}{}", s, " ".repeat(w.saturating_sub(width(s))))
}
