// HTML extraction: visible text nodes joined by single spaces.

use std::path::Path;

use anyhow::{Context, Result};
use scraper::{Html, Node};

/// Elements whose text content is never rendered.
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

pub fn extract(path: &Path) -> Result<String> {
    let markup = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} as UTF-8", path.display()))?;
    Ok(visible_text(&markup))
}

/// Collect the document's text nodes in order, each stripped of surrounding
/// whitespace, skipping empty nodes, joined with a single space.
pub fn visible_text(markup: &str) -> String {
    let document = Html::parse_document(markup);
    let mut parts: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join(" ")
}
