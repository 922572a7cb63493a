// Text embedder trait.
//
// SentenceEmbedder is the production implementation. Tests plug in small
// deterministic embedders so scoring can be checked without model files.

use anyhow::Result;

/// Turns a text into a fixed-dimensionality vector.
///
/// Implementations are loaded once and shared read-only across comparisons,
/// hence `Send + Sync` and `&self`.
pub trait TextEmbedder: Send + Sync {
    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vec<f64>>;

    /// Embed several texts, returning vectors in the same order.
    /// Each text is encoded independently of the others.
    fn embed_many(&self, texts: &[&str]) -> Result<Vec<Vec<f64>>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}
