// Semantic similarity between two texts via sentence embeddings.

pub mod download;
pub mod embeddings;
pub mod traits;

use anyhow::Result;

pub use embeddings::{cosine_similarity, SentenceEmbedder, EMBEDDING_DIM};
pub use traits::TextEmbedder;

/// Embed both texts independently and return their cosine similarity.
///
/// Empty texts are not special-cased; a zero-norm embedding scores 0.0.
pub fn similarity(embedder: &dyn TextEmbedder, text1: &str, text2: &str) -> Result<f64> {
    let vectors = embedder.embed_many(&[text1, text2])?;
    let [a, b] = vectors.as_slice() else {
        anyhow::bail!("Embedder returned {} vectors for 2 texts", vectors.len());
    };
    Ok(cosine_similarity(a, b))
}
