// Sentence embeddings with all-MiniLM-L6-v2 running locally under ONNX Runtime.
//
// Each document is tokenized, truncated to the model's 256-token window,
// run through the BERT encoder, and mean-pooled over the attention mask into
// a single 384-dimensional vector. Comparing two such vectors by cosine
// gives the semantic similarity score.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::debug;

use super::traits::TextEmbedder;

/// Embedding dimension for all-MiniLM-L6-v2.
pub const EMBEDDING_DIM: usize = 384;

/// Longest token sequence the model was trained on. Longer documents are
/// truncated, so only their opening contributes to the embedding.
pub const MAX_SEQ_LEN: usize = 256;

/// Sentence embedder backed by a local ONNX model.
pub struct SentenceEmbedder {
    // ort::Session::run takes &mut self
    session: Mutex<Session>,
    tokenizer: Tokenizer,
}

impl SentenceEmbedder {
    /// Load the model and tokenizer from `model_dir`.
    ///
    /// Expects `model.onnx` and `tokenizer.json` in the directory.
    /// Loading takes a moment; do it once per process.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        for (what, path) in [("model", &model_path), ("tokenizer", &tokenizer_path)] {
            if !path.exists() {
                anyhow::bail!(
                    "Embedding {what} not found: {}\nRun `doccmp download-model` to download it.",
                    path.display()
                );
            }
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| {
                format!(
                    "Failed to load embedding model from {}",
                    model_path.display()
                )
            })?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load embedding tokenizer: {}", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQ_LEN,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure tokenizer truncation: {}", e))?;
        // One text per inference call, so padding only adds masked-out tokens
        tokenizer.with_padding(None);

        debug!(
            "Loaded sentence embedding model from {}",
            model_dir.display()
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
        })
    }
}

impl TextEmbedder for SentenceEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f64>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

        // Special tokens ([CLS] … [SEP]) are always added, so even an empty
        // document has a non-empty sequence
        let ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let seq_len = ids.len();
        if seq_len == 0 {
            return Ok(vec![0.0; EMBEDDING_DIM]);
        }

        let shape = [1_i64, seq_len as i64];
        let input_ids =
            Tensor::from_array((shape, ids)).context("Failed to create input_ids tensor")?;
        let attention_mask = Tensor::from_array((shape, mask.clone()))
            .context("Failed to create attention_mask tensor")?;
        let token_type_ids = Tensor::from_array((shape, vec![0_i64; seq_len]))
            .context("Failed to create token_type_ids tensor")?;

        // Output 0 is last_hidden_state: [1, seq_len, 384]
        let hidden = {
            let mut session = self
                .session
                .lock()
                .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

            let outputs = session
                .run(ort::inputs! {
                    "input_ids" => input_ids,
                    "attention_mask" => attention_mask,
                    "token_type_ids" => token_type_ids
                })
                .context("Embedding ONNX inference failed")?;

            let (_shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .context("Failed to extract embedding output tensor")?;

            data.to_vec()
        };

        if hidden.len() != seq_len * EMBEDDING_DIM {
            anyhow::bail!(
                "Unexpected embedding output size {} (expected {} x {})",
                hidden.len(),
                seq_len,
                EMBEDDING_DIM
            );
        }

        let embedding = mean_pool(&hidden, &mask);
        debug!(tokens = seq_len, dim = EMBEDDING_DIM, "Computed document embedding");
        Ok(embedding)
    }
}

/// Average the token vectors of a `[seq_len, EMBEDDING_DIM]` row-major
/// hidden state, counting only tokens whose attention mask is set.
pub fn mean_pool(hidden: &[f32], mask: &[i64]) -> Vec<f64> {
    let mut sum = vec![0.0_f64; EMBEDDING_DIM];
    let mut counted = 0.0_f64;

    for (token, token_vec) in hidden.chunks_exact(EMBEDDING_DIM).enumerate() {
        let weight = mask.get(token).copied().unwrap_or(0) as f64;
        if weight <= 0.0 {
            continue;
        }
        counted += weight;
        for (acc, &v) in sum.iter_mut().zip(token_vec) {
            *acc += v as f64 * weight;
        }
    }

    if counted > 0.0 {
        for v in &mut sum {
            *v /= counted;
        }
    }
    sum
}

/// Cosine similarity: `dot(a, b) / (|a| * |b|)`.
///
/// Mismatched or empty vectors, and any zero-norm vector, score exactly 0.0
/// so the result is never NaN. Float drift is clamped to [-1, 1]. Negative
/// scores are possible in principle but rare for real text under this model.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    let denom = norm_a * norm_b;
    if denom < f64::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(-1.0, 1.0)
    }
}
