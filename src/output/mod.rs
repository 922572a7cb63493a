// Output formatting for comparison results.

pub mod terminal;

/// Qualitative bucket for a similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimilarityBand {
    NearIdentical,
    Similar,
    Related,
    Different,
}

impl SimilarityBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            SimilarityBand::NearIdentical
        } else if score >= 0.75 {
            SimilarityBand::Similar
        } else if score >= 0.5 {
            SimilarityBand::Related
        } else {
            SimilarityBand::Different
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SimilarityBand::NearIdentical => "near-identical",
            SimilarityBand::Similar => "similar",
            SimilarityBand::Related => "related",
            SimilarityBand::Different => "different",
        }
    }
}

/// Label for a similarity score.
pub fn similarity_band(score: f64) -> &'static str {
    SimilarityBand::from_score(score).label()
}
