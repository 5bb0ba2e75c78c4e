//! An alternative judge that computes normalized vector embeddings and
//! scores conceptual similarity by cosine distance instead of asking a
//! chat-completion endpoint; the external interface (threshold, outputs)
//! is unchanged.
//!
//! [`EmbeddingProvider`] is the seam to whatever embedding source a
//! deployment wants (a local model, a hosted embeddings endpoint); this
//! crate only supplies the cosine-similarity arithmetic and the
//! `Judge` wiring around it. Has-attribute/share-attribute/differentia
//! have no natural embedding-space realization, so [`EmbeddingJudge`]
//! only overrides the two operations that are naturally similarity
//! scores and falls back to a boolean "no"/empty for the rest.

use async_trait::async_trait;

use crate::config::JudgeConfig;
use crate::Judge;

/// Produces a normalized embedding vector for a piece of text.
pub trait EmbeddingProvider {
    fn embed(&self, text: &str) -> Vec<f32>;
}

/// Scores conceptual identity and axis similarity by cosine similarity of
/// embeddings, rather than a chat-completion round trip.
pub struct EmbeddingJudge<P: EmbeddingProvider> {
    provider: P,
    threshold: f64,
}

impl<P: EmbeddingProvider> EmbeddingJudge<P> {
    pub fn new(provider: P, config: JudgeConfig) -> Self {
        EmbeddingJudge {
            provider,
            threshold: config.threshold,
        }
    }

    fn cosine_similarity(&self, a: &str, b: &str) -> f64 {
        let va = self.provider.embed(a);
        let vb = self.provider.embed(b);
        cosine(&va, &vb).clamp(0.0, 1.0)
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)) as f64
}

#[async_trait(?Send)]
impl<P: EmbeddingProvider> Judge for EmbeddingJudge<P> {
    async fn conceptually_identical(&self, a: &str, b: &str) -> bool {
        self.cosine_similarity(a, b) >= self.threshold
    }

    async fn has_attribute(&self, _c: &str, _x: &str) -> bool {
        false
    }

    async fn share_attribute(&self, _c: &str, _x: &str, _y: &str) -> bool {
        false
    }

    async fn differentia(&self, _a: &str, _b: &str) -> String {
        String::new()
    }

    async fn similar_along_axis(&self, _axis: &str, a: &str, b: &str) -> bool {
        self.cosine_similarity(a, b) >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OneHot;

    impl EmbeddingProvider for OneHot {
        fn embed(&self, text: &str) -> Vec<f32> {
            match text {
                "philosopher" | "thinker" => vec![1.0, 0.0],
                _ => vec![0.0, 1.0],
            }
        }
    }

    #[tokio::test]
    async fn identical_embeddings_score_above_threshold() {
        let judge = EmbeddingJudge::new(OneHot, JudgeConfig::new("unused", 0.7));
        assert!(judge.conceptually_identical("philosopher", "thinker").await);
        assert!(!judge.conceptually_identical("philosopher", "painter").await);
    }
}
