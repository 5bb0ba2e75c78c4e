//! A deterministic judge for tests: replacing the real judge with one
//! that returns fixed scores for fixed inputs makes the engine's
//! solution sequence fully deterministic.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::Judge;

/// Returns canned answers keyed by the exact input strings a test wires
/// up, and a conservative default for everything else.
///
/// Matching is intentionally simple (exact string pairs, case-sensitive)
/// rather than fuzzy — a fake judge's whole point is to remove the
/// semantic arbiter's nondeterminism from a test, not to reimplement it.
#[derive(Default)]
pub struct FakeJudge {
    identical: HashMap<(String, String), bool>,
    has_attribute: HashMap<(String, String), bool>,
    share_attribute: HashMap<(String, String, String), bool>,
    differentia: HashMap<(String, String), String>,
    similar_axis: HashMap<(String, String, String), bool>,
}

impl FakeJudge {
    pub fn new() -> Self {
        FakeJudge::default()
    }

    pub fn with_identical(mut self, a: &str, b: &str, value: bool) -> Self {
        self.identical.insert((a.to_string(), b.to_string()), value);
        self
    }

    pub fn with_has_attribute(mut self, c: &str, x: &str, value: bool) -> Self {
        self.has_attribute.insert((c.to_string(), x.to_string()), value);
        self
    }

    pub fn with_share_attribute(mut self, c: &str, x: &str, y: &str, value: bool) -> Self {
        self.share_attribute
            .insert((c.to_string(), x.to_string(), y.to_string()), value);
        self
    }

    pub fn with_differentia(mut self, a: &str, b: &str, value: &str) -> Self {
        self.differentia
            .insert((a.to_string(), b.to_string()), value.to_string());
        self
    }

    pub fn with_similar_axis(mut self, axis: &str, a: &str, b: &str, value: bool) -> Self {
        self.similar_axis
            .insert((axis.to_string(), a.to_string(), b.to_string()), value);
        self
    }
}

#[async_trait(?Send)]
impl Judge for FakeJudge {
    async fn conceptually_identical(&self, a: &str, b: &str) -> bool {
        *self
            .identical
            .get(&(a.to_string(), b.to_string()))
            .unwrap_or(&false)
    }

    async fn has_attribute(&self, c: &str, x: &str) -> bool {
        *self
            .has_attribute
            .get(&(c.to_string(), x.to_string()))
            .unwrap_or(&false)
    }

    async fn share_attribute(&self, c: &str, x: &str, y: &str) -> bool {
        *self
            .share_attribute
            .get(&(c.to_string(), x.to_string(), y.to_string()))
            .unwrap_or(&false)
    }

    async fn differentia(&self, a: &str, b: &str) -> String {
        self.differentia
            .get(&(a.to_string(), b.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    async fn similar_along_axis(&self, axis: &str, a: &str, b: &str) -> bool {
        *self
            .similar_axis
            .get(&(axis.to_string(), a.to_string(), b.to_string()))
            .unwrap_or(&false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_wired_up_answer() {
        let judge = FakeJudge::new().with_identical("philosopher", "thinker", true);
        assert!(judge.conceptually_identical("philosopher", "thinker").await);
        assert!(!judge.conceptually_identical("philosopher", "painter").await);
    }

    #[tokio::test]
    async fn unwired_input_defaults_to_no() {
        let judge = FakeJudge::new();
        assert!(!judge.has_attribute("rational", "socrates").await);
        assert_eq!(judge.differentia("a", "b").await, String::new());
    }
}
