//! HTTP judge client.
//!
//! The judge call is the resolution engine's one genuine network
//! suspension point: the asynchronous round trip must be a real `.await`,
//! not a blocking call on the single cooperative task, so the client is
//! built on `reqwest` rather than a blocking HTTP client.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::JudgeConfig;
use crate::protocol::{self, prompts, BoolResponse, ChatRequest, SimilarityResponse, StringResponse};
use crate::Judge;

/// Talks to a real semantic-judge service over HTTP.
///
/// Every failure mode — connection refused, timeout, non-2xx status, a
/// response body that doesn't match the pinned schema — is mapped to the
/// operation's "no" value rather than propagated: a judge outage degrades
/// to "no" rather than raising. Failures are logged at `warn` before being
/// swallowed, so an operator can tell silence from a genuinely unanimous
/// "no".
pub struct HttpJudge {
    config: JudgeConfig,
    client: reqwest::Client,
}

impl HttpJudge {
    pub fn new(config: JudgeConfig) -> Self {
        HttpJudge {
            config,
            client: reqwest::Client::new(),
        }
    }

    async fn ask<T: DeserializeOwned>(
        &self,
        system_prompt: &str,
        payload: String,
        schema: serde_json::Value,
    ) -> Option<T> {
        let request = ChatRequest::new(system_prompt.to_string(), payload, schema);
        let response = match self.client.post(&self.config.endpoint).json(&request).send().await {
            Ok(r) => r,
            Err(e) => {
                log::warn!("judge request failed: {e}");
                return None;
            }
        };
        if !response.status().is_success() {
            log::warn!("judge returned non-2xx status: {}", response.status());
            return None;
        }
        match response.json::<T>().await {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("judge response did not match expected schema: {e}");
                None
            }
        }
    }

    async fn similarity(&self, system_prompt: &str, payload: String) -> f64 {
        self.ask::<SimilarityResponse>(system_prompt, payload, protocol::similarity_schema())
            .await
            .map(|r| r.similarity.clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }

    async fn boolean(&self, system_prompt: &str, payload: String) -> bool {
        self.ask::<BoolResponse>(system_prompt, payload, protocol::bool_schema())
            .await
            .map(|r| r.result)
            .unwrap_or(false)
    }
}

#[async_trait(?Send)]
impl Judge for HttpJudge {
    async fn conceptually_identical(&self, a: &str, b: &str) -> bool {
        let payload = format!("A: {a}\nB: {b}");
        self.similarity(prompts::CONCEPTUAL_IDENTITY, payload).await >= self.config.threshold
    }

    async fn has_attribute(&self, c: &str, x: &str) -> bool {
        let payload = format!("Characteristic: {c}\nSubject: {x}");
        self.boolean(prompts::HAS_ATTRIBUTE, payload).await
    }

    async fn share_attribute(&self, c: &str, x: &str, y: &str) -> bool {
        let payload = format!("Characteristic: {c}\nSubject A: {x}\nSubject B: {y}");
        self.boolean(prompts::SHARE_ATTRIBUTE, payload).await
    }

    async fn differentia(&self, a: &str, b: &str) -> String {
        let payload = format!("A: {a}\nB: {b}");
        self.ask::<StringResponse>(prompts::DIFFERENTIA, payload, protocol::string_schema())
            .await
            .map(|r| r.result)
            .unwrap_or_default()
    }

    async fn similar_along_axis(&self, axis: &str, a: &str, b: &str) -> bool {
        let payload = format!("Axis: {axis}\nA: {a}\nB: {b}");
        self.similarity(prompts::SIMILARITY_ALONG_AXIS, payload).await >= self.config.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_endpoint_degrades_to_no() {
        let judge = HttpJudge::new(JudgeConfig::new("http://127.0.0.1:1", 0.7));
        assert!(!judge.conceptually_identical("a", "b").await);
        assert!(!judge.has_attribute("c", "x").await);
        assert_eq!(judge.differentia("a", "b").await, String::new());
    }
}
