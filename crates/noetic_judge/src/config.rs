//! Judge configuration: endpoint and similarity threshold.

/// Default judge endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:9090/v1/chat/completions";

/// Default similarity threshold.
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Construction-time parameters for a judge: the endpoint and similarity
/// threshold are configuration values passed at engine construction.
#[derive(Debug, Clone)]
pub struct JudgeConfig {
    pub endpoint: String,
    pub threshold: f64,
}

impl JudgeConfig {
    pub fn new(endpoint: impl Into<String>, threshold: f64) -> Self {
        JudgeConfig {
            endpoint: endpoint.into(),
            threshold: threshold.clamp(0.0, 1.0),
        }
    }
}

impl Default for JudgeConfig {
    fn default() -> Self {
        JudgeConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}
