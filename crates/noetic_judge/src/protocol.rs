//! Wire format for judge requests.
//!
//! One request shape serves every operation: a chat-completion body with a
//! system prompt fixing the operation and a JSON-schema response-format
//! pin fixing the shape of the answer. Only the system prompt, the user
//! payload, and the response schema vary per operation.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub messages: Vec<ChatMessage<'a>>,
    pub response_format: Value,
}

impl<'a> ChatRequest<'a> {
    pub fn new(system_prompt: String, payload: String, schema: Value) -> Self {
        ChatRequest {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: payload,
                },
            ],
            response_format: json!({
                "type": "json_schema",
                "json_schema": { "name": "judge_response", "schema": schema },
            }),
        }
    }
}

/// `{ similarity: Number }` — returned by conceptual-identity and
/// similarity-along-axis prompts.
#[derive(Debug, Deserialize)]
pub struct SimilarityResponse {
    pub similarity: f64,
}

/// `{ result: Boolean }` — returned by has-attribute and share-attribute
/// prompts.
#[derive(Debug, Deserialize)]
pub struct BoolResponse {
    pub result: bool,
}

/// `{ result: String }` — returned by the differentia prompt.
#[derive(Debug, Deserialize)]
pub struct StringResponse {
    pub result: String,
}

pub fn similarity_schema() -> Value {
    json!({
        "type": "object",
        "properties": { "similarity": { "type": "number", "minimum": 0.0, "maximum": 1.0 } },
        "required": ["similarity"],
    })
}

pub fn bool_schema() -> Value {
    json!({
        "type": "object",
        "properties": { "result": { "type": "boolean" } },
        "required": ["result"],
    })
}

pub fn string_schema() -> Value {
    json!({
        "type": "object",
        "properties": { "result": { "type": "string" } },
        "required": ["result"],
    })
}

/// Operation-specific prompts.
pub mod prompts {
    pub const CONCEPTUAL_IDENTITY: &str =
        "You judge whether two descriptions refer to the same underlying \
         concept. Respond with a similarity score in [0.0, 1.0].";
    pub const HAS_ATTRIBUTE: &str =
        "You judge whether a subject possesses a characteristic. Respond \
         with a boolean.";
    pub const SHARE_ATTRIBUTE: &str =
        "You judge whether two subjects both possess a shared \
         characteristic. Respond with a boolean.";
    pub const DIFFERENTIA: &str =
        "You name the single most salient distinguishing characteristic \
         between two subjects. Respond with a short string.";
    pub const SIMILARITY_ALONG_AXIS: &str =
        "You judge how similar two subjects are along a named axis. \
         Respond with a similarity score in [0.0, 1.0].";
}
