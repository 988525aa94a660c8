use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub temperature: f64,
    pub messages: Vec<ChatMessage>,
}

/// Completion-API response shape: the reply sits at
/// `choices[0].message.content`. Sibling fields (id, usage, finish_reason...)
/// are ignored.
#[derive(Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Deserialize)]
pub struct CompletionMessage {
    pub content: String,
}

/// Older gateway response shape: the reply is the top-level `content` field.
#[derive(Deserialize)]
pub struct LegacyResponse {
    pub content: String,
}
