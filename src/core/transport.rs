use std::error::Error as StdError;
use std::fmt;

use reqwest::StatusCode;
use tokio::sync::mpsc;
use tracing::debug;

use crate::api::{ChatMessage, ChatRequest, CompletionResponse, LegacyResponse};
use crate::core::conversation::TurnRequest;
use crate::core::preferences::Preferences;

/// An assistant reply reduced to the one field the rest of the app consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResponse {
    pub content: String,
}

#[derive(Debug)]
pub enum TransportError {
    /// The request never produced an HTTP response.
    Request(reqwest::Error),
    /// The gateway answered with a non-success status.
    Status { status: StatusCode, body: String },
    /// The gateway answered 2xx but the body matched no known shape.
    Normalization(NormalizationError),
}

#[derive(Debug, PartialEq, Eq)]
pub enum NormalizationError {
    /// A completion-shaped body with an empty `choices` array.
    EmptyChoices,
    /// Neither the completion shape nor the legacy shape matched.
    UnrecognizedBody,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Request(source) => write!(f, "Request failed: {}", source),
            TransportError::Status { status, body } => {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    write!(f, "Chat endpoint returned {}", status)
                } else {
                    write!(f, "Chat endpoint returned {}: {}", status, trimmed)
                }
            }
            TransportError::Normalization(source) => {
                write!(f, "Unexpected response shape: {}", source)
            }
        }
    }
}

impl StdError for TransportError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            TransportError::Request(source) => Some(source),
            TransportError::Status { .. } => None,
            TransportError::Normalization(source) => Some(source),
        }
    }
}

impl fmt::Display for NormalizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizationError::EmptyChoices => write!(f, "response contained no choices"),
            NormalizationError::UnrecognizedBody => {
                write!(f, "response matched no known shape")
            }
        }
    }
}

impl StdError for NormalizationError {}

impl From<NormalizationError> for TransportError {
    fn from(source: NormalizationError) -> Self {
        TransportError::Normalization(source)
    }
}

/// Reduces a response body to the assistant text.
///
/// The completion shape is tried first; a body that parses as it but carries
/// no choices is a hard failure rather than a fallthrough. Only bodies that
/// do not parse as the completion shape at all are retried as the legacy
/// shape.
fn normalize_body(body: &str) -> Result<NormalizedResponse, NormalizationError> {
    if let Ok(completion) = serde_json::from_str::<CompletionResponse>(body) {
        return match completion.choices.into_iter().next() {
            Some(choice) => Ok(NormalizedResponse {
                content: choice.message.content,
            }),
            None => Err(NormalizationError::EmptyChoices),
        };
    }

    if let Ok(legacy) = serde_json::from_str::<LegacyResponse>(body) {
        return Ok(NormalizedResponse {
            content: legacy.content,
        });
    }

    Err(NormalizationError::UnrecognizedBody)
}

fn interpret_response(status: StatusCode, body: &str) -> Result<NormalizedResponse, TransportError> {
    if !status.is_success() {
        return Err(TransportError::Status {
            status,
            body: body.to_string(),
        });
    }
    normalize_body(body).map_err(TransportError::from)
}

/// HTTP client for the gateway's fixed chat endpoint.
#[derive(Clone)]
pub struct ChatTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl ChatTransport {
    pub fn new(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        ChatTransport {
            client: reqwest::Client::new(),
            endpoint: format!("{base}/chat"),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one completion request and normalizes the reply.
    pub async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        preferences: &Preferences,
    ) -> Result<NormalizedResponse, TransportError> {
        let request = ChatRequest {
            model: preferences.model.clone(),
            temperature: preferences.temperature,
            messages,
        };

        debug!(
            endpoint = %self.endpoint,
            model = %request.model,
            messages = request.messages.len(),
            "sending completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(TransportError::Request)?;

        let status = response.status();
        let body = if status.is_success() {
            response.text().await.map_err(TransportError::Request)?
        } else {
            response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string())
        };

        interpret_response(status, &body)
    }
}

/// One settled completion attempt, tagged with the turn it belongs to.
#[derive(Debug)]
pub struct TurnOutcome {
    pub turn_id: u64,
    pub result: Result<NormalizedResponse, TransportError>,
}

/// Runs completion requests off the UI task and reports outcomes over a
/// channel, so the event loop never blocks on the network.
#[derive(Clone)]
pub struct CompletionService {
    tx: mpsc::UnboundedSender<TurnOutcome>,
}

impl CompletionService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TurnOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn spawn_complete(
        &self,
        transport: ChatTransport,
        request: TurnRequest,
        preferences: Preferences,
    ) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = transport.complete(request.messages, &preferences).await;
            let _ = tx.send(TurnOutcome {
                turn_id: request.turn_id,
                result,
            });
        });
    }
}
