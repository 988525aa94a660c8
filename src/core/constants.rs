//! Shared constants used across the application

/// Instructions prepended to every outbound request. Never stored in the
/// conversation transcript.
pub const SYSTEM_PREAMBLE: &str = "When providing answers, use markdown when applicable including formatting, lists, tables, codeblocks, etc.";

/// Assistant message seeded into every new conversation.
pub const GREETING: &str = "Hello! How can I help you today?";

/// Shown in place of a reply when a request fails for any reason.
pub const FALLBACK_REPLY: &str =
    "Sorry, I couldn't connect to the AI service. Please try again later.";

pub const DEFAULT_MODEL: &str = "claude-3.7-sonnet";
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

/// Gateway base; the chat endpoint lives at `{base}/chat`.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Environment variable overriding the gateway base URL.
pub const BASE_URL_ENV: &str = "CAUSERIE_BASE_URL";
