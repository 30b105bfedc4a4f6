//! Shared constants used across the application.

/// Sentinel model id selecting the built-in hosted model rather than a
/// configured agent. Conversations carry this id for their whole lifetime.
pub const DEFAULT_MODEL_ID: &str = "default-model";

/// Hosted model invoked for conversations bound to [`DEFAULT_MODEL_ID`].
pub const HOSTED_MODEL_NAME: &str = "gemini-3-flash-preview";

/// Base URL of the hosted model's REST API.
pub const HOSTED_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Environment variable holding the hosted model credential. Re-read on
/// every request so a credential change takes effect without a restart.
pub const HOSTED_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Maximum number of characters of the first message (or attachment name)
/// used for a conversation title before truncation.
pub const TITLE_MAX_CHARS: usize = 30;

/// Title given to a conversation whose first message has neither text nor
/// a named attachment.
pub const DEFAULT_CONVERSATION_TITLE: &str = "New Chat";

/// Storage key for the conversation collection.
pub const STORE_KEY_CONVERSATIONS: &str = "chatHistory";

/// Storage key for the agent registry.
pub const STORE_KEY_AGENTS: &str = "customAgents";

/// Storage key for the UI theme.
pub const STORE_KEY_THEME: &str = "theme";
