use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How an attachment should be treated by backends: images may be sent to
/// the hosted model as inline data, generic files are only forwarded to
/// webhook agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    File,
}

/// A file attached to a user message. Immutable once created; owned by the
/// message that carries it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(rename = "size")]
    pub size_bytes: u64,
    /// Base64 data URI (`data:<mime>;base64,<payload>`).
    pub data: String,
}

impl Attachment {
    /// Build an attachment from raw bytes, encoding them as a data URI.
    pub fn from_bytes(
        name: impl Into<String>,
        kind: AttachmentKind,
        mime_type: impl Into<String>,
        bytes: &[u8],
    ) -> Self {
        let name = name.into();
        let mime_type = mime_type.into();
        let data = format!("data:{};base64,{}", mime_type, BASE64.encode(bytes));
        Self {
            name,
            kind,
            mime_type,
            size_bytes: bytes.len() as u64,
            data,
        }
    }

    pub fn is_image(&self) -> bool {
        self.kind == AttachmentKind::Image
    }

    /// The base64 payload of the data URI, with the
    /// `data:<mime>;base64,` prefix stripped.
    pub fn base64_payload(&self) -> Option<&str> {
        self.data.split_once(',').map(|(_, payload)| payload)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Agent,
}

impl MessageRole {
    pub fn is_user(self) -> bool {
        self == MessageRole::User
    }

    pub fn is_agent(self) -> bool {
        self == MessageRole::Agent
    }
}

/// One entry in a conversation transcript. Created once, never mutated,
/// appended to exactly one conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            attachment: None,
        }
    }

    pub fn user(content: impl Into<String>, attachment: Option<Attachment>) -> Self {
        Self {
            attachment,
            ..Self::new(MessageRole::User, content)
        }
    }

    pub fn agent(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Agent, content)
    }

    pub fn is_user(&self) -> bool {
        self.role.is_user()
    }

    pub fn is_agent(&self) -> bool {
        self.role.is_agent()
    }
}
