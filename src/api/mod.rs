//! Wire payloads for the two chat backends.
//!
//! The hosted model speaks the `generateContent` REST shape; webhook
//! agents receive a small JSON body and may answer with arbitrary JSON,
//! which [`normalize`] reduces to display text.

use serde::{Deserialize, Serialize};

use crate::core::message::Attachment;

pub mod dispatch;
pub mod hosted;
pub mod normalize;
pub mod webhook;

#[derive(Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Serialize, Deserialize, Default)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64 payload without the data-URI prefix.
    pub data: String,
}

#[derive(Deserialize, Default)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// The reply text: all text parts of the first candidate, joined.
    /// `None` when the reply carries no text at all.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Error body returned by the hosted API on non-2xx responses.
#[derive(Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest<'a> {
    pub chat_input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<WebhookAttachment<'a>>,
}

/// Attachment as forwarded to webhook agents: full payload, both image
/// and generic file kinds.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAttachment<'a> {
    pub name: &'a str,
    pub mime_type: &'a str,
    pub size: u64,
    pub data: &'a str,
}

impl<'a> WebhookAttachment<'a> {
    pub fn from_attachment(attachment: &'a Attachment) -> Self {
        Self {
            name: &attachment.name,
            mime_type: &attachment.mime_type,
            size: attachment.size_bytes,
            data: &attachment.data,
        }
    }
}
