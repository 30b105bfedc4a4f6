//! Adapter for the hosted generative model.
//!
//! The credential is re-read from the environment on every call so a key
//! change takes effect on the next message without a restart. Every
//! failure mode is converted to a conversational string; nothing here
//! raises to the caller.

use std::error::Error;

use crate::api::{
    ApiErrorBody, Content, GenerateContentRequest, GenerateContentResponse, InlineData, Part,
};
use crate::core::constants::{HOSTED_API_BASE_URL, HOSTED_API_KEY_ENV, HOSTED_MODEL_NAME};
use crate::core::message::Attachment;

pub const MISSING_API_KEY_MESSAGE: &str =
    "API Key not found. Please ensure you have selected a project or configured your environment.";
pub const EMPTY_REPLY_MESSAGE: &str = "No response received from Gemini.";
pub const PROJECT_NOT_FOUND_MESSAGE: &str = "Project Error: The selected API key or project was \
    not found. Please click the key icon to re-select your project.";

/// Error substring the hosted API uses when the configured key or project
/// does not exist; recognized to give a more actionable message.
const ENTITY_NOT_FOUND_MARKER: &str = "entity was not found";

/// Send one message to the hosted model and return the reply as display
/// text. Never fails: configuration and transport problems come back as
/// conversational strings.
pub async fn send_message(
    client: &reqwest::Client,
    text: &str,
    attachment: Option<&Attachment>,
) -> String {
    let api_key = match std::env::var(HOSTED_API_KEY_ENV) {
        Ok(key) if !key.is_empty() => key,
        _ => return MISSING_API_KEY_MESSAGE.to_string(),
    };

    match request_reply(client, &api_key, text, attachment).await {
        Ok(Some(reply)) => reply,
        Ok(None) => EMPTY_REPLY_MESSAGE.to_string(),
        Err(err) => {
            tracing::warn!(%err, "hosted model request failed");
            let detail = err.to_string();
            if detail.contains(ENTITY_NOT_FOUND_MARKER) {
                PROJECT_NOT_FOUND_MESSAGE.to_string()
            } else {
                format!("Gemini Error: {detail}")
            }
        }
    }
}

async fn request_reply(
    client: &reqwest::Client,
    api_key: &str,
    text: &str,
    attachment: Option<&Attachment>,
) -> Result<Option<String>, Box<dyn Error>> {
    let url = format!("{HOSTED_API_BASE_URL}/v1beta/models/{HOSTED_MODEL_NAME}:generateContent");
    let request = GenerateContentRequest {
        contents: vec![build_content(text, attachment)],
    };

    let response = client
        .post(url)
        .header("x-goog-api-key", api_key)
        .json(&request)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(error_detail(status.as_u16(), &body).into());
    }

    let reply: GenerateContentResponse = response.json().await?;
    Ok(reply.text())
}

/// Build the request content. Image attachments become an inline-data
/// part followed by the text (with a default prompt when the text is
/// empty). Non-image attachments are not forwarded to this backend;
/// webhook agents receive them in full (see `api::webhook`).
fn build_content(text: &str, attachment: Option<&Attachment>) -> Content {
    let image_payload = attachment
        .filter(|a| a.is_image())
        .and_then(|a| a.base64_payload().map(|payload| (a, payload)));

    match image_payload {
        Some((image, payload)) => Content {
            parts: vec![
                Part {
                    inline_data: Some(InlineData {
                        mime_type: image.mime_type.clone(),
                        data: payload.to_string(),
                    }),
                    ..Part::default()
                },
                Part {
                    text: Some(if text.is_empty() {
                        "Analyze this image.".to_string()
                    } else {
                        text.to_string()
                    }),
                    ..Part::default()
                },
            ],
        },
        None => Content {
            parts: vec![Part {
                text: Some(text.to_string()),
                ..Part::default()
            }],
        },
    }
}

/// Prefer the structured API error message; fall back to the raw body.
fn error_detail(status: u16, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => format!("status {status}: {}", parsed.error.message),
        Err(_) => format!("status {status}: {body}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::AttachmentKind;

    #[tokio::test]
    async fn missing_credential_short_circuits_without_network() {
        std::env::remove_var(HOSTED_API_KEY_ENV);
        let client = reqwest::Client::new();

        let reply = send_message(&client, "Hello", None).await;

        assert_eq!(reply, MISSING_API_KEY_MESSAGE);
    }

    #[test]
    fn image_attachments_become_inline_data_plus_text() {
        let image = Attachment::from_bytes("photo.png", AttachmentKind::Image, "image/png", b"abc");

        let content = build_content("What is this?", Some(&image));

        assert_eq!(content.parts.len(), 2);
        let inline = content.parts[0].inline_data.as_ref().unwrap();
        assert_eq!(inline.mime_type, "image/png");
        assert_eq!(inline.data, "YWJj");
        assert_eq!(content.parts[1].text.as_deref(), Some("What is this?"));
    }

    #[test]
    fn empty_text_with_an_image_uses_the_default_prompt() {
        let image = Attachment::from_bytes("photo.png", AttachmentKind::Image, "image/png", b"abc");

        let content = build_content("", Some(&image));

        assert_eq!(content.parts[1].text.as_deref(), Some("Analyze this image."));
    }

    #[test]
    fn non_image_attachments_are_not_forwarded() {
        let file =
            Attachment::from_bytes("report.pdf", AttachmentKind::File, "application/pdf", b"%PDF");

        let content = build_content("Summarize this", Some(&file));

        assert_eq!(content.parts.len(), 1);
        assert!(content.parts[0].inline_data.is_none());
        assert_eq!(content.parts[0].text.as_deref(), Some("Summarize this"));
    }

    #[test]
    fn structured_error_bodies_surface_their_message() {
        let body = r#"{"error": {"message": "Requested entity was not found.", "code": 404}}"#;
        let detail = error_detail(404, body);
        assert_eq!(detail, "status 404: Requested entity was not found.");
        assert!(detail.contains(ENTITY_NOT_FOUND_MARKER));
    }

    #[test]
    fn unstructured_error_bodies_pass_through() {
        assert_eq!(error_detail(500, "oops"), "status 500: oops");
    }
}
