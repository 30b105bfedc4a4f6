//! Adapter for user-configured webhook agents.
//!
//! One POST per message, attachment forwarded in full for both image and
//! generic file kinds. The reply body may be any JSON shape; it goes
//! through the normalizer. Like the hosted adapter, every failure mode is
//! converted to a conversational string.

use std::error::Error as StdError;
use std::fmt;

use serde_json::Value;

use crate::api::normalize::normalize;
use crate::api::{WebhookAttachment, WebhookRequest};
use crate::core::agent::AgentConfig;
use crate::core::message::Attachment;

/// Failures talking to a webhook agent.
#[derive(Debug)]
pub enum WebhookError {
    /// The agent answered with a non-2xx status.
    Status {
        /// HTTP status code the agent returned.
        status: u16,
        /// The webhook URL that was called.
        url: String,
    },

    /// The host was unreachable, the URL invalid, or the request blocked
    /// before any HTTP status came back.
    Connect { source: reqwest::Error },

    /// Any other transport or decode failure.
    Transport { source: reqwest::Error },
}

impl fmt::Display for WebhookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebhookError::Status { status, url } => {
                write!(f, "Agent returned status {status}. URL: {url}")
            }
            WebhookError::Connect { source } => write!(f, "Connection failed: {source}"),
            WebhookError::Transport { source } => write!(f, "{source}"),
        }
    }
}

impl StdError for WebhookError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            WebhookError::Status { .. } => None,
            WebhookError::Connect { source } => Some(source),
            WebhookError::Transport { source } => Some(source),
        }
    }
}

/// Send one message to a webhook agent and return the normalized reply.
pub async fn send_message(
    client: &reqwest::Client,
    agent: &AgentConfig,
    text: &str,
    attachment: Option<&Attachment>,
) -> String {
    match post_message(client, agent, text, attachment).await {
        Ok(body) => normalize(&body),
        Err(err @ WebhookError::Connect { .. }) => {
            tracing::warn!(agent = %agent.name, %err, "webhook unreachable");
            connection_failed_message(&agent.name)
        }
        Err(err) => {
            tracing::warn!(agent = %agent.name, %err, "webhook request failed");
            format!("Error: {err}")
        }
    }
}

pub fn connection_failed_message(agent_name: &str) -> String {
    format!(
        "Connection failed for \"{agent_name}\". This is likely a CORS issue or an invalid \
         webhook URL. Ensure the agent's endpoint allows requests from this origin."
    )
}

async fn post_message(
    client: &reqwest::Client,
    agent: &AgentConfig,
    text: &str,
    attachment: Option<&Attachment>,
) -> Result<Value, WebhookError> {
    let body = WebhookRequest {
        chat_input: text,
        attachment: attachment.map(WebhookAttachment::from_attachment),
    };

    let mut request = client
        .post(&agent.webhook_url)
        .header("Content-Type", "application/json")
        .json(&body);

    if let Some(token) = &agent.auth_token {
        request = request.header("Authorization", format!("Bearer {token}"));
    }

    let response = request.send().await.map_err(|source| {
        if source.is_connect() || source.is_builder() {
            WebhookError::Connect { source }
        } else {
            WebhookError::Transport { source }
        }
    })?;

    if !response.status().is_success() {
        return Err(WebhookError::Status {
            status: response.status().as_u16(),
            url: agent.webhook_url.clone(),
        });
    }

    response
        .json()
        .await
        .map_err(|source| WebhookError::Transport { source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_carry_the_code_and_target_url() {
        let err = WebhookError::Status {
            status: 404,
            url: "https://example.com/hook".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Agent returned status 404. URL: https://example.com/hook"
        );
    }

    #[test]
    fn connection_failure_message_names_the_agent() {
        let message = connection_failed_message("Invoice Bot");
        assert!(message.starts_with("Connection failed for \"Invoice Bot\"."));
        assert!(message.contains("CORS"));
    }

    #[tokio::test]
    async fn unresolvable_hosts_surface_the_cors_hint() {
        let client = reqwest::Client::new();
        let agent = AgentConfig::new(
            "Lost Agent",
            "http://definitely-not-a-real-host.invalid/hook",
            None,
            true,
        );

        let reply = send_message(&client, &agent, "ping", None).await;

        assert_eq!(reply, connection_failed_message("Lost Agent"));
    }
}
