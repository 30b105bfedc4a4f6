//! Routes one outgoing message to its resolved backend.

use crate::api::{hosted, webhook};
use crate::core::agent::AgentRegistry;
use crate::core::constants::DEFAULT_MODEL_ID;
use crate::core::message::Attachment;

pub const AGENT_UNAVAILABLE_MESSAGE: &str = "Error: This agent is no longer available.";

/// Resolve `model_id` and invoke the matching adapter, returning the
/// reply as display text.
///
/// Exactly one of three paths runs: the hosted model for the sentinel id,
/// the webhook adapter for a registered agent (active or not; a
/// conversation bound to a deactivated agent stays dispatchable), or a
/// fixed no-longer-available string when the id matches nothing. Adapters
/// convert their own failures, so this never returns an error.
pub async fn dispatch(
    client: &reqwest::Client,
    registry: &AgentRegistry,
    model_id: &str,
    text: &str,
    attachment: Option<&Attachment>,
) -> String {
    if model_id == DEFAULT_MODEL_ID {
        tracing::debug!("dispatching to hosted model");
        return hosted::send_message(client, text, attachment).await;
    }

    match registry.get(model_id) {
        Some(agent) => {
            tracing::debug!(agent = %agent.name, "dispatching to webhook agent");
            webhook::send_message(client, agent, text, attachment).await
        }
        None => {
            tracing::debug!(model_id, "dispatch target no longer registered");
            AGENT_UNAVAILABLE_MESSAGE.to_string()
        }
    }
}
