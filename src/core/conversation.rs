use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::constants::{DEFAULT_CONVERSATION_TITLE, TITLE_MAX_CHARS};
use crate::core::message::{Attachment, Message};

/// A titled, time-ordered message transcript bound to exactly one backend
/// for its lifetime: `model_id` is fixed at creation and never changes,
/// even if the agent it names is later deactivated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    /// Last-activity instant, refreshed when the user sends a message.
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "modelId")]
    pub model_id: String,
}

impl Conversation {
    fn create(first_message: Message, model_id: &str) -> Self {
        let title = derive_title(&first_message.content, first_message.attachment.as_ref());
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            messages: vec![first_message],
            timestamp: Utc::now(),
            model_id: model_id.to_string(),
        }
    }
}

/// Derive a conversation title from its first message: the text, the
/// attachment name as a fallback, or a fixed default. Either source is
/// truncated to [`TITLE_MAX_CHARS`] characters plus an ellipsis.
pub fn derive_title(text: &str, attachment: Option<&Attachment>) -> String {
    if !text.is_empty() {
        return truncate_title(text);
    }
    if let Some(attachment) = attachment {
        if !attachment.name.is_empty() {
            return truncate_title(&attachment.name);
        }
    }
    DEFAULT_CONVERSATION_TITLE.to_string()
}

fn truncate_title(text: &str) -> String {
    if text.chars().count() > TITLE_MAX_CHARS {
        let head: String = text.chars().take(TITLE_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// Owns the conversation collection and the active-conversation pointer,
/// and appends messages in order. Conversations are created lazily: a new
/// record only exists once the first message is actually sent.
#[derive(Debug, Default)]
pub struct ConversationManager {
    conversations: Vec<Conversation>,
    active_id: Option<String>,
}

impl ConversationManager {
    pub fn new(conversations: Vec<Conversation>) -> Self {
        Self {
            conversations,
            active_id: None,
        }
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn active(&self) -> Option<&Conversation> {
        self.active_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// All conversations, most recent activity first.
    pub fn ordered_by_recency(&self) -> Vec<&Conversation> {
        let mut ordered: Vec<&Conversation> = self.conversations.iter().collect();
        ordered.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        ordered
    }

    /// Clear the active pointer. No record is created until the next
    /// message is sent.
    pub fn start_new(&mut self) {
        self.active_id = None;
    }

    /// Point at an existing conversation. Unknown ids are a defensive
    /// no-op.
    pub fn select(&mut self, id: &str) {
        if self.get(id).is_some() {
            self.active_id = Some(id.to_string());
        } else {
            tracing::debug!(id, "select ignored: unknown conversation");
        }
    }

    /// Append a user message to the active conversation, creating one
    /// bound to `pending_model_id` when none is active. Returns the
    /// conversation id and the model id to dispatch to.
    pub fn append_user_message(
        &mut self,
        text: &str,
        attachment: Option<Attachment>,
        pending_model_id: &str,
    ) -> (String, String) {
        let message = Message::user(text, attachment);

        if let Some(active) = self.active_id.clone() {
            if let Some(conversation) = self.conversations.iter_mut().find(|c| c.id == active) {
                conversation.messages.push(message);
                conversation.timestamp = Utc::now();
                return (conversation.id.clone(), conversation.model_id.clone());
            }
        }

        let conversation = Conversation::create(message, pending_model_id);
        let ids = (conversation.id.clone(), conversation.model_id.clone());
        self.active_id = Some(conversation.id.clone());
        self.conversations.push(conversation);
        ids
    }

    /// Append an agent reply. The activity timestamp is intentionally not
    /// refreshed: recency reflects the user's last send.
    pub fn append_agent_message(&mut self, conversation_id: &str, text: impl Into<String>) {
        match self
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
        {
            Some(conversation) => conversation.messages.push(Message::agent(text)),
            None => tracing::debug!(conversation_id, "agent reply dropped: unknown conversation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::DEFAULT_MODEL_ID;
    use crate::core::message::AttachmentKind;

    fn attachment(name: &str) -> Attachment {
        Attachment::from_bytes(name, AttachmentKind::File, "application/pdf", b"%PDF")
    }

    #[test]
    fn short_text_titles_are_unmodified() {
        assert_eq!(derive_title("Hello", None), "Hello");
        assert_eq!(
            derive_title("exactly-thirty-characters-long", None),
            "exactly-thirty-characters-long"
        );
    }

    #[test]
    fn long_text_titles_are_truncated_with_an_ellipsis() {
        let text = "This message is certainly longer than thirty characters";
        let title = derive_title(text, None);
        assert_eq!(title, format!("{}...", &text[..30]));
        assert_eq!(title.chars().count(), 33);
    }

    #[test]
    fn attachment_name_titles_an_otherwise_empty_message() {
        let att = attachment("report.pdf");
        assert_eq!(derive_title("", Some(&att)), "report.pdf");
    }

    #[test]
    fn empty_first_message_falls_back_to_the_default_title() {
        assert_eq!(derive_title("", None), "New Chat");
    }

    #[test]
    fn first_send_creates_and_activates_a_conversation() {
        let mut manager = ConversationManager::default();
        assert!(manager.active().is_none());

        let (id, model_id) = manager.append_user_message("Hello", None, DEFAULT_MODEL_ID);

        assert_eq!(model_id, DEFAULT_MODEL_ID);
        assert_eq!(manager.active_id(), Some(id.as_str()));
        let conversation = manager.get(&id).unwrap();
        assert_eq!(conversation.title, "Hello");
        assert_eq!(conversation.messages.len(), 1);
        assert!(conversation.messages[0].is_user());
    }

    #[test]
    fn user_then_agent_append_grows_the_transcript_by_two_in_order() {
        let mut manager = ConversationManager::default();
        let (id, _) = manager.append_user_message("Hi", None, DEFAULT_MODEL_ID);
        let before = manager.get(&id).unwrap().messages.len();

        manager.append_user_message("How are you?", None, DEFAULT_MODEL_ID);
        manager.append_agent_message(&id, "Fine, thanks.");

        let messages = &manager.get(&id).unwrap().messages;
        assert_eq!(messages.len(), before + 2);
        assert!(messages[before].is_user());
        assert!(messages[before + 1].is_agent());
    }

    #[test]
    fn model_binding_survives_pending_model_changes() {
        let mut manager = ConversationManager::default();
        let (id, _) = manager.append_user_message("Hello", None, "agent-1");

        // Later sends use the conversation's own binding, not the pending
        // selection passed in.
        let (_, model_id) = manager.append_user_message("Again", None, "agent-2");

        assert_eq!(model_id, "agent-1");
        assert_eq!(manager.get(&id).unwrap().model_id, "agent-1");
    }

    #[test]
    fn select_unknown_id_is_a_no_op() {
        let mut manager = ConversationManager::default();
        let (id, _) = manager.append_user_message("Hello", None, DEFAULT_MODEL_ID);

        manager.select("not-a-conversation");

        assert_eq!(manager.active_id(), Some(id.as_str()));
    }

    #[test]
    fn start_new_clears_the_active_pointer_without_creating_a_record() {
        let mut manager = ConversationManager::default();
        manager.append_user_message("Hello", None, DEFAULT_MODEL_ID);

        manager.start_new();

        assert!(manager.active().is_none());
        assert_eq!(manager.conversations().len(), 1);
    }

    #[test]
    fn recency_ordering_follows_user_activity() {
        let mut manager = ConversationManager::default();
        let (first, _) = manager.append_user_message("first", None, DEFAULT_MODEL_ID);
        manager.start_new();
        let (second, _) = manager.append_user_message("second", None, DEFAULT_MODEL_ID);

        // Sending in the first conversation again bumps it to the top.
        manager.select(&first);
        manager.append_user_message("back here", None, DEFAULT_MODEL_ID);

        let ordered: Vec<&str> = manager
            .ordered_by_recency()
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ordered, vec![first.as_str(), second.as_str()]);
    }

    #[test]
    fn agent_reply_does_not_bump_the_activity_timestamp() {
        let mut manager = ConversationManager::default();
        let (id, _) = manager.append_user_message("Hello", None, DEFAULT_MODEL_ID);
        let before = manager.get(&id).unwrap().timestamp;

        manager.append_agent_message(&id, "reply");

        assert_eq!(manager.get(&id).unwrap().timestamp, before);
    }

    #[test]
    fn agent_reply_to_unknown_conversation_is_dropped() {
        let mut manager = ConversationManager::default();
        manager.append_agent_message("ghost", "reply");
        assert!(manager.conversations().is_empty());
    }
}
