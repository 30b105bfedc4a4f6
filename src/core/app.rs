//! Application state and the surface the presentation layer drives.
//!
//! One `App` owns the conversation manager, the agent registry, the
//! pending model selection, the theme, the HTTP client, and the store.
//! Every mutation is persisted before control returns to the caller, so
//! a crash never loses an applied state change.

use serde::{Deserialize, Serialize};

use crate::api::dispatch::dispatch;
use crate::core::agent::{AgentConfig, AgentRegistry};
use crate::core::constants::{
    DEFAULT_MODEL_ID, STORE_KEY_AGENTS, STORE_KEY_CONVERSATIONS, STORE_KEY_THEME,
};
use crate::core::conversation::{Conversation, ConversationManager};
use crate::core::message::{Attachment, Message};
use crate::storage::{JsonStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

pub struct App {
    client: reqwest::Client,
    store: JsonStore,
    manager: ConversationManager,
    registry: AgentRegistry,
    /// Model bound to the *next* new conversation. Independent of any
    /// existing conversation's binding.
    pending_model_id: String,
    theme: Theme,
}

impl App {
    /// Open the store at the platform data directory and load persisted
    /// state.
    pub fn new() -> Result<Self, StoreError> {
        Ok(Self::with_store(JsonStore::open()?))
    }

    /// Load persisted state from an explicit store.
    pub fn with_store(store: JsonStore) -> Self {
        let conversations: Vec<Conversation> = store.get(STORE_KEY_CONVERSATIONS, Vec::new());
        let agents: Vec<AgentConfig> = store.get(STORE_KEY_AGENTS, Vec::new());
        let theme: Theme = store.get(STORE_KEY_THEME, Theme::default());

        Self {
            client: reqwest::Client::new(),
            store,
            manager: ConversationManager::new(conversations),
            registry: AgentRegistry::new(agents),
            pending_model_id: DEFAULT_MODEL_ID.to_string(),
            theme,
        }
    }

    pub fn conversations(&self) -> &[Conversation] {
        self.manager.conversations()
    }

    pub fn ordered_conversations(&self) -> Vec<&Conversation> {
        self.manager.ordered_by_recency()
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.manager.active()
    }

    pub fn agents(&self) -> &[AgentConfig] {
        self.registry.agents()
    }

    /// Agents offered in the model switcher for new conversations.
    pub fn selectable_agents(&self) -> Vec<&AgentConfig> {
        self.registry.active_agents().collect()
    }

    pub fn pending_model_id(&self) -> &str {
        &self.pending_model_id
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Append the user's message, dispatch it to the bound backend, and
    /// append the reply. Returns the appended agent message. The reply is
    /// always applied, error strings included; failures become permanent
    /// conversation history by design.
    pub async fn send_message(
        &mut self,
        text: &str,
        attachment: Option<Attachment>,
    ) -> Option<&Message> {
        let (conversation_id, model_id) =
            self.manager
                .append_user_message(text, attachment.clone(), &self.pending_model_id);
        self.persist_conversations();

        let reply = dispatch(
            &self.client,
            &self.registry,
            &model_id,
            text,
            attachment.as_ref(),
        )
        .await;

        self.manager.append_agent_message(&conversation_id, reply);
        self.persist_conversations();

        self.manager
            .get(&conversation_id)
            .and_then(|conversation| conversation.messages.last())
    }

    pub fn select_conversation(&mut self, id: &str) {
        self.manager.select(id);
    }

    pub fn start_new_conversation(&mut self) {
        self.manager.start_new();
    }

    /// Change the model for the next new conversation. Ignored while a
    /// conversation is active; the active conversation's binding is
    /// immutable.
    pub fn select_pending_model(&mut self, id: &str) {
        if self.manager.active_id().is_none() {
            self.pending_model_id = id.to_string();
        }
    }

    /// Insert or replace an agent. An active agent becomes the pending
    /// model selection.
    pub fn save_agent(&mut self, config: AgentConfig) {
        let id = config.id.clone();
        if self.registry.upsert(config) {
            self.pending_model_id = id;
        }
        self.persist_agents();
    }

    /// Remove an agent. A pending selection pointing at it reverts to the
    /// built-in model; conversations already bound to it keep their id.
    pub fn delete_agent(&mut self, id: &str) {
        self.registry.remove(id);
        if self.pending_model_id == id {
            self.pending_model_id = DEFAULT_MODEL_ID.to_string();
        }
        self.persist_agents();
    }

    /// Flip an agent's active flag. Deactivating the pending selection
    /// reverts it to the built-in model.
    pub fn toggle_agent(&mut self, id: &str) {
        if self.registry.toggle_active(id) == Some(false) && self.pending_model_id == id {
            self.pending_model_id = DEFAULT_MODEL_ID.to_string();
        }
        self.persist_agents();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.persist_theme();
    }

    pub fn toggle_theme(&mut self) {
        self.set_theme(self.theme.toggled());
    }

    fn persist_conversations(&self) {
        if let Err(err) = self
            .store
            .set(STORE_KEY_CONVERSATIONS, &self.manager.conversations())
        {
            tracing::warn!(%err, "failed to persist conversations");
        }
    }

    fn persist_agents(&self) {
        if let Err(err) = self.store.set(STORE_KEY_AGENTS, &self.registry.agents()) {
            tracing::warn!(%err, "failed to persist agents");
        }
    }

    fn persist_theme(&self) {
        if let Err(err) = self.store.set(STORE_KEY_THEME, &self.theme) {
            tracing::warn!(%err, "failed to persist theme");
        }
    }
}
