use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-configured webhook endpoint treated as an alternative chat
/// backend. `id` is stable for the agent's lifetime; everything else may
/// be edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub id: String,
    pub name: String,
    #[serde(rename = "webhookUrl")]
    pub webhook_url: String,
    /// Bearer token sent as `Authorization: Bearer <token>` when present.
    #[serde(rename = "authToken", skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(rename = "isActive")]
    pub is_active: bool,
}

impl AgentConfig {
    pub fn new(
        name: impl Into<String>,
        webhook_url: impl Into<String>,
        auth_token: Option<String>,
        is_active: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            webhook_url: webhook_url.into(),
            auth_token,
            is_active,
        }
    }
}

/// In-memory registry of agent configurations, keyed by id. Mutations are
/// synchronous and total; persistence is the caller's concern.
#[derive(Debug, Default, Clone)]
pub struct AgentRegistry {
    agents: Vec<AgentConfig>,
}

impl AgentRegistry {
    pub fn new(agents: Vec<AgentConfig>) -> Self {
        Self { agents }
    }

    pub fn get(&self, id: &str) -> Option<&AgentConfig> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn agents(&self) -> &[AgentConfig] {
        &self.agents
    }

    /// Agents selectable as the model for a new conversation. Deactivated
    /// agents are hidden here but stay dispatchable for conversations
    /// already bound to them.
    pub fn active_agents(&self) -> impl Iterator<Item = &AgentConfig> {
        self.agents.iter().filter(|a| a.is_active)
    }

    /// Replace the entry whose id matches `config`, or insert it if
    /// absent. Returns true when the caller should adopt the agent as the
    /// pending model selection.
    pub fn upsert(&mut self, config: AgentConfig) -> bool {
        let adopt = config.is_active;
        match self.agents.iter_mut().find(|a| a.id == config.id) {
            Some(existing) => *existing = config,
            None => self.agents.push(config),
        }
        adopt
    }

    /// Delete the entry. Returns true when an entry was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.agents.len();
        self.agents.retain(|a| a.id != id);
        self.agents.len() != before
    }

    /// Flip an agent's active flag. Returns the new state, or `None` when
    /// the id is unknown.
    pub fn toggle_active(&mut self, id: &str) -> Option<bool> {
        let agent = self.agents.iter_mut().find(|a| a.id == id)?;
        agent.is_active = !agent.is_active;
        Some(agent.is_active)
    }
}
