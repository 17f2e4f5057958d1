//! Conversational agents composed over a [`ChatProvider`].

pub mod prompts;

use crate::models::BartenderResponse;
use crate::services::providers::{
    ChatMessage, ChatProvider, CompletionParams, ProviderError, ProviderStream,
};
use std::sync::Arc;

/// The agent roster exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    ClassicBartender,
    CreativeBartender,
    CasualChat,
}

impl AgentKind {
    pub fn id(&self) -> &'static str {
        match self {
            AgentKind::ClassicBartender => "classic_bartender",
            AgentKind::CreativeBartender => "creative_bartender",
            AgentKind::CasualChat => "casual_chat",
        }
    }

    pub fn all() -> [AgentKind; 3] {
        [
            AgentKind::ClassicBartender,
            AgentKind::CreativeBartender,
            AgentKind::CasualChat,
        ]
    }

    fn system_prompt(&self) -> String {
        match self {
            AgentKind::ClassicBartender => format!(
                "{}\n\n{}",
                prompts::CLASSIC_BARTENDER_DESCRIPTION,
                prompts::BARTENDER_OUTPUT_INSTRUCTIONS
            ),
            AgentKind::CreativeBartender => format!(
                "{}\n\n{}",
                prompts::CREATIVE_BARTENDER_DESCRIPTION,
                prompts::BARTENDER_OUTPUT_INSTRUCTIONS
            ),
            AgentKind::CasualChat => format!(
                "{}\n\n{}",
                prompts::CASUAL_CHAT_DESCRIPTION,
                prompts::CASUAL_CHAT_INSTRUCTIONS
            ),
        }
    }

    fn wants_json(&self) -> bool {
        matches!(
            self,
            AgentKind::ClassicBartender | AgentKind::CreativeBartender
        )
    }
}

/// A configured agent: persona plus provider plus model.
pub struct Agent {
    kind: AgentKind,
    provider: Arc<dyn ChatProvider>,
    model: String,
    system_prompt: String,
}

impl Agent {
    pub fn new(
        kind: AgentKind,
        provider: Arc<dyn ChatProvider>,
        model: impl Into<String>,
        user_id: Option<i64>,
    ) -> Self {
        let mut system_prompt = kind.system_prompt();
        if let Some(user_id) = user_id {
            system_prompt.push_str(&format!(
                "\n<context>You are interacting with user {}</context>",
                user_id
            ));
        }
        Self {
            kind,
            provider,
            model: model.into(),
            system_prompt,
        }
    }

    fn params(&self) -> CompletionParams {
        CompletionParams {
            temperature: Some(0.7),
            max_tokens: None,
            json_output: self.kind.wants_json(),
        }
    }

    fn messages(&self, message: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system_prompt.clone()),
            ChatMessage::user(message),
        ]
    }

    /// Full text completion.
    pub async fn run(&self, message: &str) -> Result<String, ProviderError> {
        self.provider
            .complete(&self.model, &self.messages(message), &self.params())
            .await
    }

    /// Streaming completion.
    pub async fn run_stream(&self, message: &str) -> Result<ProviderStream, ProviderError> {
        self.provider
            .complete_stream(&self.model, &self.messages(message), &self.params())
            .await
    }

    /// Completion parsed into the structured bartender reply. Tolerates
    /// markdown code fences around the JSON body.
    pub async fn run_bartender(&self, message: &str) -> Result<BartenderResponse, ProviderError> {
        let raw = self.run(message).await?;
        let json = strip_code_fences(&raw);
        serde_json::from_str(json).map_err(|e| {
            tracing::warn!(agent = self.kind.id(), error = %e, "Unparseable agent reply");
            ProviderError::ApiError(format!("Malformed structured agent reply: {}", e))
        })
    }
}

/// Models often wrap JSON replies in ``` fences even when asked not to.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.trim().strip_suffix("```").unwrap_or(inner).trim()
}
