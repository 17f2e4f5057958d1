use serde::{Deserialize, Serialize};
use validator::Validate;

/// Chat model selection exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ModelName {
    #[default]
    #[serde(rename = "deepseek-v3-250324")]
    DeepseekV3,
    #[serde(rename = "deepseek-r1-250120")]
    DeepseekR1,
}

impl ModelName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelName::DeepseekV3 => "deepseek-v3-250324",
            ModelName::DeepseekR1 => "deepseek-r1-250120",
        }
    }
}

/// Alcohol strength preference in a bartender request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlcoholPreference {
    Low,
    Medium,
    High,
    #[default]
    Any,
}

impl AlcoholPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlcoholPreference::Low => "low",
            AlcoholPreference::Medium => "medium",
            AlcoholPreference::High => "high",
            AlcoholPreference::Any => "any",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
    #[default]
    Any,
}

impl DifficultyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "easy",
            DifficultyLevel::Medium => "medium",
            DifficultyLevel::Hard => "hard",
            DifficultyLevel::Any => "any",
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AgentRequest {
    #[validate(length(min = 1, max = 4000))]
    pub message: String,
    /// Falls back to the configured default chat model when omitted.
    pub model: Option<ModelName>,
    pub user_id: Option<i64>,
    pub session_id: Option<String>,
}

/// Bartender request: free-text need plus the multiple-choice constraints
/// collected by the client UI.
#[derive(Debug, Deserialize, Validate)]
pub struct BartenderRequest {
    #[validate(length(min = 1, max = 4000))]
    pub message: String,
    pub model: Option<ModelName>,
    pub user_id: Option<i64>,
    pub session_id: Option<String>,

    #[serde(default)]
    pub alcohol_level: AlcoholPreference,
    pub has_tools: Option<bool>,
    #[serde(default)]
    pub difficulty_level: DifficultyLevel,
    pub base_spirits: Option<Vec<String>>,
}

impl BartenderRequest {
    /// Compose the user prompt from the free-text need and any constraints
    /// the client filled in.
    pub fn user_prompt(&self) -> String {
        let mut prompt = format!("User need: {}\n", self.message);

        let mut conditions = Vec::new();
        if self.alcohol_level != AlcoholPreference::Any {
            conditions.push(format!("Alcohol level: {}", self.alcohol_level.as_str()));
        }
        if let Some(has_tools) = self.has_tools {
            conditions.push(format!(
                "Has bartending tools: {}",
                if has_tools { "yes" } else { "no" }
            ));
        }
        if self.difficulty_level != DifficultyLevel::Any {
            conditions.push(format!("Difficulty: {}", self.difficulty_level.as_str()));
        }
        if let Some(spirits) = &self.base_spirits {
            if !spirits.is_empty() {
                conditions.push(format!("Available base spirits: {}", spirits.join(", ")));
            }
        }

        if !conditions.is_empty() {
            prompt.push_str("Other conditions:\n");
            prompt.push_str(&conditions.join("\n"));
        }

        prompt
    }
}

/// Query parameters shared by the cocktail image endpoints.
#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub user_id: i64,
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImageResponse {
    pub image_url: String,
}
