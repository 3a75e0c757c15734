use serde::{Deserialize, Serialize};

use super::FlexibleId;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
pub const DEFAULT_USER_PROMPT: &str = "Context: {context}\n\nQuestion: {query}";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            temperature: 0.7,
            max_tokens: 500,
            top_p: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalConfig {
    pub top_k: u32,
    pub similarity_threshold: f64,
    pub chunk_size: u32,
    pub chunk_overlap: u32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            similarity_threshold: 0.7,
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    pub llm: LlmConfig,
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfigResponse {
    pub success: bool,
    pub config: RagConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prompts {
    pub system: String,
    pub user: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            system: DEFAULT_SYSTEM_PROMPT.to_string(),
            user: DEFAULT_USER_PROMPT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptsResponse {
    pub success: bool,
    pub prompts: Prompts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    System,
    User,
}

impl PromptKind {
    /// Settings key the prompt is stored under.
    pub fn setting_key(&self) -> &'static str {
        match self {
            PromptKind::System => "system_prompt",
            PromptKind::User => "user_prompt",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RagContext {
    pub document_id: FlexibleId,
    pub document_title: String,
    pub chunk_text: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RagTestResponse {
    pub success: bool,
    pub query: String,
    pub response: String,
    pub context_used: Vec<RagContext>,
    pub tokens_used: u64,
    pub time_ms: f64,
}
