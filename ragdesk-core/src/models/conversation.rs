use serde::{Deserialize, Serialize};

use super::{null_default, FlexibleId, DEFAULT_LIMIT, DEFAULT_PAGE};

/// One flat message row from `GET /api/messages`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MessageRecord {
    #[serde(default)]
    pub conversation_id: Option<FlexibleId>,
    #[serde(default)]
    pub user_id: Option<FlexibleId>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_default")]
    pub created_at: String,
}

/// Backend page of messages: `{ total, data }`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MessagePage {
    pub total: Option<u64>,
    #[serde(deserialize_with = "null_default")]
    pub data: Vec<MessageRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    Active,
    Ended,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationSummary {
    pub id: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub last_message: String,
    pub last_message_time: String,
    pub status: ConversationStatus,
    pub message_count: u32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatusFilter {
    Active,
    Ended,
    All,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversationListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ConversationStatusFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl ConversationListParams {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    /// Query parameters with page and limit always present.
    pub fn resolved(&self) -> Self {
        Self {
            page: Some(self.page()),
            limit: Some(self.limit()),
            ..self.clone()
        }
    }
}

/// Aggregated conversation page.
///
/// `total` is the backend's message total across all pages, while
/// `conversations` only covers the messages of the fetched page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationListResponse {
    pub success: bool,
    pub conversations: Vec<ConversationSummary>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationDetailResponse {
    pub success: bool,
    pub conversation: serde_json::Value,
}
