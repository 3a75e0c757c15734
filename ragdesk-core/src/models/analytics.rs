use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TopUser {
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub message_count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyticsOverview {
    pub total_messages: u64,
    pub active_users: u64,
    pub avg_response_time_ms: f64,
    pub total_tokens: u64,
    pub messages_today: u64,
    pub messages_7d: u64,
    pub messages_30d: u64,
    pub top_users: Vec<TopUser>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MessageVolume {
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TokenUsage {
    pub date: String,
    pub tokens: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PopularQuery {
    pub query: String,
    pub count: u64,
    pub avg_response_time_ms: f64,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AnalyticsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyticsOverviewResponse {
    pub success: bool,
    pub data: AnalyticsOverview,
}

/// `{ success, data: [...] }` chart series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> SeriesResponse<T> {
    pub fn empty() -> Self {
        Self {
            success: true,
            data: Vec::new(),
        }
    }
}
