use serde::{Deserialize, Serialize};

use super::FlexibleId;

/// Vector database health block of the system-health endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VectorDbStatus {
    pub status: String,
    pub collection: String,
    pub vectors: u64,
    pub points: u64,
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SystemStatus {
    pub success: bool,
    pub qdrant: VectorDbStatus,
    pub timestamp: String,
}

/// Headline counters from `GET /api/dashboard/stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardStats {
    pub success: bool,
    pub total_messages: u64,
    pub avg_response_time_ms: f64,
    pub total_tokens: u64,
    pub recent_messages_7d: u64,
    pub today_messages: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QuerySource {
    pub id: FlexibleId,
    pub title: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TestQueryResult {
    pub success: bool,
    pub query: String,
    pub response: String,
    pub sources: Vec<QuerySource>,
    pub tokens: u64,
    pub time_ms: f64,
    pub docs_retrieved: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval_time_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_time_ms: Option<f64>,
}
