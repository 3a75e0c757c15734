use chrono::Utc;
use serde_json::Value;

use crate::adapter;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::system::{DashboardStats, SystemStatus, TestQueryResult};
use crate::session::Session;

impl ApiClient {
    /// `GET /api/dashboard/system-health`, normalized.
    pub async fn system_status(&self, session: &Session) -> ApiResult<SystemStatus> {
        let raw: Value = self.get_json(session, "/api/dashboard/system-health").await?;
        Ok(adapter::system_status(&raw, Utc::now()))
    }

    /// `GET /api/dashboard/stats` as the dashboard's headline counters.
    pub async fn dashboard_stats(&self, session: &Session) -> ApiResult<DashboardStats> {
        let raw: Value = self.get_json(session, "/api/dashboard/stats").await?;
        Ok(adapter::dashboard_stats(&raw))
    }

    /// Run a retrieval + generation round trip for a test query.
    pub async fn test_query(&self, session: &Session, query: &str) -> ApiResult<TestQueryResult> {
        self.post_json(session, "/api/vector/test-search", &serde_json::json!({ "query": query }))
            .await
    }
}
