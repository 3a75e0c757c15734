use serde_json::Value;

use crate::adapter;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::settings::{
    ConnectionState, GeneralSettings, IntegrationService, NotificationSettings,
    RateLimitingSettings, SettingsResponse, TestConnectionResponse,
};
use crate::models::ActionResponse;
use crate::session::Session;

impl ApiClient {
    pub async fn settings(&self, session: &Session) -> ApiResult<SettingsResponse> {
        let raw: Value = self.get_json(session, "/api/settings").await?;
        Ok(SettingsResponse {
            success: true,
            settings: adapter::settings(&raw),
        })
    }

    pub async fn update_general(&self, session: &Session, general: &GeneralSettings) -> ApiResult<ActionResponse> {
        self.put_json(session, "/api/settings", general).await
    }

    pub async fn update_rate_limiting(
        &self,
        session: &Session,
        rate_limiting: &RateLimitingSettings,
    ) -> ApiResult<ActionResponse> {
        self.put_json(
            session,
            "/api/settings",
            &serde_json::json!({ "rate_limiting": rate_limiting }),
        )
        .await
    }

    pub async fn update_notifications(
        &self,
        session: &Session,
        notifications: &NotificationSettings,
    ) -> ApiResult<ActionResponse> {
        self.put_json(
            session,
            "/api/settings",
            &serde_json::json!({ "notifications": notifications }),
        )
        .await
    }

    /// There is no per-service probe upstream: a healthy system-health
    /// answer counts as connected for every integration.
    pub async fn test_connection(
        &self,
        session: &Session,
        service: IntegrationService,
    ) -> ApiResult<TestConnectionResponse> {
        let started = std::time::Instant::now();
        let _: Value = self.get_json(session, "/api/dashboard/system-health").await?;
        Ok(TestConnectionResponse {
            success: true,
            service: service.as_str().to_string(),
            status: ConnectionState::Connected,
            message: "Connection successful".to_string(),
            response_time_ms: Some(started.elapsed().as_millis() as u64),
        })
    }
}
