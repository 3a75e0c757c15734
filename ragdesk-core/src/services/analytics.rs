use bytes::Bytes;
use serde_json::Value;

use crate::adapter;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::analytics::{
    AnalyticsOverviewResponse, AnalyticsParams, MessageVolume, PopularQuery, SeriesResponse,
    TokenUsage,
};
use crate::models::ReportFormat;
use crate::session::Session;

use super::export_query;

impl ApiClient {
    pub async fn analytics_overview(
        &self,
        session: &Session,
        params: &AnalyticsParams,
    ) -> ApiResult<AnalyticsOverviewResponse> {
        let raw: Value = self
            .get_json_with(session, "/api/dashboard/stats", params)
            .await?;
        Ok(adapter::analytics_overview(&raw))
    }

    pub async fn messages_chart(
        &self,
        session: &Session,
        params: &AnalyticsParams,
    ) -> ApiResult<SeriesResponse<MessageVolume>> {
        self.get_json_with(session, "/api/dashboard/charts/messages", params)
            .await
    }

    /// Not served by the backend yet: always an empty series.
    pub async fn tokens_chart(
        &self,
        _session: &Session,
        _params: &AnalyticsParams,
    ) -> ApiResult<SeriesResponse<TokenUsage>> {
        Ok(SeriesResponse::empty())
    }

    /// Not served by the backend yet: always an empty series.
    pub async fn popular_queries(
        &self,
        _session: &Session,
        _params: &AnalyticsParams,
    ) -> ApiResult<SeriesResponse<PopularQuery>> {
        Ok(SeriesResponse::empty())
    }

    pub async fn export_analytics(
        &self,
        session: &Session,
        format: ReportFormat,
        params: &AnalyticsParams,
    ) -> ApiResult<Bytes> {
        self.get_bytes(session, "/api/analytics/export", &export_query(params, format))
            .await
    }
}
