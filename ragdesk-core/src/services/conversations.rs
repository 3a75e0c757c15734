use bytes::Bytes;
use reqwest::Method;

use crate::adapter;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::conversation::{
    ConversationDetailResponse, ConversationListParams, ConversationListResponse, MessagePage,
};
use crate::models::{ActionResponse, DataFormat};
use crate::session::Session;

use super::export_query;

impl ApiClient {
    /// One page of conversations, built from `GET /api/messages`.
    ///
    /// The backend only lists messages; summaries are aggregated per page.
    pub async fn list_conversations(
        &self,
        session: &Session,
        params: &ConversationListParams,
    ) -> ApiResult<ConversationListResponse> {
        let page: MessagePage = self
            .get_json_with(session, "/api/messages", &params.resolved())
            .await?;
        Ok(adapter::conversation_page(page, params))
    }

    pub async fn conversation(&self, session: &Session, id: &str) -> ApiResult<ConversationDetailResponse> {
        let data: serde_json::Value = self.get_json(session, &format!("/api/messages/{}", id)).await?;
        Ok(ConversationDetailResponse {
            success: true,
            conversation: data,
        })
    }

    pub async fn delete_conversation(&self, session: &Session, id: &str) -> ApiResult<ActionResponse> {
        let req = self.request(session, Method::DELETE, &format!("/api/messages/{}", id));
        self.send_json(session, req).await
    }

    pub async fn export_conversations(
        &self,
        session: &Session,
        format: DataFormat,
        params: &ConversationListParams,
    ) -> ApiResult<Bytes> {
        self.get_bytes(session, "/api/messages/export", &export_query(params, format))
            .await
    }
}
