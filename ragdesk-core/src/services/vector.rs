use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::vector::{
    VectorAction, VectorActionResponse, VectorCollectionStats, VectorCollectionsResponse,
    VectorSearchParams, VectorSearchResponse,
};
use crate::session::Session;

impl ApiClient {
    pub async fn vector_collections(&self, session: &Session) -> ApiResult<VectorCollectionsResponse> {
        self.get_json(session, "/api/vector/collections").await
    }

    pub async fn collection_stats(&self, session: &Session, name: &str) -> ApiResult<VectorCollectionStats> {
        self.get_json(session, &format!("/api/vector/collections/{}/stats", name))
            .await
    }

    pub async fn vector_search(
        &self,
        session: &Session,
        params: &VectorSearchParams,
    ) -> ApiResult<VectorSearchResponse> {
        self.post_json(session, "/api/vector/search", params).await
    }

    /// Run a maintenance action; `None` lets the backend pick its default collection.
    pub async fn collection_action(
        &self,
        session: &Session,
        action: VectorAction,
        collection: Option<&str>,
    ) -> ApiResult<VectorActionResponse> {
        tracing::info!(action = action.as_str(), collection = ?collection, "Vector maintenance");
        self.post_json(
            session,
            &format!("/api/vector/{}", action.as_str()),
            &serde_json::json!({ "collection": collection }),
        )
        .await
    }

    pub async fn optimize_collection(&self, session: &Session, collection: Option<&str>) -> ApiResult<VectorActionResponse> {
        self.collection_action(session, VectorAction::Optimize, collection).await
    }

    pub async fn rebuild_collection(&self, session: &Session, collection: Option<&str>) -> ApiResult<VectorActionResponse> {
        self.collection_action(session, VectorAction::Rebuild, collection).await
    }

    pub async fn backup_collection(&self, session: &Session, collection: Option<&str>) -> ApiResult<VectorActionResponse> {
        self.collection_action(session, VectorAction::Backup, collection).await
    }
}
