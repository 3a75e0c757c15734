//! Client-side state containers for the dashboard screens.
//!
//! Each store wraps an API seam trait so it can run against the real
//! backend (`Connection`) or a fake in tests. State is read through
//! `snapshot()`; store methods hold the lock only between awaits.

use std::path::Path;

use async_trait::async_trait;

use crate::client::Connection;
use crate::error::ApiResult;
use crate::models::document::{
    Document, DocumentChunk, DocumentList, DocumentListParams, UploadOptions, UploadResult,
};
use crate::models::system::{DashboardStats, SystemStatus};
use crate::models::ActionResponse;
use crate::services::ProgressFn;

pub mod documents;
pub mod system;

pub use documents::{DocumentState, DocumentStore};
pub use system::{SystemState, SystemStore};

#[async_trait]
pub trait DocumentsApi: Send + Sync {
    async fn list_documents(&self, params: &DocumentListParams) -> ApiResult<DocumentList>;

    async fn upload_document(
        &self,
        path: &Path,
        options: &UploadOptions,
        progress: Option<ProgressFn>,
    ) -> ApiResult<UploadResult>;

    async fn document(&self, id: i64) -> ApiResult<Document>;

    async fn document_chunks(&self, id: i64) -> ApiResult<Vec<DocumentChunk>>;

    async fn reindex_document(&self, id: i64) -> ApiResult<ActionResponse>;

    async fn delete_document(&self, id: i64) -> ApiResult<()>;
}

#[async_trait]
pub trait SystemApi: Send + Sync {
    async fn system_status(&self) -> ApiResult<SystemStatus>;

    async fn dashboard_stats(&self) -> ApiResult<DashboardStats>;
}

#[async_trait]
impl DocumentsApi for Connection {
    async fn list_documents(&self, params: &DocumentListParams) -> ApiResult<DocumentList> {
        self.client.list_documents(&self.session, params).await
    }

    async fn upload_document(
        &self,
        path: &Path,
        options: &UploadOptions,
        progress: Option<ProgressFn>,
    ) -> ApiResult<UploadResult> {
        self.client
            .upload_document(&self.session, path, options, progress)
            .await
    }

    async fn document(&self, id: i64) -> ApiResult<Document> {
        self.client.document(&self.session, id).await
    }

    async fn document_chunks(&self, id: i64) -> ApiResult<Vec<DocumentChunk>> {
        self.client.document_chunks(&self.session, id).await
    }

    async fn reindex_document(&self, id: i64) -> ApiResult<ActionResponse> {
        self.client.reindex_document(&self.session, id).await
    }

    async fn delete_document(&self, id: i64) -> ApiResult<()> {
        self.client.delete_document(&self.session, id).await
    }
}

#[async_trait]
impl SystemApi for Connection {
    async fn system_status(&self) -> ApiResult<SystemStatus> {
        self.client.system_status(&self.session).await
    }

    async fn dashboard_stats(&self) -> ApiResult<DashboardStats> {
        self.client.dashboard_stats(&self.session).await
    }
}
