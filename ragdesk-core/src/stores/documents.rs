use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::DocumentsApi;
use crate::error::{ApiError, ApiResult};
use crate::models::document::{
    percent_complete, upload_filename, Document, DocumentChunk, DocumentListParams, UploadOptions,
    UploadProgress, UploadResult, UploadState,
};
use crate::models::ActionResponse;
use crate::services::ProgressFn;
use crate::session::lock;

const UPLOAD_FAILED: &str = "Upload failed";

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DocumentState {
    pub documents: Vec<Document>,
    pub current_document: Option<Document>,
    pub chunks: Vec<DocumentChunk>,
    pub loading: bool,
    pub uploading: bool,
    pub upload_progress: Vec<UploadProgress>,
    pub error: Option<String>,
    pub total: u64,
}

/// Document library state plus the actions of the documents screens.
pub struct DocumentStore {
    api: Arc<dyn DocumentsApi>,
    state: Arc<Mutex<DocumentState>>,
}

impl DocumentStore {
    pub fn new(api: Arc<dyn DocumentsApi>) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(DocumentState::default())),
        }
    }

    pub fn snapshot(&self) -> DocumentState {
        lock(&self.state).clone()
    }

    fn begin(&self) {
        let mut state = lock(&self.state);
        state.loading = true;
        state.error = None;
    }

    fn finish(&self, error: Option<String>) {
        let mut state = lock(&self.state);
        state.loading = false;
        if error.is_some() {
            state.error = error;
        }
    }

    /// Load the document list. Failures are recorded in state, not returned.
    pub async fn fetch_documents(&self, params: &DocumentListParams) {
        self.begin();
        match self.api.list_documents(params).await {
            Ok(list) => {
                let mut state = lock(&self.state);
                state.total = if list.total > 0 {
                    list.total
                } else {
                    list.documents.len() as u64
                };
                state.documents = list.documents;
                state.loading = false;
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching documents");
                let mut state = lock(&self.state);
                state.documents.clear();
                state.total = 0;
                state.error = Some(e.to_string());
                state.loading = false;
            }
        }
    }

    /// Upload one file, tracking its progress line, then refresh the list.
    pub async fn upload_document(&self, path: &Path, options: &UploadOptions) -> ApiResult<UploadResult> {
        let filename = upload_filename(path);

        let slot = {
            let mut state = lock(&self.state);
            state.uploading = true;
            state.error = None;
            state.upload_progress.push(UploadProgress::started(filename));
            state.upload_progress.len() - 1
        };

        let state = Arc::clone(&self.state);
        let progress: ProgressFn = Arc::new(move |sent, total| {
            if let Some(item) = lock(&state).upload_progress.get_mut(slot) {
                item.progress = percent_complete(sent, total);
            }
        });

        let result = self.api.upload_document(path, options, Some(progress)).await;

        match result {
            Ok(data) => {
                self.update_slot(slot, |item| {
                    item.status = UploadState::Success;
                    item.progress = 100;
                });
                lock(&self.state).uploading = false;
                self.fetch_documents(&DocumentListParams::default()).await;
                Ok(data)
            }
            Err(e) => {
                let message = e.detail().unwrap_or_else(|| UPLOAD_FAILED.to_string());
                tracing::error!(file = %path.display(), error = %e, "Upload failed");
                self.update_slot(slot, |item| {
                    item.status = UploadState::Error;
                    item.error = Some(message.clone());
                });
                let mut state = lock(&self.state);
                state.error = Some(message);
                state.uploading = false;
                Err(e)
            }
        }
    }

    fn update_slot(&self, slot: usize, f: impl FnOnce(&mut UploadProgress)) {
        if let Some(item) = lock(&self.state).upload_progress.get_mut(slot) {
            f(item);
        }
    }

    /// Upload all files concurrently. Progress lines are reset first; the
    /// first failure is returned while the remaining uploads run to completion.
    pub async fn upload_multiple(self: &Arc<Self>, paths: Vec<PathBuf>) -> ApiResult<Vec<UploadResult>> {
        {
            let mut state = lock(&self.state);
            state.uploading = true;
            state.upload_progress.clear();
        }

        let handles = paths.into_iter().map(|path| {
            let store = Arc::clone(self);
            tokio::spawn(async move { store.upload_document(&path, &UploadOptions::default()).await })
        });

        let joined = futures::future::try_join_all(handles.map(|handle| async move {
            handle.await.map_err(|e| ApiError::Io(std::io::Error::other(e)))?
        }))
        .await;

        lock(&self.state).uploading = false;
        joined
    }

    pub async fn document(&self, id: i64) -> ApiResult<Document> {
        self.begin();
        match self.api.document(id).await {
            Ok(doc) => {
                lock(&self.state).current_document = Some(doc.clone());
                self.finish(None);
                Ok(doc)
            }
            Err(e) => {
                tracing::error!(id, error = %e, "Error fetching document");
                self.finish(Some(e.to_string()));
                Err(e)
            }
        }
    }

    pub async fn chunks(&self, id: i64) -> ApiResult<Vec<DocumentChunk>> {
        self.begin();
        match self.api.document_chunks(id).await {
            Ok(chunks) => {
                lock(&self.state).chunks = chunks.clone();
                self.finish(None);
                Ok(chunks)
            }
            Err(e) => {
                tracing::error!(id, error = %e, "Error fetching chunks");
                self.finish(Some(e.to_string()));
                Err(e)
            }
        }
    }

    pub async fn reindex_document(&self, id: i64) -> ApiResult<ActionResponse> {
        self.begin();
        match self.api.reindex_document(id).await {
            Ok(ack) => {
                self.fetch_documents(&DocumentListParams::default()).await;
                self.finish(None);
                Ok(ack)
            }
            Err(e) => {
                tracing::error!(id, error = %e, "Error reindexing document");
                self.finish(Some(e.to_string()));
                Err(e)
            }
        }
    }

    pub async fn delete_document(&self, id: i64) -> ApiResult<()> {
        self.begin();
        match self.api.delete_document(id).await {
            Ok(()) => {
                self.fetch_documents(&DocumentListParams::default()).await;
                self.finish(None);
                Ok(())
            }
            Err(e) => {
                tracing::error!(id, error = %e, "Error deleting document");
                self.finish(Some(e.to_string()));
                Err(e)
            }
        }
    }

    pub fn clear_upload_progress(&self) {
        lock(&self.state).upload_progress.clear();
    }
}
