use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Method};
use serde_json::Value;
use tokio_util::io::ReaderStream;

use crate::adapter;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::document::{
    upload_filename, Document, DocumentChunk, DocumentList, DocumentListParams, UploadOptions,
    UploadResult,
};
use crate::models::ActionResponse;
use crate::session::Session;

/// Upload progress callback: `(bytes_sent, bytes_total)`.
pub type ProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

impl ApiClient {
    pub async fn list_documents(
        &self,
        session: &Session,
        params: &DocumentListParams,
    ) -> ApiResult<DocumentList> {
        let raw: Value = self.get_json_with(session, "/api/documents", params).await?;
        Ok(adapter::document_list(&raw)?)
    }

    /// Stream a file to `POST /api/documents/upload` as multipart form data.
    ///
    /// `progress` fires after every chunk handed to the connection.
    pub async fn upload_document(
        &self,
        session: &Session,
        path: &Path,
        options: &UploadOptions,
        progress: Option<ProgressFn>,
    ) -> ApiResult<UploadResult> {
        let file = tokio::fs::File::open(path).await?;
        let total = file.metadata().await?.len();
        let filename = upload_filename(path);

        let sent = Arc::new(AtomicU64::new(0));
        let stream = ReaderStream::new(file).map(move |chunk| {
            if let Ok(bytes) = &chunk {
                let len = bytes.len() as u64;
                let so_far = sent.fetch_add(len, Ordering::Relaxed) + len;
                if let Some(cb) = &progress {
                    cb(so_far, total);
                }
            }
            chunk
        });

        let part = Part::stream_with_length(Body::wrap_stream(stream), total).file_name(filename.clone());
        let mut form = Form::new().part("file", part);
        if let Some(title) = &options.title {
            form = form.text("title", title.clone());
        }
        if let Some(content_type) = &options.content_type {
            form = form.text("content_type", content_type.clone());
        }

        let req = self
            .request(session, Method::POST, "/api/documents/upload")
            .multipart(form);
        let result: UploadResult = self.send_json(session, req).await?;

        tracing::info!(file = %filename, bytes = total, document_id = ?result.document_id, "Document uploaded");
        Ok(result)
    }

    pub async fn document(&self, session: &Session, id: i64) -> ApiResult<Document> {
        self.get_json(session, &format!("/api/documents/{}", id)).await
    }

    pub async fn document_chunks(&self, session: &Session, id: i64) -> ApiResult<Vec<DocumentChunk>> {
        self.get_json(session, &format!("/api/documents/{}/chunks", id))
            .await
    }

    /// Ask the backend to re-chunk and re-embed a document.
    pub async fn reindex_document(&self, session: &Session, id: i64) -> ApiResult<ActionResponse> {
        let req = self.request(session, Method::POST, &format!("/api/documents/{}/reindex", id));
        self.send_json(session, req).await
    }

    pub async fn delete_document(&self, session: &Session, id: i64) -> ApiResult<()> {
        let req = self.request(session, Method::DELETE, &format!("/api/documents/{}", id));
        self.send(session, req).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::DocumentStatus;
    use serde_json::json;
    use std::io::Write;
    use std::sync::Mutex;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    #[tokio::test]
    async fn list_documents_forwards_filters_and_normalizes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/documents"))
            .and(query_param("search", "katalog"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"id": 11, "title": "Katalog 2024", "embedding_status": "completed"}],
                "total": 31
            })))
            .mount(&server)
            .await;

        let client = ApiClient::with_base_url(server.uri()).unwrap();
        let params = DocumentListParams {
            search: Some("katalog".into()),
            page: Some(2),
            ..Default::default()
        };
        let list = client.list_documents(&Session::ephemeral(), &params).await.unwrap();
        assert_eq!(list.total, 31);
        assert_eq!(list.documents[0].status, DocumentStatus::Completed);
    }

    #[tokio::test]
    async fn upload_sends_multipart_and_reports_progress() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/documents/upload"))
            .and(|req: &Request| {
                let content_type = req
                    .headers
                    .get("content-type")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("");
                let body = String::from_utf8_lossy(&req.body);
                content_type.starts_with("multipart/form-data")
                    && body.contains("filename=\"faq.txt\"")
                    && body.contains("name=\"title\"")
                    && body.contains("Jam buka 09:00-17:00")
            })
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "document_id": 77,
                "message": "Document uploaded"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("faq.txt");
        let mut f = std::fs::File::create(&file_path).unwrap();
        write!(f, "Jam buka 09:00-17:00").unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let progress: ProgressFn = Arc::new(move |sent, total| sink.lock().unwrap().push((sent, total)));

        let client = ApiClient::with_base_url(server.uri()).unwrap();
        let options = UploadOptions {
            title: Some("FAQ".into()),
            content_type: None,
        };
        let result = client
            .upload_document(&Session::ephemeral(), &file_path, &options, Some(progress))
            .await
            .unwrap();

        assert_eq!(result.document_id, Some(77));
        let seen = seen.lock().unwrap();
        let last = seen.last().copied().expect("progress reported");
        assert_eq!(last, (20, 20));
    }

    #[tokio::test]
    async fn upload_of_missing_file_fails_before_request() {
        let client = ApiClient::with_base_url("http://127.0.0.1:9").unwrap();
        let err = client
            .upload_document(
                &Session::ephemeral(),
                Path::new("/no/such/file.pdf"),
                &UploadOptions::default(),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::ApiError::Io(_)));
    }

    #[tokio::test]
    async fn chunks_reindex_and_delete_hit_document_paths() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/documents/5/chunks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "chunk_index": 0, "chunk_text": "Halo", "chunk_size": 4}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/documents/5/reindex"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Reindex queued"})))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/documents/5"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::with_base_url(server.uri()).unwrap();
        let session = Session::ephemeral();

        let chunks = client.document_chunks(&session, 5).await.unwrap();
        assert_eq!(chunks[0].chunk_text, "Halo");

        let ack = client.reindex_document(&session, 5).await.unwrap();
        assert_eq!(ack.message, "Reindex queued");

        client.delete_document(&session, 5).await.unwrap();
    }
}
