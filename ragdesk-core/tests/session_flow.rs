//! End-to-end flows against a mock admin API
//!
//! Login persists the token to a file-backed store, later calls carry it,
//! and a 401 signs the operator out and queues the login redirect.

use std::io::Write;
use std::sync::Arc;

use ragdesk_core::models::conversation::ConversationListParams;
use ragdesk_core::models::document::UploadState;
use ragdesk_core::{
    ApiClient, ApiError, CredentialStore, DocumentStore, FileCredentialStore, Route, Session,
    SystemStore,
};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn file_session(dir: &tempfile::TempDir) -> (Session, std::path::PathBuf) {
    let token_path = dir.path().join("ragdesk").join("auth_token");
    let session = Session::open(Box::new(FileCredentialStore::new(&token_path))).unwrap();
    (session, token_path)
}

// ===========================================================================
// TEST 1: login -> authenticated call -> 401 signs out
// ===========================================================================
#[tokio::test]
async fn login_then_expired_token_redirects_to_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-123",
            "token_type": "bearer",
            "user": {"id": "1", "username": "admin"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/messages"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 2,
            "data": [
                {"conversation_id": 1, "user_id": 5, "content": "Halo", "created_at": "t1"},
                {"conversation_id": 1, "user_id": 5, "content": "Terima kasih", "created_at": "t2"}
            ]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Token expired"})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (session, token_path) = file_session(&dir);
    let client = ApiClient::with_base_url(server.uri()).unwrap();

    let user = client.login(&session, "admin", "secret").await.unwrap();
    assert_eq!(user.unwrap().username, "admin");
    assert_eq!(std::fs::read_to_string(&token_path).unwrap().trim(), "tok-123");

    let page = client
        .list_conversations(&session, &ConversationListParams::default())
        .await
        .unwrap();
    assert_eq!(page.conversations.len(), 1);
    assert_eq!(page.conversations[0].message_count, 2);

    let err = client
        .list_conversations(&session, &ConversationListParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
    assert!(!session.is_authenticated());
    assert_eq!(session.take_redirect(), Some(Route::Login));
    assert_eq!(FileCredentialStore::new(&token_path).load().unwrap(), None);
}

// ===========================================================================
// TEST 2: a fresh session picks up the persisted token
// ===========================================================================
#[tokio::test]
async fn persisted_token_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let (session, _) = file_session(&dir);
        session.store_token("kept").unwrap();
    }
    let (session, _) = file_session(&dir);
    assert_eq!(session.token().as_deref(), Some("kept"));
    assert!(session.check_auth().unwrap());
}

// ===========================================================================
// TEST 3: document store over a live connection
// ===========================================================================
#[tokio::test]
async fn upload_through_store_refreshes_library() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/documents/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"document_id": 9, "message": "ok"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{"id": 9, "title": "Katalog", "status": "processing"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("katalog.txt");
    write!(std::fs::File::create(&file_path).unwrap(), "Harga mulai 10rb").unwrap();

    let conn = ApiClient::with_base_url(server.uri())
        .unwrap()
        .bind(Arc::new(Session::ephemeral()));
    let store = DocumentStore::new(Arc::new(conn));

    let result = store
        .upload_document(&file_path, &Default::default())
        .await
        .unwrap();
    assert_eq!(result.document_id, Some(9));

    let state = store.snapshot();
    assert_eq!(state.upload_progress[0].status, UploadState::Success);
    assert_eq!(state.upload_progress[0].progress, 100);
    assert_eq!(state.documents.len(), 1);
    assert_eq!(state.total, 1);
}

// ===========================================================================
// TEST 4: dashboard store falls back when the backend is down
// ===========================================================================
#[tokio::test]
async fn dashboard_store_reports_outage() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let session = Arc::new(Session::ephemeral());
    let conn = ApiClient::with_base_url(server.uri())
        .unwrap()
        .bind(session.clone());
    let store = SystemStore::new(Arc::new(conn));
    store.fetch_all().await;

    let state = store.snapshot();
    assert!(state.error.is_some());
    assert_eq!(state.status.unwrap().qdrant.status, "error");
    assert_eq!(session.take_redirect(), Some(Route::ServerError));
}
