use bytes::Bytes;
use reqwest::Method;

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::user::{UserDetailResponse, UserListParams, UserListResponse};
use crate::models::{ActionResponse, DataFormat};
use crate::session::Session;

use super::export_query;

impl ApiClient {
    /// The backend has no user listing yet; this returns an empty page
    /// without a request so the users screen still renders.
    pub async fn list_users(&self, _session: &Session, params: &UserListParams) -> ApiResult<UserListResponse> {
        Ok(UserListResponse {
            success: true,
            users: Vec::new(),
            total: 0,
            page: params.page(),
            limit: params.limit(),
        })
    }

    pub async fn user(&self, session: &Session, id: &str) -> ApiResult<UserDetailResponse> {
        self.get_json(session, &format!("/api/users/{}", id)).await
    }

    pub async fn block_user(&self, session: &Session, id: &str) -> ApiResult<ActionResponse> {
        let req = self.request(session, Method::PUT, &format!("/api/users/{}/block", id));
        self.send_json(session, req).await
    }

    pub async fn unblock_user(&self, session: &Session, id: &str) -> ApiResult<ActionResponse> {
        let req = self.request(session, Method::PUT, &format!("/api/users/{}/unblock", id));
        self.send_json(session, req).await
    }

    pub async fn update_user_notes(&self, session: &Session, id: &str, notes: &str) -> ApiResult<ActionResponse> {
        self.put_json(
            session,
            &format!("/api/users/{}/notes", id),
            &serde_json::json!({ "notes": notes }),
        )
        .await
    }

    pub async fn export_users(
        &self,
        session: &Session,
        format: DataFormat,
        params: &UserListParams,
    ) -> ApiResult<Bytes> {
        self.get_bytes(session, "/api/users/export", &export_query(params, format))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserStatus;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn list_users_is_local_empty_page() {
        // Unroutable base URL: a request would fail.
        let client = ApiClient::with_base_url("http://127.0.0.1:9").unwrap();
        let params = UserListParams {
            page: Some(4),
            ..Default::default()
        };
        let page = client.list_users(&Session::ephemeral(), &params).await.unwrap();
        assert!(page.success);
        assert!(page.users.is_empty());
        assert_eq!(page.page, 4);
        assert_eq!(page.limit, 20);
    }

    #[tokio::test]
    async fn user_detail_flattens_profile_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/8"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "user": {
                    "id": "8",
                    "phone": "+6285555555555",
                    "status": "blocked",
                    "messages_count": 3,
                    "conversations": [{"id": "c1", "last_message": "ok", "last_message_time": "t", "message_count": 3}],
                    "total_tokens_used": 900
                }
            })))
            .mount(&server)
            .await;

        let client = ApiClient::with_base_url(server.uri()).unwrap();
        let detail = client.user(&Session::ephemeral(), "8").await.unwrap();
        assert_eq!(detail.user.user.phone, "+6285555555555");
        assert_eq!(detail.user.user.status, UserStatus::Blocked);
        assert_eq!(detail.user.conversations.len(), 1);
        assert_eq!(detail.user.total_tokens_used, 900);
    }

    #[tokio::test]
    async fn block_unblock_and_notes_use_put() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/users/8/block"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "User blocked"})))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/users/8/unblock"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "User unblocked"})))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/users/8/notes"))
            .and(body_json(json!({"notes": "VIP customer"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;

        let client = ApiClient::with_base_url(server.uri()).unwrap();
        let session = Session::ephemeral();
        assert_eq!(client.block_user(&session, "8").await.unwrap().message, "User blocked");
        assert_eq!(client.unblock_user(&session, "8").await.unwrap().message, "User unblocked");
        assert!(client.update_user_notes(&session, "8", "VIP customer").await.unwrap().success);
    }
}
