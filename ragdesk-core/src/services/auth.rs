use reqwest::Method;

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::auth::{AdminUser, LoginRequest, LoginResponse};
use crate::session::Session;

impl ApiClient {
    /// Exchange operator credentials for a bearer token and persist it.
    ///
    /// A rejected login is reported as an error only; it does not trigger
    /// the sign-out redirect other endpoints raise on 401.
    pub async fn login(
        &self,
        session: &Session,
        username: &str,
        password: &str,
    ) -> ApiResult<Option<AdminUser>> {
        let req = self
            .anonymous(Method::POST, "/api/auth/login")
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&LoginRequest { username, password });

        let resp = self.send_detached(req).await?;
        let body = resp.bytes().await?;
        let resp: LoginResponse = serde_json::from_slice(&body)?;
        session.store_token(&resp.access_token)?;

        tracing::info!(username = username, "Logged in");
        Ok(resp.user)
    }

    pub fn logout(&self, session: &Session) -> ApiResult<()> {
        session.logout()?;
        tracing::info!("Logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::routes::Route;
    use crate::session::MemoryCredentialStore;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn login_stores_access_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({"username": "admin", "password": "hunter2"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "jwt-abc",
                "token_type": "bearer",
                "user": {"id": "1", "username": "admin"}
            })))
            .mount(&server)
            .await;

        let client = ApiClient::with_base_url(server.uri()).unwrap();
        let session = Session::ephemeral();
        let user = client.login(&session, "admin", "hunter2").await.unwrap();

        assert_eq!(session.token().as_deref(), Some("jwt-abc"));
        assert_eq!(user.unwrap().username, "admin");
    }

    #[tokio::test]
    async fn rejected_login_leaves_session_signed_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Incorrect username or password"})))
            .mount(&server)
            .await;

        let client = ApiClient::with_base_url(server.uri()).unwrap();
        let session = Session::open(Box::new(MemoryCredentialStore::default())).unwrap();
        session.visit(Route::Login);
        let err = client.login(&session, "admin", "wrong").await.unwrap_err();

        assert!(matches!(err, ApiError::Unauthorized));
        assert!(!session.is_authenticated());
        assert_eq!(session.take_redirect(), None);
    }

    #[test]
    fn logout_forgets_token() {
        let client = ApiClient::with_base_url("http://localhost:8000").unwrap();
        let session = Session::open(Box::new(MemoryCredentialStore::with_token("t"))).unwrap();
        client.logout(&session).unwrap();
        assert!(!session.is_authenticated());
    }
}
