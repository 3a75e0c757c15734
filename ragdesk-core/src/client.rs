//! HTTP transport for the admin backend.
//!
//! `ApiClient` owns the reqwest client and base URL only; the credential and
//! navigation state live in the `Session` passed to each call. Every
//! response goes through one status check:
//! - 401 clears the stored credential and raises a redirect to login
//! - 5xx raises a redirect to the server-error screen, unless the operator
//!   is already there

use std::sync::Arc;

use bytes::Bytes;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::routes::Route;
use crate::session::{with_credential, Session};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Client for a given base URL with the default timeout (for testing / scripting).
    pub fn with_base_url(base_url: impl Into<String>) -> ApiResult<Self> {
        let config = ApiConfig {
            base_url: base_url.into(),
            ..ApiConfig::default()
        };
        Self::new(&config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Pair this client with a session for the store layer.
    pub fn bind(self, session: Arc<Session>) -> Connection {
        Connection {
            client: self,
            session,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request builder with the session's credential attached.
    pub(crate) fn request(&self, session: &Session, method: Method, path: &str) -> RequestBuilder {
        let req = self.http.request(method, self.url(path));
        with_credential(req, session.token().as_deref())
    }

    /// Request that must not carry a credential (login).
    pub(crate) fn anonymous(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    pub(crate) async fn send(&self, session: &Session, req: RequestBuilder) -> ApiResult<Response> {
        let req = req.build()?;
        tracing::debug!(method = %req.method(), path = %req.url().path(), "API request");
        let resp = self.http.execute(req).await?;
        check_status(Some(session), resp).await
    }

    /// Send without session side effects: no redirects, no sign-out.
    pub(crate) async fn send_detached(&self, req: RequestBuilder) -> ApiResult<Response> {
        let req = req.build()?;
        tracing::debug!(method = %req.method(), path = %req.url().path(), "API request");
        let resp = self.http.execute(req).await?;
        check_status(None, resp).await
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        session: &Session,
        req: RequestBuilder,
    ) -> ApiResult<T> {
        let resp = self.send(session, req).await?;
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
    ) -> ApiResult<T> {
        let req = self.request(session, Method::GET, path);
        self.send_json(session, req).await
    }

    pub(crate) async fn get_json_with<T, Q>(&self, session: &Session, path: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let req = self.request(session, Method::GET, path).query(query);
        self.send_json(session, req).await
    }

    pub(crate) async fn post_json<T, B>(&self, session: &Session, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let req = self.request(session, Method::POST, path).json(body);
        self.send_json(session, req).await
    }

    pub(crate) async fn put_json<T, B>(&self, session: &Session, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let req = self.request(session, Method::PUT, path).json(body);
        self.send_json(session, req).await
    }

    /// Download a binary export (CSV, JSON, PDF).
    pub(crate) async fn get_bytes<Q: Serialize + ?Sized>(
        &self,
        session: &Session,
        path: &str,
        query: &Q,
    ) -> ApiResult<Bytes> {
        let req = self.request(session, Method::GET, path).query(query);
        let resp = self.send(session, req).await?;
        Ok(resp.bytes().await?)
    }
}

async fn check_status(session: Option<&Session>, resp: Response) -> ApiResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    if status == StatusCode::UNAUTHORIZED {
        if let Some(session) = session {
            tracing::warn!("Credential rejected by backend, signing out");
            session.expire();
        }
        return Err(ApiError::Unauthorized);
    }

    let body = resp.text().await.unwrap_or_default();

    if status.is_server_error() {
        tracing::warn!(status = %status, "Backend server error");
        if let Some(session) = session.filter(|s| s.location() != Route::ServerError) {
            session.redirect(Route::ServerError);
        }
        return Err(ApiError::Server { status, body });
    }

    Err(ApiError::Status { status, body })
}

/// An `ApiClient` bound to one session, used by the stores.
#[derive(Debug, Clone)]
pub struct Connection {
    pub client: ApiClient,
    pub session: Arc<Session>,
}
