use serde_json::Value;

use crate::adapter;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::rag::{
    LlmConfig, PromptKind, Prompts, PromptsResponse, RagConfigResponse, RagTestResponse,
    RetrievalConfig,
};
use crate::models::ActionResponse;
use crate::session::Session;

impl ApiClient {
    pub async fn rag_config(&self, session: &Session) -> ApiResult<RagConfigResponse> {
        let raw: Value = self.get_json(session, "/api/settings/rag/config").await?;
        Ok(adapter::rag_config(&raw))
    }

    pub async fn update_llm_config(&self, session: &Session, llm: &LlmConfig) -> ApiResult<ActionResponse> {
        self.put_json(
            session,
            "/api/settings/rag_llm_config",
            &serde_json::json!({ "value": llm }),
        )
        .await
    }

    pub async fn update_retrieval_config(
        &self,
        session: &Session,
        retrieval: &RetrievalConfig,
    ) -> ApiResult<ActionResponse> {
        self.put_json(
            session,
            "/api/settings/rag_retrieval_config",
            &serde_json::json!({ "value": retrieval }),
        )
        .await
    }

    /// Prompt templates from the settings endpoint. Never fails: on error
    /// the defaults come back with `success: false`.
    pub async fn prompts(&self, session: &Session) -> PromptsResponse {
        match self.get_json::<Value>(session, "/api/settings").await {
            Ok(raw) => PromptsResponse {
                success: true,
                prompts: adapter::prompts(&raw),
            },
            Err(e) => {
                tracing::warn!(error = %e, "Could not load prompts, using defaults");
                PromptsResponse {
                    success: false,
                    prompts: Prompts::default(),
                }
            }
        }
    }

    pub async fn update_prompt(&self, session: &Session, kind: PromptKind, template: &str) -> ApiResult<ActionResponse> {
        self.put_json(
            session,
            &format!("/api/settings/{}", kind.setting_key()),
            &serde_json::json!({ "value": template }),
        )
        .await
    }

    pub async fn test_rag(&self, session: &Session, query: &str) -> ApiResult<RagTestResponse> {
        self.post_json(
            session,
            "/api/vector/test-search",
            &serde_json::json!({ "query": query }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rag::{DEFAULT_SYSTEM_PROMPT, DEFAULT_USER_PROMPT};
    use crate::routes::Route;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn config_is_normalized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/settings/rag/config"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "config": {"model": "gpt-4o-mini", "min_score": 0.5}
            })))
            .mount(&server)
            .await;

        let client = ApiClient::with_base_url(server.uri()).unwrap();
        let resp = client.rag_config(&Session::ephemeral()).await.unwrap();
        assert_eq!(resp.config.llm.model, "gpt-4o-mini");
        assert_eq!(resp.config.llm.max_tokens, 500);
        assert_eq!(resp.config.retrieval.similarity_threshold, 0.5);
        assert_eq!(resp.config.retrieval.chunk_overlap, 200);
    }

    #[tokio::test]
    async fn config_updates_wrap_value() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/settings/rag_llm_config"))
            .and(body_json(json!({"value": {"model": "gpt-4", "temperature": 0.7, "max_tokens": 500, "top_p": 1.0}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/settings/rag_retrieval_config"))
            .and(body_json(json!({"value": {"top_k": 5, "similarity_threshold": 0.7, "chunk_size": 1000, "chunk_overlap": 200}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::with_base_url(server.uri()).unwrap();
        let session = Session::ephemeral();
        assert!(client.update_llm_config(&session, &LlmConfig::default()).await.unwrap().success);
        assert!(client
            .update_retrieval_config(&session, &RetrievalConfig::default())
            .await
            .unwrap()
            .success);
    }

    #[tokio::test]
    async fn prompts_read_settings() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/settings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "settings": {"system_prompt": "Kamu asisten toko.", "user_prompt_template": "{query}"}
            })))
            .mount(&server)
            .await;

        let client = ApiClient::with_base_url(server.uri()).unwrap();
        let resp = client.prompts(&Session::ephemeral()).await;
        assert!(resp.success);
        assert_eq!(resp.prompts.system, "Kamu asisten toko.");
        assert_eq!(resp.prompts.user, "{query}");
    }

    #[tokio::test]
    async fn prompts_fall_back_on_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/settings"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ApiClient::with_base_url(server.uri()).unwrap();
        let session = Session::ephemeral();
        let resp = client.prompts(&session).await;
        assert!(!resp.success);
        assert_eq!(resp.prompts.system, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(resp.prompts.user, DEFAULT_USER_PROMPT);
        // The 5xx redirect still happens even though the error is swallowed.
        assert_eq!(session.take_redirect(), Some(Route::ServerError));
    }

    #[tokio::test]
    async fn update_prompt_uses_setting_key() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/settings/user_prompt"))
            .and(body_json(json!({"value": "Q: {query}"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "Updated"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::with_base_url(server.uri()).unwrap();
        let ack = client
            .update_prompt(&Session::ephemeral(), PromptKind::User, "Q: {query}")
            .await
            .unwrap();
        assert_eq!(ack.message, "Updated");
    }

    #[tokio::test]
    async fn test_rag_posts_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/vector/test-search"))
            .and(body_json(json!({"query": "jam buka?"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "query": "jam buka?",
                "response": "Kami buka 09:00-17:00.",
                "context_used": [{"document_id": 3, "document_title": "FAQ", "chunk_text": "Jam buka", "score": 0.91}],
                "tokens_used": 120
            })))
            .mount(&server)
            .await;

        let client = ApiClient::with_base_url(server.uri()).unwrap();
        let resp = client.test_rag(&Session::ephemeral(), "jam buka?").await.unwrap();
        assert_eq!(resp.context_used.len(), 1);
        assert_eq!(resp.tokens_used, 120);
    }
}
