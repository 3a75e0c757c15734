//! Mapping layer between the backend's response shapes and ragdesk's models.
//!
//! All field renames, fallbacks, and defaults live here so that the service
//! functions only move bytes and the screens only see normalized types.

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::analytics::{AnalyticsOverview, AnalyticsOverviewResponse};
use crate::models::conversation::{
    ConversationListParams, ConversationListResponse, ConversationStatus, ConversationSummary,
    MessagePage, MessageRecord,
};
use crate::models::document::{Document, DocumentList};
use crate::models::rag::{LlmConfig, Prompts, RagConfig, RagConfigResponse, RetrievalConfig};
use crate::models::settings::{GeneralSettings, IntegrationsSettings, Settings};
use crate::models::system::{DashboardStats, SystemStatus, VectorDbStatus};
use crate::models::FlexibleId;

/// Key used for messages that arrive without a conversation id.
pub const MISSING_CONVERSATION_KEY: &str = "null";

// ============================================================================
// Conversations
// ============================================================================

/// Group a batch of flat messages into one summary per conversation id.
///
/// Summaries come out in first-seen order. Each summary takes its preview,
/// phone, and name from the first message of its conversation; later
/// messages only bump `message_count`. Counts are local to the batch.
///
/// Grouping uses the raw id, so numeric `1` and string `"1"` are separate
/// conversations even though both summaries read `"1"`. Absent and null ids
/// share one bucket.
pub fn aggregate_conversations(messages: &[MessageRecord]) -> Vec<ConversationSummary> {
    let mut index: HashMap<Option<&FlexibleId>, usize> = HashMap::new();
    let mut summaries: Vec<ConversationSummary> = Vec::new();

    for msg in messages {
        let key = msg.conversation_id.as_ref();
        match index.get(&key) {
            Some(&i) => summaries[i].message_count += 1,
            None => {
                index.insert(key, summaries.len());
                summaries.push(new_summary(conversation_label(key), msg));
            }
        }
    }

    summaries
}

fn conversation_label(id: Option<&FlexibleId>) -> String {
    id.map(|id| id.to_string())
        .unwrap_or_else(|| MISSING_CONVERSATION_KEY.to_string())
}

fn new_summary(id: String, msg: &MessageRecord) -> ConversationSummary {
    let phone = match non_empty(msg.phone_number.as_deref()) {
        Some(p) => p.to_string(),
        None => {
            let user = msg
                .user_id
                .as_ref()
                .map(|u| u.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            format!("User {}", user)
        }
    };

    ConversationSummary {
        id,
        phone,
        name: non_empty(msg.user_name.as_deref()).map(str::to_string),
        last_message: msg.content.clone(),
        last_message_time: msg.created_at.clone(),
        // The backend exposes no live/ended signal per conversation.
        status: ConversationStatus::Ended,
        message_count: 1,
        created_at: msg.created_at.clone(),
        updated_at: msg.created_at.clone(),
    }
}

/// Wrap an aggregated page with the request's paging info.
///
/// `total` is passed through from the backend untouched: it counts messages
/// across every page, not conversations on this one.
pub fn conversation_page(
    page: MessagePage,
    params: &ConversationListParams,
) -> ConversationListResponse {
    ConversationListResponse {
        success: true,
        conversations: aggregate_conversations(&page.data),
        total: page.total.unwrap_or(0),
        page: params.page(),
        limit: params.limit(),
    }
}

// ============================================================================
// Documents
// ============================================================================

/// Normalize the documents listing.
///
/// Accepts `{items: [...]}`, `{documents: [...]}` or a bare array. Each
/// document's `status` is taken from `embedding_status` when the backend
/// reports one.
pub fn document_list(raw: &Value) -> Result<DocumentList, serde_json::Error> {
    let items = raw
        .get("items")
        .and_then(Value::as_array)
        .or_else(|| raw.get("documents").and_then(Value::as_array))
        .or_else(|| raw.as_array())
        .cloned()
        .unwrap_or_default();

    let mut documents = Vec::with_capacity(items.len());
    for mut item in items {
        if let Some(obj) = item.as_object_mut() {
            let embedding_status = obj.get("embedding_status").filter(|v| truthy(v)).cloned();
            if let Some(status) = embedding_status {
                obj.insert("status".to_string(), status);
            }
        }
        documents.push(serde_json::from_value::<Document>(item)?);
    }

    let total = raw
        .get("total")
        .and_then(Value::as_u64)
        .filter(|t| *t > 0)
        .unwrap_or(documents.len() as u64);

    Ok(DocumentList { documents, total })
}

// ============================================================================
// System / dashboard
// ============================================================================

/// Normalize the system-health payload.
///
/// Newer backends nest vector database health under `qdrant`, older ones
/// under `vector_db`, and the oldest report flat `total_vectors` style
/// fields at the root.
pub fn system_status(raw: &Value, now: DateTime<Utc>) -> SystemStatus {
    let nested = raw
        .get("qdrant")
        .filter(|v| v.is_object())
        .or_else(|| raw.get("vector_db").filter(|v| v.is_object()));

    let qdrant = match nested {
        Some(v) => decode_or_default::<VectorDbStatus>(v),
        None => VectorDbStatus {
            status: str_or(raw, "status", "unknown"),
            collection: "documents".to_string(),
            vectors: u64_or(raw, "total_vectors", 0),
            points: u64_or(raw, "total_points", 0),
            url: str_or(raw, "qdrant_url", ""),
        },
    };

    SystemStatus {
        success: true,
        qdrant,
        timestamp: match non_empty(raw.get("timestamp").and_then(Value::as_str)) {
            Some(ts) => ts.to_string(),
            None => iso_timestamp(now),
        },
    }
}

/// Status shown when the dashboard could not reach the backend.
pub fn system_status_unavailable(now: DateTime<Utc>) -> SystemStatus {
    SystemStatus {
        success: false,
        qdrant: VectorDbStatus {
            status: "error".to_string(),
            collection: "documents".to_string(),
            vectors: 0,
            points: 0,
            url: String::new(),
        },
        timestamp: iso_timestamp(now),
    }
}

pub fn dashboard_stats(raw: &Value) -> DashboardStats {
    DashboardStats {
        success: true,
        total_messages: u64_or(raw, "total_messages", 0),
        avg_response_time_ms: f64_or(raw, "avg_response_time_ms", 0.0),
        total_tokens: u64_or(raw, "total_tokens", 0),
        recent_messages_7d: u64_or(raw, "recent_messages_7d", 0),
        today_messages: u64_or(raw, "today_messages", 0),
    }
}

/// Analytics overview from the stats endpoint.
///
/// The endpoint answers either `{success, data: {...}}` or the flat
/// dashboard counters; the flat form is mapped onto the overview fields.
pub fn analytics_overview(raw: &Value) -> AnalyticsOverviewResponse {
    if let Some(data) = raw.get("data").filter(|v| v.is_object()) {
        return AnalyticsOverviewResponse {
            success: true,
            data: decode_or_default(data),
        };
    }

    let flat = dashboard_stats(raw);
    AnalyticsOverviewResponse {
        success: true,
        data: AnalyticsOverview {
            total_messages: flat.total_messages,
            active_users: u64_or(raw, "active_users", 0),
            avg_response_time_ms: flat.avg_response_time_ms,
            total_tokens: flat.total_tokens,
            messages_today: flat.today_messages,
            messages_7d: flat.recent_messages_7d,
            messages_30d: u64_or(raw, "messages_30d", 0),
            top_users: raw
                .get("top_users")
                .map(decode_or_default)
                .unwrap_or_default(),
        },
    }
}

// ============================================================================
// Settings / RAG configuration
// ============================================================================

/// Settings screen model from the flat `GET /api/settings` payload.
///
/// Integrations are always reported connected: the backend has no
/// per-integration health endpoint.
pub fn settings(raw: &Value) -> Settings {
    let defaults = GeneralSettings::default();
    Settings {
        general: GeneralSettings {
            chatbot_name: str_or(raw, "chatbot_name", &defaults.chatbot_name),
            default_language: str_or(raw, "default_language", &defaults.default_language),
            timezone: str_or(raw, "timezone", &defaults.timezone),
            business_hours: raw
                .get("business_hours")
                .map(decode_or_default)
                .unwrap_or_default(),
        },
        integrations: IntegrationsSettings::default(),
        rate_limiting: raw
            .get("rate_limiting")
            .map(decode_or_default)
            .unwrap_or_default(),
        notifications: raw
            .get("notifications")
            .map(decode_or_default)
            .unwrap_or_default(),
    }
}

/// RAG configuration from `GET /api/settings/rag/config`.
///
/// The backend stores a flat `config` object; `min_score` becomes the
/// retrieval `similarity_threshold`. Only absent or non-numeric values fall
/// back to defaults, an explicit `0` is kept.
pub fn rag_config(raw: &Value) -> RagConfigResponse {
    let empty = Value::Object(Default::default());
    let cfg = raw.get("config").filter(|v| v.is_object()).unwrap_or(&empty);
    let llm = LlmConfig::default();
    let retrieval = RetrievalConfig::default();

    RagConfigResponse {
        success: true,
        config: RagConfig {
            llm: LlmConfig {
                model: str_or(cfg, "model", &llm.model),
                temperature: f64_or(cfg, "temperature", llm.temperature),
                max_tokens: u32_or(cfg, "max_tokens", llm.max_tokens),
                top_p: f64_or(cfg, "top_p", llm.top_p),
            },
            retrieval: RetrievalConfig {
                top_k: u32_or(cfg, "top_k", retrieval.top_k),
                similarity_threshold: f64_or(cfg, "min_score", retrieval.similarity_threshold),
                chunk_size: u32_or(cfg, "chunk_size", retrieval.chunk_size),
                chunk_overlap: u32_or(cfg, "chunk_overlap", retrieval.chunk_overlap),
            },
        },
    }
}

/// Prompt templates out of the settings payload (`settings` sub-object or root).
pub fn prompts(raw: &Value) -> Prompts {
    let data = raw.get("settings").filter(|v| v.is_object()).unwrap_or(raw);
    let defaults = Prompts::default();
    Prompts {
        system: str_or(data, "system_prompt", &defaults.system),
        user: str_or(data, "user_prompt_template", &defaults.user),
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// JSON truthiness: null, false, 0, and "" count as absent.
fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn str_or(v: &Value, key: &str, default: &str) -> String {
    non_empty(v.get(key).and_then(Value::as_str))
        .unwrap_or(default)
        .to_string()
}

fn u64_or(v: &Value, key: &str, default: u64) -> u64 {
    v.get(key).and_then(Value::as_u64).unwrap_or(default)
}

fn u32_or(v: &Value, key: &str, default: u32) -> u32 {
    v.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(default)
}

fn f64_or(v: &Value, key: &str, default: f64) -> f64 {
    v.get(key).and_then(Value::as_f64).unwrap_or(default)
}

fn decode_or_default<T: DeserializeOwned + Default>(v: &Value) -> T {
    match serde_json::from_value::<T>(v.clone()) {
        Ok(t) => t,
        Err(e) => {
            if !v.is_null() {
                tracing::debug!(error = %e, "Unexpected backend shape, using defaults");
            }
            T::default()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::DocumentStatus;
    use crate::models::FlexibleId;
    use serde_json::json;

    fn msg(conversation: i64, user: i64, content: &str, at: &str) -> MessageRecord {
        MessageRecord {
            conversation_id: Some(FlexibleId::Int(conversation)),
            user_id: Some(FlexibleId::Int(user)),
            phone_number: None,
            user_name: None,
            content: content.to_string(),
            created_at: at.to_string(),
        }
    }

    #[test]
    fn empty_batch_gives_empty_page_with_zero_total() {
        assert!(aggregate_conversations(&[]).is_empty());

        let page = conversation_page(MessagePage::default(), &ConversationListParams::default());
        assert!(page.conversations.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 20);
    }

    #[test]
    fn single_conversation_counts_every_message() {
        let batch: Vec<_> = (0..7).map(|i| msg(4, 2, "m", &format!("t{}", i))).collect();
        let out = aggregate_conversations(&batch);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].message_count, 7);
    }

    #[test]
    fn counts_sum_to_batch_length_across_conversations() {
        let ids = [3, 1, 3, 2, 1, 3, 9];
        let batch: Vec<_> = ids.iter().map(|&c| msg(c, 1, "x", "t")).collect();
        let out = aggregate_conversations(&batch);

        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|c| c.message_count >= 1));
        let sum: u32 = out.iter().map(|c| c.message_count).sum();
        assert_eq!(sum as usize, batch.len());
    }

    #[test]
    fn preview_comes_from_first_message_of_conversation() {
        let out = aggregate_conversations(&[msg(1, 9, "hi", "t1"), msg(1, 9, "bye", "t2")]);
        assert_eq!(out.len(), 1);
        let c = &out[0];
        assert_eq!(c.id, "1");
        assert_eq!(c.phone, "User 9");
        assert_eq!(c.last_message, "hi");
        assert_eq!(c.last_message_time, "t1");
        assert_eq!(c.message_count, 2);
        assert_eq!(c.status, ConversationStatus::Ended);
        assert_eq!(c.created_at, "t1");
        assert_eq!(c.updated_at, "t1");
        assert!(c.name.is_none());
    }

    #[test]
    fn phone_number_wins_over_user_label() {
        let mut m = msg(5, 9, "halo", "t");
        m.phone_number = Some("+6281234567890".to_string());
        let out = aggregate_conversations(&[m]);
        assert_eq!(out[0].phone, "+6281234567890");
        assert!(out[0].name.is_none());
    }

    #[test]
    fn empty_phone_and_name_fall_back() {
        let mut m = msg(5, 12, "halo", "t");
        m.phone_number = Some(String::new());
        m.user_name = Some(String::new());
        let out = aggregate_conversations(&[m]);
        assert_eq!(out[0].phone, "User 12");
        assert!(out[0].name.is_none());
    }

    #[test]
    fn order_follows_first_occurrence() {
        let batch = [msg(30, 1, "a", "t"), msg(10, 1, "b", "t"), msg(30, 1, "c", "t"), msg(20, 1, "d", "t")];
        let ids: Vec<_> = aggregate_conversations(&batch).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["30", "10", "20"]);
    }

    #[test]
    fn missing_conversation_ids_share_one_bucket() {
        let batch: Vec<MessageRecord> = serde_json::from_value(json!([
            {"user_id": 1, "content": "a", "created_at": "t1"},
            {"conversation_id": null, "user_id": 2, "content": "b", "created_at": "t2"},
            {"conversation_id": "abc", "user_id": 3, "content": "c", "created_at": "t3"}
        ]))
        .unwrap();
        let out = aggregate_conversations(&batch);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, MISSING_CONVERSATION_KEY);
        assert_eq!(out[0].message_count, 2);
        assert_eq!(out[1].id, "abc");
    }

    #[test]
    fn page_total_is_backend_message_total() {
        let page: MessagePage = serde_json::from_value(json!({
            "total": 1919,
            "data": [
                {"conversation_id": 1, "user_id": 9, "content": "hi", "created_at": "t1"},
                {"conversation_id": 1, "user_id": 9, "content": "bye", "created_at": "t2"}
            ]
        }))
        .unwrap();
        let params = ConversationListParams {
            page: Some(3),
            limit: Some(50),
            ..Default::default()
        };
        let out = conversation_page(page, &params);
        assert_eq!(out.total, 1919);
        assert_eq!(out.conversations.len(), 1);
        assert_eq!(out.page, 3);
        assert_eq!(out.limit, 50);
    }

    #[test]
    fn null_fields_in_page_fall_back_to_defaults() {
        let empty: MessagePage = serde_json::from_value(json!({"total": 0, "data": null})).unwrap();
        assert!(conversation_page(empty, &ConversationListParams::default())
            .conversations
            .is_empty());

        let page: MessagePage = serde_json::from_value(json!({
            "total": 2,
            "data": [
                {"conversation_id": 4.0, "user_id": 2, "content": null, "created_at": null},
                {"conversation_id": 4, "user_id": 2, "content": "lanjut", "created_at": "t2"}
            ]
        }))
        .unwrap();
        let out = conversation_page(page, &ConversationListParams::default());
        assert_eq!(out.conversations.len(), 1);
        let summary = &out.conversations[0];
        assert_eq!(summary.id, "4");
        assert_eq!(summary.message_count, 2);
        assert_eq!(summary.last_message, "");
        assert_eq!(summary.created_at, "");
    }

    #[test]
    fn numeric_and_string_ids_are_separate_conversations() {
        let batch: Vec<MessageRecord> = serde_json::from_value(json!([
            {"conversation_id": 1, "user_id": 1, "content": "a", "created_at": "t1"},
            {"conversation_id": "1", "user_id": 1, "content": "b", "created_at": "t2"},
            {"conversation_id": 1, "user_id": 1, "content": "c", "created_at": "t3"}
        ]))
        .unwrap();
        let out = aggregate_conversations(&batch);
        assert_eq!(out.len(), 2);
        assert_eq!((out[0].id.as_str(), out[0].message_count), ("1", 2));
        assert_eq!((out[1].id.as_str(), out[1].message_count), ("1", 1));
        assert_eq!(out[1].last_message, "b");
    }

    #[test]
    fn document_list_accepts_items_key_and_maps_embedding_status() {
        let raw = json!({
            "items": [
                {"id": 1, "title": "Catalog", "embedding_status": "processing", "status": "pending"},
                {"id": 2, "title": "FAQ", "status": "completed"}
            ],
            "total": 10
        });
        let list = document_list(&raw).unwrap();
        assert_eq!(list.total, 10);
        assert_eq!(list.documents[0].status, DocumentStatus::Processing);
        assert_eq!(list.documents[1].status, DocumentStatus::Completed);
    }

    #[test]
    fn document_list_accepts_documents_key_and_bare_array() {
        let keyed = document_list(&json!({"documents": [{"id": 4}]})).unwrap();
        assert_eq!(keyed.total, 1);

        let bare = document_list(&json!([{"id": 4}, {"id": 5}])).unwrap();
        assert_eq!(bare.documents.len(), 2);
        assert_eq!(bare.total, 2);

        let none = document_list(&json!({"unexpected": true})).unwrap();
        assert!(none.documents.is_empty());
        assert_eq!(none.total, 0);
    }

    #[test]
    fn system_status_prefers_nested_blocks() {
        let now = Utc::now();
        let nested = system_status(
            &json!({"qdrant": {"status": "healthy", "collection": "docs", "vectors": 5, "points": 5, "url": "http://q"}, "timestamp": "2025-01-01T00:00:00Z"}),
            now,
        );
        assert_eq!(nested.qdrant.status, "healthy");
        assert_eq!(nested.timestamp, "2025-01-01T00:00:00Z");

        let legacy = system_status(&json!({"vector_db": {"status": "green"}}), now);
        assert_eq!(legacy.qdrant.status, "green");
        assert_eq!(legacy.timestamp, iso_timestamp(now));
    }

    #[test]
    fn system_status_builds_block_from_flat_fields() {
        let s = system_status(
            &json!({"status": "degraded", "total_vectors": 156, "total_points": 150, "qdrant_url": "http://localhost:6333"}),
            Utc::now(),
        );
        assert!(s.success);
        assert_eq!(s.qdrant.status, "degraded");
        assert_eq!(s.qdrant.collection, "documents");
        assert_eq!(s.qdrant.vectors, 156);
        assert_eq!(s.qdrant.points, 150);
        assert_eq!(s.qdrant.url, "http://localhost:6333");

        let bare = system_status(&json!({}), Utc::now());
        assert_eq!(bare.qdrant.status, "unknown");
    }

    #[test]
    fn unavailable_status_is_error_state() {
        let s = system_status_unavailable(Utc::now());
        assert!(!s.success);
        assert_eq!(s.qdrant.status, "error");
        assert_eq!(s.qdrant.vectors, 0);
    }

    #[test]
    fn dashboard_stats_zero_fill() {
        let stats = dashboard_stats(&json!({"total_messages": 1234}));
        assert_eq!(stats.total_messages, 1234);
        assert_eq!(stats.today_messages, 0);
        assert!(stats.success);
    }

    #[test]
    fn analytics_overview_reads_nested_or_flat() {
        let nested = analytics_overview(&json!({"success": true, "data": {"total_messages": 9, "active_users": 3}}));
        assert_eq!(nested.data.total_messages, 9);
        assert_eq!(nested.data.active_users, 3);

        let flat = analytics_overview(&json!({"total_messages": 12, "today_messages": 2, "recent_messages_7d": 7}));
        assert_eq!(flat.data.total_messages, 12);
        assert_eq!(flat.data.messages_today, 2);
        assert_eq!(flat.data.messages_7d, 7);
    }

    #[test]
    fn settings_fill_defaults_and_keep_backend_values() {
        let s = settings(&json!({
            "chatbot_name": "Toko Bot",
            "timezone": "",
            "rate_limiting": {"enabled": true, "messages_per_minute": 5, "daily_limit": 50, "block_on_exceed": true}
        }));
        assert_eq!(s.general.chatbot_name, "Toko Bot");
        assert_eq!(s.general.default_language, "id");
        assert_eq!(s.general.timezone, "Asia/Jakarta");
        assert!(!s.general.business_hours.enabled);
        assert_eq!(s.general.business_hours.days, vec![1, 2, 3, 4, 5]);
        assert!(s.rate_limiting.enabled);
        assert_eq!(s.rate_limiting.messages_per_minute, 5);
        assert!(s.notifications.alert_on_errors);
        assert_eq!(s.integrations.redis.service, "redis");
    }

    #[test]
    fn rag_config_maps_min_score_and_defaults() {
        let r = rag_config(&json!({"config": {"model": "gpt-4o-mini", "min_score": 0.55, "top_k": 8}}));
        assert!(r.success);
        assert_eq!(r.config.llm.model, "gpt-4o-mini");
        assert_eq!(r.config.llm.max_tokens, 500);
        assert_eq!(r.config.retrieval.top_k, 8);
        assert!((r.config.retrieval.similarity_threshold - 0.55).abs() < f64::EPSILON);
        assert_eq!(r.config.retrieval.chunk_overlap, 200);
    }

    #[test]
    fn rag_config_keeps_explicit_zero_temperature() {
        let r = rag_config(&json!({"config": {"temperature": 0.0}}));
        assert_eq!(r.config.llm.temperature, 0.0);

        let missing = rag_config(&json!({}));
        assert_eq!(missing.config, RagConfig::default());
    }

    #[test]
    fn prompts_read_settings_subobject_or_root() {
        let nested = prompts(&json!({"settings": {"system_prompt": "Jawab singkat."}}));
        assert_eq!(nested.system, "Jawab singkat.");
        assert_eq!(nested.user, "Context: {context}\n\nQuestion: {query}");

        let root = prompts(&json!({"user_prompt_template": "Q: {query}"}));
        assert_eq!(root.system, "You are a helpful assistant.");
        assert_eq!(root.user, "Q: {query}");
    }
}
