//! Canned fixtures for previewing screens without a backend.
//!
//! Timestamps are relative to the `now` passed in so fixtures stay fresh.
//! Chart series are deterministic.

use chrono::{DateTime, Duration, Utc};

use crate::adapter::iso_timestamp;
use crate::models::analytics::{
    AnalyticsOverview, AnalyticsOverviewResponse, MessageVolume, PopularQuery, SeriesResponse,
    TokenUsage, TopUser,
};
use crate::models::conversation::{ConversationListResponse, ConversationStatus, ConversationSummary};
use crate::models::document::{Document, DocumentList, DocumentStatus};
use crate::models::rag::{LlmConfig, Prompts, PromptsResponse, RagConfig, RagConfigResponse, RetrievalConfig};
use crate::models::settings::{
    BusinessHours, GeneralSettings, IntegrationService, IntegrationStatus, IntegrationsSettings,
    NotificationSettings, RateLimitingSettings, Settings, SettingsResponse,
};
use crate::models::system::{DashboardStats, SystemStatus, VectorDbStatus};
use crate::models::user::{UserListResponse, UserStatus, WhatsAppUser};
use crate::models::vector::{VectorCollection, VectorCollectionsResponse};
use crate::models::{DEFAULT_LIMIT, DEFAULT_PAGE};

const CHART_DAYS: i64 = 30;

pub fn system_status(now: DateTime<Utc>) -> SystemStatus {
    SystemStatus {
        success: true,
        qdrant: VectorDbStatus {
            status: "healthy".into(),
            collection: "documents".into(),
            vectors: 156,
            points: 156,
            url: "http://localhost:6333".into(),
        },
        timestamp: iso_timestamp(now),
    }
}

pub fn dashboard_stats() -> DashboardStats {
    DashboardStats {
        success: true,
        total_messages: 1234,
        avg_response_time_ms: 1250.0,
        total_tokens: 45678,
        recent_messages_7d: 234,
        today_messages: 45,
    }
}

pub fn documents(now: DateTime<Utc>) -> DocumentList {
    let doc = |id: i64, title: &str, file_type: &str, chunks: u32, status: DocumentStatus| Document {
        id,
        title: title.into(),
        file_type: file_type.into(),
        upload_date: iso_timestamp(now),
        status,
        chunks_count: Some(chunks),
        ..Default::default()
    };
    let documents = vec![
        doc(1, "Product Catalog 2024", "pdf", 45, DocumentStatus::Completed),
        doc(2, "FAQ Document", "text", 12, DocumentStatus::Completed),
        doc(3, "Company Policies", "pdf", 78, DocumentStatus::Processing),
    ];
    DocumentList {
        total: documents.len() as u64,
        documents,
    }
}

pub fn conversations(now: DateTime<Utc>) -> ConversationListResponse {
    let minutes_ago = |m: i64| iso_timestamp(now - Duration::minutes(m));
    let conversations = vec![
        ConversationSummary {
            id: "1".into(),
            phone: "+6281234567890".into(),
            name: Some("John Doe".into()),
            last_message: "Terima kasih atas informasinya!".into(),
            last_message_time: minutes_ago(30),
            status: ConversationStatus::Active,
            message_count: 15,
            created_at: minutes_ago(60 * 24),
            updated_at: minutes_ago(30),
        },
        ConversationSummary {
            id: "2".into(),
            phone: "+6289876543210".into(),
            name: Some("Jane Smith".into()),
            last_message: "Berapa harga produk X?".into(),
            last_message_time: minutes_ago(120),
            status: ConversationStatus::Active,
            message_count: 8,
            created_at: minutes_ago(60 * 48),
            updated_at: minutes_ago(120),
        },
    ];
    ConversationListResponse {
        success: true,
        total: conversations.len() as u64,
        conversations,
        page: DEFAULT_PAGE,
        limit: DEFAULT_LIMIT,
    }
}

pub fn users(now: DateTime<Utc>) -> UserListResponse {
    let minutes_ago = |m: i64| iso_timestamp(now - Duration::minutes(m));
    let users = vec![
        WhatsAppUser {
            id: "1".into(),
            phone: "+6281234567890".into(),
            name: Some("John Doe".into()),
            messages_count: 25,
            last_active: minutes_ago(30),
            status: UserStatus::Active,
            created_at: minutes_ago(60 * 24 * 7),
            notes: None,
        },
        WhatsAppUser {
            id: "2".into(),
            phone: "+6289876543210".into(),
            name: Some("Jane Smith".into()),
            messages_count: 12,
            last_active: minutes_ago(120),
            status: UserStatus::Active,
            created_at: minutes_ago(60 * 24 * 3),
            notes: None,
        },
    ];
    UserListResponse {
        success: true,
        total: users.len() as u64,
        users,
        page: DEFAULT_PAGE,
        limit: DEFAULT_LIMIT,
    }
}

pub fn vector_collections() -> VectorCollectionsResponse {
    VectorCollectionsResponse {
        success: true,
        collections: vec![VectorCollection {
            name: "documents".into(),
            vectors_count: 156,
            indexed_vectors_count: 156,
            points_count: 156,
            segments_count: 1,
            status: "green".into(),
            optimizer_status: "ok".into(),
            disk_data_size: 2_048_000,
        }],
    }
}

pub fn rag_config() -> RagConfigResponse {
    RagConfigResponse {
        success: true,
        config: RagConfig {
            llm: LlmConfig {
                max_tokens: 2000,
                ..LlmConfig::default()
            },
            retrieval: RetrievalConfig::default(),
        },
    }
}

pub fn prompts() -> PromptsResponse {
    PromptsResponse {
        success: true,
        prompts: Prompts {
            system: "You are a helpful AI assistant. Answer questions based on the provided context.".into(),
            user: "Context: {context}\n\nQuestion: {query}\n\nAnswer:".into(),
        },
    }
}

pub fn analytics_overview() -> AnalyticsOverviewResponse {
    let top = |phone: &str, name: &str, message_count: u64| TopUser {
        phone: phone.into(),
        name: Some(name.into()),
        message_count,
    };
    AnalyticsOverviewResponse {
        success: true,
        data: AnalyticsOverview {
            total_messages: 1234,
            active_users: 45,
            avg_response_time_ms: 1250.0,
            total_tokens: 456_789,
            messages_today: 67,
            messages_7d: 456,
            messages_30d: 1234,
            top_users: vec![
                top("+6281234567890", "John Doe", 125),
                top("+6289876543210", "Jane Smith", 98),
                top("+6285555555555", "Bob Wilson", 76),
            ],
        },
    }
}

/// Calendar dates of the last 30 days, oldest first, ending today.
fn chart_dates(now: DateTime<Utc>) -> impl Iterator<Item = (u64, String)> {
    (0..CHART_DAYS).map(move |i| {
        let day = now - Duration::days(CHART_DAYS - 1 - i);
        (i as u64, day.format("%Y-%m-%d").to_string())
    })
}

pub fn messages_chart(now: DateTime<Utc>) -> SeriesResponse<MessageVolume> {
    SeriesResponse {
        success: true,
        data: chart_dates(now)
            .map(|(i, date)| MessageVolume {
                date,
                count: 20 + (i * 37) % 50,
            })
            .collect(),
    }
}

pub fn tokens_chart(now: DateTime<Utc>) -> SeriesResponse<TokenUsage> {
    SeriesResponse {
        success: true,
        data: chart_dates(now)
            .map(|(i, date)| TokenUsage {
                date,
                tokens: 1000 + (i * 1543) % 5000,
            })
            .collect(),
    }
}

pub fn popular_queries() -> SeriesResponse<PopularQuery> {
    let q = |query: &str, count: u64, ms: f64| PopularQuery {
        query: query.into(),
        count,
        avg_response_time_ms: ms,
    };
    SeriesResponse {
        success: true,
        data: vec![
            q("Berapa harga produk A?", 45, 1200.0),
            q("Bagaimana cara pembayaran?", 38, 1100.0),
            q("Apakah ada diskon?", 32, 950.0),
            q("Kapan bisa dikirim?", 28, 1300.0),
            q("Lokasi toko dimana?", 25, 800.0),
        ],
    }
}

pub fn settings() -> SettingsResponse {
    SettingsResponse {
        success: true,
        settings: Settings {
            general: GeneralSettings {
                business_hours: BusinessHours {
                    enabled: true,
                    ..BusinessHours::default()
                },
                ..GeneralSettings::default()
            },
            integrations: IntegrationsSettings {
                waha: IntegrationStatus::connected(IntegrationService::Waha).with_url("http://localhost:3000"),
                qdrant: IntegrationStatus::connected(IntegrationService::Qdrant).with_url("http://localhost:6333"),
                ..IntegrationsSettings::default()
            },
            rate_limiting: RateLimitingSettings {
                enabled: true,
                ..RateLimitingSettings::default()
            },
            notifications: NotificationSettings {
                email_alerts: true,
                ..NotificationSettings::default()
            },
        },
    }
}
