use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BusinessHours {
    pub enabled: bool,
    pub start: String,
    pub end: String,
    pub days: Vec<u8>,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            enabled: false,
            start: "09:00".to_string(),
            end: "17:00".to_string(),
            days: vec![1, 2, 3, 4, 5],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralSettings {
    pub chatbot_name: String,
    pub default_language: String,
    pub timezone: String,
    pub business_hours: BusinessHours,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            chatbot_name: "WhatsApp RAG Bot".to_string(),
            default_language: "id".to_string(),
            timezone: "Asia/Jakarta".to_string(),
            business_hours: BusinessHours::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Connected,
    Disconnected,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntegrationStatus {
    pub service: String,
    pub status: ConnectionState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_check: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl IntegrationStatus {
    pub fn connected(service: IntegrationService) -> Self {
        Self {
            service: service.as_str().to_string(),
            status: ConnectionState::Connected,
            url: None,
            last_check: None,
            error_message: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntegrationsSettings {
    pub waha: IntegrationStatus,
    pub openai: IntegrationStatus,
    pub qdrant: IntegrationStatus,
    pub redis: IntegrationStatus,
}

impl Default for IntegrationsSettings {
    fn default() -> Self {
        Self {
            waha: IntegrationStatus::connected(IntegrationService::Waha),
            openai: IntegrationStatus::connected(IntegrationService::Openai),
            qdrant: IntegrationStatus::connected(IntegrationService::Qdrant),
            redis: IntegrationStatus::connected(IntegrationService::Redis),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateLimitingSettings {
    pub enabled: bool,
    pub messages_per_minute: u32,
    pub daily_limit: u32,
    pub block_on_exceed: bool,
}

impl Default for RateLimitingSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            messages_per_minute: 10,
            daily_limit: 100,
            block_on_exceed: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationSettings {
    pub email_alerts: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    pub alert_on_errors: bool,
    pub alert_on_high_usage: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_alerts: false,
            webhook_url: Some(String::new()),
            alert_on_errors: true,
            alert_on_high_usage: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub general: GeneralSettings,
    pub integrations: IntegrationsSettings,
    pub rate_limiting: RateLimitingSettings,
    pub notifications: NotificationSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettingsResponse {
    pub success: bool,
    pub settings: Settings,
}

/// External services whose connectivity the settings screen reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationService {
    Waha,
    Openai,
    Qdrant,
    Redis,
}

impl IntegrationService {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationService::Waha => "waha",
            IntegrationService::Openai => "openai",
            IntegrationService::Qdrant => "qdrant",
            IntegrationService::Redis => "redis",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestConnectionResponse {
    pub success: bool,
    pub service: String,
    pub status: ConnectionState,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
}
