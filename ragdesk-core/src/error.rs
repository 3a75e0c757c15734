use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not authenticated (HTTP 401)")]
    Unauthorized,

    #[error("Server error ({status}): {body}")]
    Server { status: StatusCode, body: String },

    #[error("Request rejected ({status}): {body}")]
    Status { status: StatusCode, body: String },

    #[error("Invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Credential store error: {0}")]
    Credential(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// The backend's `detail` message, when the error body is `{"detail": ...}`.
    pub fn detail(&self) -> Option<String> {
        let body = match self {
            ApiError::Server { body, .. } | ApiError::Status { body, .. } => body,
            _ => return None,
        };
        let json: serde_json::Value = serde_json::from_str(body).ok()?;
        match &json["detail"] {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            ApiError::Server { status, .. } | ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(e) => e.status(),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_reads_string_message() {
        let err = ApiError::Status {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: r#"{"detail":"Unsupported file type"}"#.to_string(),
        };
        assert_eq!(err.detail().as_deref(), Some("Unsupported file type"));
    }

    #[test]
    fn detail_absent_for_plain_body() {
        let err = ApiError::Server {
            status: StatusCode::BAD_GATEWAY,
            body: "upstream down".to_string(),
        };
        assert!(err.detail().is_none());
        assert!(ApiError::Unauthorized.detail().is_none());
    }

    #[test]
    fn status_maps_variants() {
        assert_eq!(ApiError::Unauthorized.status(), Some(StatusCode::UNAUTHORIZED));
        assert!(ApiError::InvalidResponse("x".into()).status().is_none());
    }
}
