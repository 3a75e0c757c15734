use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_TOKEN_PATH: &str = "~/.config/ragdesk/auth_token";

#[derive(Debug, Deserialize, Clone)]
pub struct RagdeskConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub token_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_path: DEFAULT_TOKEN_PATH.to_string(),
        }
    }
}

impl SessionConfig {
    /// Token path with `~` and `$VAR` expanded.
    pub fn resolved_token_path(&self) -> PathBuf {
        match shellexpand::full(&self.token_path) {
            Ok(expanded) => PathBuf::from(expanded.into_owned()),
            Err(_) => PathBuf::from(shellexpand::tilde(&self.token_path).into_owned()),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for RagdeskConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            session: SessionConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl RagdeskConfig {
    /// Layered load: built-in defaults, then the TOML file, then
    /// `RAGDESK__SECTION__KEY` environment variables.
    ///
    /// An explicit `path` must exist; without one `ragdesk.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => File::with_name(p).required(true),
            None => File::with_name("ragdesk").required(false),
        };

        let s = Config::builder()
            .set_default("api.base_url", DEFAULT_API_URL)?
            .set_default("api.timeout_seconds", DEFAULT_TIMEOUT_SECONDS)?
            .set_default("session.token_path", DEFAULT_TOKEN_PATH)?
            .set_default("log.level", "info")?
            .add_source(file)
            .add_source(
                Environment::with_prefix("RAGDESK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_backend_conventions() {
        let cfg = RagdeskConfig::default();
        assert_eq!(cfg.api.base_url, "http://localhost:8000");
        assert_eq!(cfg.api.timeout(), Duration::from_secs(30));
        assert_eq!(cfg.log.level, "info");
    }

    #[test]
    fn load_reads_toml_and_keeps_missing_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"https://admin.example.test\"\n\n[session]\ntoken_path = \"/tmp/ragdesk-token\""
        )
        .unwrap();

        let cfg = RagdeskConfig::load(Some(file.path().to_str().unwrap())).unwrap();
        assert_eq!(cfg.api.base_url, "https://admin.example.test");
        assert_eq!(cfg.api.timeout_seconds, 30);
        assert_eq!(cfg.session.resolved_token_path(), PathBuf::from("/tmp/ragdesk-token"));
    }

    #[test]
    fn load_fails_for_missing_explicit_file() {
        assert!(RagdeskConfig::load(Some("/definitely/not/here/ragdesk.toml")).is_err());
    }

    #[test]
    fn tilde_is_expanded_in_token_path() {
        let cfg = SessionConfig::default();
        let resolved = cfg.resolved_token_path();
        assert!(!resolved.to_string_lossy().starts_with('~'));
        assert!(resolved.ends_with("ragdesk/auth_token"));
    }
}
