use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::auth::Role;
use crate::error::{AppError, AppResult};
use crate::notification::DEFAULT_TOAST_DURATION_MS;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub intake: IntakeConfig,
    #[serde(default)]
    pub demo_accounts: Vec<DemoAccount>,
}

/// Bind address for the mock API server
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// JSON document seeding the in-memory collections
    #[serde(default)]
    pub seed_file: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            seed_file: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IntakeConfig {
    #[serde(default = "default_city")]
    pub default_city: String,
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,
}

fn default_city() -> String {
    "Nairobi".to_string()
}

fn default_toast_duration_ms() -> u64 {
    DEFAULT_TOAST_DURATION_MS
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            default_city: default_city(),
            toast_duration_ms: default_toast_duration_ms(),
        }
    }
}

/// Placeholder login entry; not a credential store
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DemoAccount {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub dealer_id: u32,
    #[serde(default)]
    pub agent_id: Option<u32>,
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            AppError::Configuration(format!(
                "Failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let config: AppConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration used when no file is given: local mock API and the two
    /// demo logins advertised on the login screen
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig::default(),
            api: ApiConfig::default(),
            logging: LoggingConfig::default(),
            intake: IntakeConfig::default(),
            demo_accounts: vec![
                DemoAccount {
                    username: "agent".to_string(),
                    password: "agent123".to_string(),
                    role: Role::Agent,
                    dealer_id: 1,
                    agent_id: Some(1),
                },
                DemoAccount {
                    username: "dealer".to_string(),
                    password: "dealer123".to_string(),
                    role: Role::Dealer,
                    dealer_id: 1,
                    agent_id: None,
                },
            ],
        }
    }

    /// Point the data-access client at another backend, re-checking the result
    pub fn with_api_url(mut self, base_url: &str) -> AppResult<Self> {
        self.api.base_url = base_url.to_string();
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> AppResult<()> {
        url::Url::parse(&self.api.base_url).map_err(|e| {
            AppError::Configuration(format!("Invalid api.base_url '{}': {}", self.api.base_url, e))
        })?;

        if self.intake.default_city.trim().is_empty() {
            return Err(AppError::Configuration(
                "intake.default_city must not be empty".to_string(),
            ));
        }

        for account in &self.demo_accounts {
            if account.role == Role::Agent && account.agent_id.is_none() {
                return Err(AppError::Configuration(format!(
                    "Agent account '{}' needs an agent_id",
                    account.username
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
server:
  host: "0.0.0.0"
  port: 8080
  seed_file: "data/db.json"
api:
  base_url: "http://localhost:8080"
  timeout_secs: 10
logging:
  level: debug
intake:
  default_city: Mombasa
demo_accounts:
  - username: agent1
    password: secret
    role: agent
    dealer_id: 4
    agent_id: 7
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.seed_file.as_deref(), Some("data/db.json"));
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.intake.default_city, "Mombasa");
        assert_eq!(config.intake.toast_duration_ms, DEFAULT_TOAST_DURATION_MS);
        assert_eq!(config.demo_accounts[0].agent_id, Some(7));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_yaml("{}").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.intake.default_city, "Nairobi");
        assert!(config.demo_accounts.is_empty());
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = AppConfig::from_yaml("api:\n  base_url: \"not a url\"\n");
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_api_url_override_is_validated() {
        let config = AppConfig::default_config()
            .with_api_url("http://10.0.0.5:4000")
            .unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.5:4000");
        assert_eq!(config.demo_accounts.len(), 2);

        let result = AppConfig::default_config().with_api_url("localhost 4000");
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_agent_account_requires_agent_id() {
        let yaml = r#"
demo_accounts:
  - username: agent
    password: agent123
    role: agent
    dealer_id: 1
"#;
        assert!(AppConfig::from_yaml(yaml).is_err());
    }
}
