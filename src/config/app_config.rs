use serde::Deserialize;

use crate::infrastructure::observability::ObservabilityConfig;
use crate::infrastructure::storage::StorageType;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `memory` or `postgres`
    pub backend: String,
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// Random addresses to generate at startup when the address table is empty
    pub seed_addresses: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: u64,
    pub api_key_prefix: String,
    /// Argon2id memory cost in KiB
    pub password_memory_kib: u32,
    pub password_iterations: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            database_url: None,
            max_connections: 5,
            seed_addresses: 0,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_hours: 24,
            api_key_prefix: "nla_live_".to_string(),
            password_memory_kib: 19 * 1024,
            password_iterations: 2,
        }
    }
}

impl StorageConfig {
    pub fn storage_type(&self) -> Result<StorageType, String> {
        self.backend.parse()
    }
}

impl AppConfig {
    /// Load layered configuration: `config/default`, `config/local`, then `APP__*` variables.
    ///
    /// The conventional `DATABASE_URL`, `JWT_SECRET` and `PORT` variables are
    /// honoured when the corresponding settings were not given.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.apply_env_fallbacks(|key| std::env::var(key).ok());

        Ok(app_config)
    }

    fn apply_env_fallbacks(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.storage.database_url.is_none() {
            self.storage.database_url = lookup("DATABASE_URL");
        }

        if self.auth.jwt_secret == AuthConfig::default().jwt_secret {
            if let Some(secret) = lookup("JWT_SECRET") {
                self.auth.jwt_secret = secret;
            }
        }

        if self.server.port == ServerConfig::default().port {
            if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
                self.server.port = port;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.storage.backend, "memory");
        assert_eq!(config.storage.storage_type(), Ok(StorageType::InMemory));
        assert_eq!(config.auth.jwt_expiration_hours, 24);
        assert_eq!(config.auth.api_key_prefix, "nla_live_");
    }

    #[test]
    fn test_partial_sections_deserialize() {
        let config: AppConfig = serde_json::from_str(
            r#"{"server": {"port": 9000}, "storage": {"backend": "postgres"}}"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.storage_type(), Ok(StorageType::Postgres));
        assert_eq!(config.storage.max_connections, 5);
    }

    #[test]
    fn test_env_fallbacks() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "postgres://localhost/addresses"),
            ("JWT_SECRET", "from-env"),
            ("PORT", "8081"),
        ]);

        let mut config = AppConfig::default();
        config.apply_env_fallbacks(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(
            config.storage.database_url.as_deref(),
            Some("postgres://localhost/addresses")
        );
        assert_eq!(config.auth.jwt_secret, "from-env");
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn test_env_fallbacks_do_not_override_explicit_settings() {
        let mut config = AppConfig::default();
        config.storage.database_url = Some("postgres://configured/db".to_string());
        config.auth.jwt_secret = "configured".to_string();
        config.server.port = 9000;

        config.apply_env_fallbacks(|_| Some("ignored".to_string()));

        assert_eq!(
            config.storage.database_url.as_deref(),
            Some("postgres://configured/db")
        );
        assert_eq!(config.auth.jwt_secret, "configured");
        assert_eq!(config.server.port, 9000);
    }
}
