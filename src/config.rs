use serde::Deserialize;
use std::env;
use std::str::FromStr;
use url::Url;

const MIN_JWT_SECRET_BYTES: usize = 32;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub public_url: Option<String>,
    /// Единственный origin, которому разрешён CORS (`client.host`)
    pub client_host: String,
    pub jwt_secret: String,
    pub access_token_ttl_secs: Option<i64>,
    pub refresh_token_ttl_secs: Option<i64>,
    pub cookie_secure: Option<bool>,
    pub elasticsearch_url: Option<String>,
    pub search_index: Option<String>,
    pub sync_batch_size: Option<u64>,
    pub max_body_bytes: Option<usize>,
    pub database_auto_migrate: Option<bool>,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub kakao_client_id: Option<String>,
    pub kakao_client_secret: Option<String>,
    pub naver_client_id: Option<String>,
    pub naver_client_secret: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            public_url: None,
            client_host: "http://localhost:5173".to_string(),
            jwt_secret: String::new(),
            access_token_ttl_secs: None,
            refresh_token_ttl_secs: None,
            cookie_secure: None,
            elasticsearch_url: None,
            search_index: None,
            sync_batch_size: None,
            max_body_bytes: None,
            database_auto_migrate: None,
            google_client_id: None,
            google_client_secret: None,
            kakao_client_id: None,
            kakao_client_secret: None,
            naver_client_id: None,
            naver_client_secret: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;

        let config: Config = cfg.try_deserialize()?;

        // Валидация конфигурации
        config.validate()?;

        Ok(config)
    }

    /// Валидирует конфигурацию на наличие потенциальных проблем безопасности
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if !self
            .host
            .chars()
            .all(|c| c.is_alphanumeric() || ".:-_".contains(c))
        {
            return Err(config::ConfigError::Message(
                "Invalid host format".to_string(),
            ));
        }

        if self.port < 1024 {
            return Err(config::ConfigError::Message(
                "Port must be 1024 or higher for security reasons".to_string(),
            ));
        }

        validate_http_url("client_host", &self.client_host)?;
        if let Some(public_url) = &self.public_url {
            validate_http_url("public_url", public_url)?;
        }
        if let Some(es_url) = &self.elasticsearch_url {
            validate_http_url("elasticsearch_url", es_url)?;
        }

        if self.jwt_secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(config::ConfigError::Message(format!(
                "jwt_secret must be at least {} bytes",
                MIN_JWT_SECRET_BYTES
            )));
        }

        for (name, ttl) in [
            ("access_token_ttl_secs", self.access_token_ttl_secs),
            ("refresh_token_ttl_secs", self.refresh_token_ttl_secs),
        ] {
            if matches!(ttl, Some(v) if v <= 0) {
                return Err(config::ConfigError::Message(format!(
                    "{} must be positive",
                    name
                )));
            }
        }

        if self.sync_batch_size == Some(0) {
            return Err(config::ConfigError::Message(
                "sync_batch_size must be positive".to_string(),
            ));
        }

        // Валидируем лимит тела (если указан): 1KB..50MB
        if let Some(limit) = self.max_body_bytes {
            let min = 1024;
            let max = 50 * 1024 * 1024;
            if limit < min || limit > max {
                return Err(config::ConfigError::Message(format!(
                    "max_body_bytes must be between {} and {} bytes",
                    min, max
                )));
            }
        }

        Ok(())
    }
}

impl Config {
    pub fn effective_public_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.host, self.port))
            .trim_end_matches('/')
            .to_string()
    }

    pub fn effective_access_token_ttl(&self) -> i64 {
        self.access_token_ttl_secs.unwrap_or(60 * 60)
    }

    pub fn effective_refresh_token_ttl(&self) -> i64 {
        self.refresh_token_ttl_secs.unwrap_or(14 * 24 * 60 * 60)
    }

    pub fn effective_cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(false)
    }

    pub fn effective_search_index(&self) -> &str {
        self.search_index.as_deref().unwrap_or("recipes")
    }

    pub fn effective_sync_batch_size(&self) -> u64 {
        self.sync_batch_size.unwrap_or(500)
    }

    pub fn effective_max_body_bytes(&self) -> usize {
        self.max_body_bytes.unwrap_or(2 * 1024 * 1024)
    }
}

fn validate_http_url(name: &str, value: &str) -> Result<(), config::ConfigError> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(config::ConfigError::Message(format!(
            "{} must be an absolute http(s) URL, got `{}`",
            name, value
        ))),
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub connect_timeout_secs: Option<u64>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
    pub sql_log: Option<bool>,
}

impl DatabaseSettings {
    pub fn default_from_url(url: String) -> Self {
        Self {
            url,
            max_connections: parse_env_var("DATABASE_MAX_CONNECTIONS"),
            min_connections: parse_env_var("DATABASE_MIN_CONNECTIONS"),
            connect_timeout_secs: parse_env_var("DATABASE_CONNECT_TIMEOUT_SECS"),
            acquire_timeout_secs: parse_env_var("DATABASE_ACQUIRE_TIMEOUT_SECS"),
            idle_timeout_secs: parse_env_var("DATABASE_IDLE_TIMEOUT_SECS"),
            sql_log: parse_env_var("DATABASE_SQL_LOG"),
        }
    }
}

fn parse_env_var<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    env::var(key).ok().and_then(|value| value.parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            jwt_secret: "a".repeat(32),
            ..Config::default()
        }
    }

    #[test]
    fn accepts_a_minimal_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn rejects_short_jwt_secret() {
        let config = Config {
            jwt_secret: "short".to_string(),
            ..valid()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_http_client_host() {
        let config = Config {
            client_host: "localhost:5173".to_string(),
            ..valid()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_privileged_port() {
        let config = Config {
            port: 80,
            ..valid()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn public_url_falls_back_to_bind_address() {
        assert_eq!(valid().effective_public_url(), "http://127.0.0.1:8080");

        let config = Config {
            public_url: Some("https://api.nangpago.kr/".to_string()),
            ..valid()
        };
        assert_eq!(config.effective_public_url(), "https://api.nangpago.kr");
    }
}
