use axum::http::HeaderValue;
use std::env;
use std::path::PathBuf;

const DEFAULT_BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    pub cors_origin: HeaderValue,
    // Static uploads
    pub upload_dir: PathBuf,
    pub uploads_prefix: String,
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_source(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup; unset keys take defaults
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = var("PORT", "3000");
        let cors_origin = var("CORS_ORIGIN", "http://localhost:5173");
        let uploads_prefix = var("UPLOADS_PREFIX", "/uploads");
        let body_limit = var("BODY_LIMIT_BYTES", &DEFAULT_BODY_LIMIT_BYTES.to_string());

        if !uploads_prefix.starts_with('/') || uploads_prefix == "/" {
            return Err(ConfigError::Invalid {
                key: "UPLOADS_PREFIX",
                value: uploads_prefix,
            });
        }

        let config = Config {
            host: var("HOST", "0.0.0.0"),
            port: port.parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: port.clone(),
            })?,
            environment: match var("ENVIRONMENT", "development").as_str() {
                "production" => Environment::Production,
                "test" => Environment::Test,
                _ => Environment::Development,
            },
            log_format: match var("LOG_FORMAT", "pretty").as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            cors_origin: HeaderValue::from_str(&cors_origin).map_err(|_| ConfigError::Invalid {
                key: "CORS_ORIGIN",
                value: cors_origin.clone(),
            })?,
            upload_dir: PathBuf::from(var("UPLOAD_DIR", "./uploads")),
            uploads_prefix,
            body_limit_bytes: body_limit.parse().map_err(|_| ConfigError::Invalid {
                key: "BODY_LIMIT_BYTES",
                value: body_limit.clone(),
            })?,
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
