use std::env;

use url::Url;

use crate::error::{AppError, AppResult};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
    pub request: RequestConfig,
    pub display: DisplayConfig,
}

/// Roadmap API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

/// Chat transcript display configuration
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// Bot messages longer than this many characters get a collapsed preview
    pub preview_chars: usize,
}

/// Default roadmap server address
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url =
            env::var("ROADMAP_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let api = ApiConfig::new(base_url)?;

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let request = RequestConfig {
            timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30000),
            max_retries: env::var("MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3),
            retry_delay_ms: env::var("RETRY_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1000),
        };

        let display = DisplayConfig {
            preview_chars: env::var("MESSAGE_PREVIEW_CHARS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(300),
        };

        Ok(Config {
            api,
            logging,
            request,
            display,
        })
    }
}

impl ApiConfig {
    /// Validate and normalize a base URL
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        let base_url = base_url.into();
        let parsed = Url::parse(&base_url).map_err(|e| AppError::Config {
            message: format!("ROADMAP_API_URL is not a valid URL ({}): {}", base_url, e),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::Config {
                message: format!(
                    "ROADMAP_API_URL must use http or https, got '{}'",
                    parsed.scheme()
                ),
            });
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30000,
            max_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { preview_chars: 300 }
    }
}
