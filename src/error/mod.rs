use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Roadmap error: {0}")]
    Roadmap(#[from] RoadmapError),
}

/// Roadmap API errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Roadmap API unavailable: {message} (retries: {retries})")]
    Unavailable { message: String, retries: u32 },

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors raised while interpreting a roadmap payload
#[derive(Debug, Error)]
pub enum RoadmapError {
    #[error("Malformed roadmap snapshot: {message}")]
    MalformedSnapshot { message: String },

    #[error("Unknown node: {node_id}")]
    UnknownNode { node_id: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for roadmap API calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for roadmap interpretation
pub type RoadmapResult<T> = Result<T, RoadmapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Config {
            message: "bad url".to_string(),
        };
        assert_eq!(err.to_string(), "Configuration error: bad url");
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Unavailable {
            message: "connection refused".to_string(),
            retries: 3,
        };
        assert_eq!(
            err.to_string(),
            "Roadmap API unavailable: connection refused (retries: 3)"
        );

        let err = ApiError::Status {
            status: 500,
            message: "Internal Server Error".to_string(),
        };
        assert_eq!(err.to_string(), "Server returned 500: Internal Server Error");

        let err = ApiError::InvalidResponse {
            message: "not json".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid response: not json");

        let err = ApiError::Timeout { timeout_ms: 5000 };
        assert_eq!(err.to_string(), "Request timeout after 5000ms");
    }

    #[test]
    fn test_roadmap_error_display() {
        let err = RoadmapError::MalformedSnapshot {
            message: "missing nodes".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed roadmap snapshot: missing nodes");

        let err = RoadmapError::UnknownNode {
            node_id: "topicB".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown node: topicB");
    }

    #[test]
    fn test_api_error_conversion_to_app_error() {
        let api_err = ApiError::Timeout { timeout_ms: 1000 };
        let app_err: AppError = api_err.into();
        assert!(matches!(app_err, AppError::Api(_)));
    }

    #[test]
    fn test_roadmap_error_conversion_to_app_error() {
        let roadmap_err = RoadmapError::UnknownNode {
            node_id: "x".to_string(),
        };
        let app_err: AppError = roadmap_err.into();
        assert!(matches!(app_err, AppError::Roadmap(_)));
        assert!(app_err.to_string().contains("Unknown node"));
    }

    #[test]
    fn test_json_error_conversion_to_roadmap_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: RoadmapError = json_err.into();
        assert!(matches!(err, RoadmapError::Json(_)));
    }
}
