/// Unified error handling module
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Error payload printed in place of a result
#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    #[serde(rename = "错误")]
    pub message: String,
    #[serde(rename = "错误代码")]
    pub code: String,
    #[serde(rename = "详细信息")]
    pub details: Option<Value>,
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("需要 NASA API Key (NASA API Key is required: --api_key, NASA_API_KEY or ~/.cursor/mcp.json)")]
    MissingCredential,
    #[error("缺少必要参数 (missing required parameter): {0}")]
    MissingParameter(String),
    #[error("无效输入 (invalid input): {0}")]
    InvalidInput(String),
    #[error("上游请求失败 (upstream request failed): {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
        body: Option<Value>,
    },
    #[error("请求超时 (request timed out after {0}s)")]
    Timeout(u64),
    #[error("响应格式不符 (unexpected response shape): {0}")]
    ShapeMismatch(String),
}

impl QueryError {
    /// Stable machine-readable code
    pub fn code(&self) -> String {
        match self {
            QueryError::MissingCredential => "MISSING_CREDENTIAL".to_string(),
            QueryError::MissingParameter(_) => "MISSING_PARAMETER".to_string(),
            QueryError::InvalidInput(_) => "INVALID_INPUT".to_string(),
            QueryError::Upstream { status, .. } => match status {
                Some(403) => "UPSTREAM_403".to_string(),
                Some(404) => "UPSTREAM_404".to_string(),
                Some(429) => "UPSTREAM_429".to_string(),
                Some(500..=599) => "UPSTREAM_5XX".to_string(),
                _ => "UPSTREAM_ERROR".to_string(),
            },
            QueryError::Timeout(_) => "TIMEOUT".to_string(),
            QueryError::ShapeMismatch(_) => "SHAPE_MISMATCH".to_string(),
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        let details = match self {
            QueryError::Upstream { body, .. } => body.clone(),
            _ => None,
        };

        ErrorPayload {
            message: self.to_string(),
            code: self.code(),
            details,
        }
    }
}

/// Type alias for query pipeline results
pub type QueryResult<T> = Result<T, QueryError>;
