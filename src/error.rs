use serde_json::json;
use thiserror::Error;

use crate::transport::jsonrpc::JsonRpcError;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Prompt not found: {0}")]
    PromptNotFound(String),

    #[error("Binance API error (HTTP {status_code}): {body}")]
    Upstream { status_code: u16, body: String },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProviderError {
    /// Stable tag for the error kind, carried in protocol error data
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::InvalidArgument(_) => "invalid_argument",
            ProviderError::ToolNotFound(_)
            | ProviderError::ResourceNotFound(_)
            | ProviderError::PromptNotFound(_) => "not_found",
            ProviderError::Upstream { .. } => "upstream_error",
            ProviderError::Connection(_) => "connection_error",
            ProviderError::Parse(_) => "parse_error",
            ProviderError::Internal(_) => "internal_error",
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            ProviderError::Connection(format!("Failed to connect to Binance API: {}", err))
        } else if err.is_decode() {
            ProviderError::Parse(format!("Failed to decode Binance response: {}", err))
        } else {
            ProviderError::Connection(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Parse(format!("JSON parsing failed: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;

impl From<ProviderError> for JsonRpcError {
    fn from(err: ProviderError) -> Self {
        let code = match &err {
            ProviderError::InvalidArgument(_) => JsonRpcError::INVALID_PARAMS,
            ProviderError::ToolNotFound(_)
            | ProviderError::ResourceNotFound(_)
            | ProviderError::PromptNotFound(_) => JsonRpcError::METHOD_NOT_FOUND,
            _ => JsonRpcError::INTERNAL_ERROR,
        };

        let data = match &err {
            ProviderError::Upstream { status_code, body } => json!({
                "kind": err.kind(),
                "statusCode": status_code,
                "body": body,
            }),
            _ => json!({ "kind": err.kind() }),
        };

        JsonRpcError::with_data(code, err.to_string(), data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_kinds() {
        assert_eq!(ProviderError::ToolNotFound("x".into()).kind(), "not_found");
        assert_eq!(ProviderError::ResourceNotFound("x".into()).kind(), "not_found");
        assert_eq!(ProviderError::PromptNotFound("x".into()).kind(), "not_found");
        assert_eq!(ProviderError::InvalidArgument("x".into()).kind(), "invalid_argument");
    }

    #[test]
    fn test_upstream_error_to_jsonrpc() {
        let err = ProviderError::Upstream {
            status_code: 404,
            body: "{\"code\":-1121}".to_string(),
        };

        let rpc: JsonRpcError = err.into();
        assert_eq!(rpc.code, -32603);
        let data = rpc.data.unwrap();
        assert_eq!(data["kind"], "upstream_error");
        assert_eq!(data["statusCode"], 404);
        assert_eq!(data["body"], "{\"code\":-1121}");
    }

    #[test]
    fn test_invalid_argument_to_jsonrpc() {
        let rpc: JsonRpcError = ProviderError::InvalidArgument("bad window".into()).into();
        assert_eq!(rpc.code, -32602);
        assert!(rpc.message.contains("bad window"));
        assert_eq!(rpc.data.unwrap()["kind"], "invalid_argument");
    }
}
