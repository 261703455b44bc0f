//! Gateway adapter errors

use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Failures decoding or encoding a proxy event. These happen before the
/// dispatcher sees the request, so they have no HTTP status of their own.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid proxy event: {0}")]
    InvalidEvent(#[from] serde_json::Error),

    #[error("Invalid HTTP method: {0:?}")]
    InvalidMethod(String),

    #[error("Invalid base64 body: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Body is not UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

impl GatewayError {
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::InvalidEvent(_) => "USER_GATEWAY_INVALID_EVENT",
            GatewayError::InvalidMethod(_) => "USER_GATEWAY_INVALID_METHOD",
            GatewayError::InvalidBase64(_) => "USER_GATEWAY_INVALID_BASE64",
            GatewayError::InvalidUtf8(_) => "USER_GATEWAY_INVALID_UTF8",
        }
    }
}
