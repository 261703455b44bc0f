//! # Dispatch Errors
//!
//! Every way a request can fail to produce a user, and the response each
//! one turns into.

use axum::http::{Method, StatusCode};
use thiserror::Error;

use super::response::Response;
use crate::store::StoreError;

/// Result type for dispatcher operations
pub type DispatchResult<T> = Result<T, DispatchError>;

pub const MSG_NOT_FOUND: &str = "User not found";
pub const MSG_INVALID_REQUEST: &str = "Invalid request";
pub const MSG_METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub const MSG_INVALID_BODY: &str = "Invalid request body";
pub const MSG_CONFLICT: &str = "User already exists";
pub const MSG_INTERNAL: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum DispatchError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// No record for the path key
    #[error("User not found")]
    NotFound,

    /// Request matched no operation (GET without a path key)
    #[error("Invalid request")]
    InvalidRequest,

    /// PUT or DELETE without a path key
    #[error("Missing path key")]
    MissingKey,

    /// Verb outside GET/POST/PUT/DELETE
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(Method),

    /// Body absent or not a user object
    #[error("Malformed body: {0}")]
    MalformedBody(String),

    /// Create of a key that already exists
    #[error("User already exists: {0}")]
    Conflict(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Store failure
    #[error("Store failure: {0}")]
    Store(#[from] StoreError),

    /// Anything else the request cannot recover from
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DispatchError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            DispatchError::NotFound => StatusCode::NOT_FOUND,
            DispatchError::InvalidRequest => StatusCode::BAD_REQUEST,
            DispatchError::MissingKey => StatusCode::BAD_REQUEST,
            DispatchError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            DispatchError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            DispatchError::Conflict(_) => StatusCode::CONFLICT,
            DispatchError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DispatchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Plain-text body sent to the client
    pub fn message(&self) -> &'static str {
        match self {
            DispatchError::NotFound => MSG_NOT_FOUND,
            DispatchError::InvalidRequest | DispatchError::MissingKey => MSG_INVALID_REQUEST,
            DispatchError::MethodNotAllowed(_) => MSG_METHOD_NOT_ALLOWED,
            DispatchError::MalformedBody(_) => MSG_INVALID_BODY,
            DispatchError::Conflict(_) => MSG_CONFLICT,
            DispatchError::Store(_) | DispatchError::Internal(_) => MSG_INTERNAL,
        }
    }

    /// Whether the response carries `Content-Type: application/json`.
    ///
    /// Errors raised inside an operation branch do; the unmatched-request
    /// 400, the 405, and internal failures do not.
    pub fn is_json(&self) -> bool {
        match self {
            DispatchError::NotFound
            | DispatchError::MissingKey
            | DispatchError::MalformedBody(_)
            | DispatchError::Conflict(_) => true,
            DispatchError::InvalidRequest
            | DispatchError::MethodNotAllowed(_)
            | DispatchError::Store(_)
            | DispatchError::Internal(_) => false,
        }
    }

    /// Whether this is a server-side failure
    pub fn is_internal(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Shape the error into a response
    pub fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();
        if self.is_json() {
            Response::json(status, Some(message.to_string()))
        } else {
            Response::text(status, message)
        }
    }
}
