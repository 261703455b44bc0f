//! # Dispatch Requests
//!
//! What a host hands the dispatcher: the verb, the route's path parameters,
//! and the raw body text.

use std::collections::HashMap;

use axum::http::Method;

use super::errors::{DispatchError, DispatchResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub path_parameters: HashMap<String, String>,
    pub body: Option<String>,
    /// Why the raw body could not be taken as text, if it could not
    pub body_error: Option<String>,
}

impl Request {
    /// Request with no path parameters and no body
    pub fn new(method: Method) -> Self {
        Self {
            method,
            path_parameters: HashMap::new(),
            body: None,
            body_error: None,
        }
    }

    pub fn with_path_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_parameters.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Raw body bytes as received. An empty payload is no body; bytes that
    /// are not UTF-8 are kept out and reported by `body()`.
    pub fn with_body_bytes(mut self, bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return self;
        }
        match std::str::from_utf8(bytes) {
            Ok(text) => self.body = Some(text.to_string()),
            Err(e) => self.body_error = Some(format!("body is not UTF-8: {}", e)),
        }
        self
    }

    /// Body text, or `MalformedBody` when the payload was not UTF-8
    pub fn body(&self) -> DispatchResult<Option<&str>> {
        match &self.body_error {
            Some(reason) => Err(DispatchError::MalformedBody(reason.clone())),
            None => Ok(self.body.as_deref()),
        }
    }

    /// Path parameter `name`. Present-but-empty still counts as present.
    pub fn path_parameter(&self, name: &str) -> Option<&str> {
        self.path_parameters.get(name).map(String::as_str)
    }
}
