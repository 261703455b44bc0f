//! Proxy event wire types
//!
//! Only the members the dispatcher consumes are modelled; everything else in
//! an incoming event is ignored.

use std::collections::{BTreeMap, HashMap};

use axum::http::Method;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::errors::{GatewayError, GatewayResult};
use crate::dispatcher::{Request, Response};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    pub request_context: RequestContext,

    #[serde(default)]
    pub path_parameters: Option<HashMap<String, String>>,

    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub is_base64_encoded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub http: HttpDescription,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpDescription {
    pub method: String,

    #[serde(default)]
    pub path: Option<String>,
}

impl ProxyRequest {
    /// Event for `method` with no parameters or body
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            request_context: RequestContext {
                http: HttpDescription {
                    method: method.into(),
                    path: None,
                },
            },
            path_parameters: None,
            body: None,
            is_base64_encoded: false,
        }
    }

    /// Convert to a dispatcher request, decoding a base64 body if flagged
    pub fn into_request(self) -> GatewayResult<Request> {
        let raw_method = self.request_context.http.method;
        let method = Method::from_bytes(raw_method.as_bytes())
            .map_err(|_| GatewayError::InvalidMethod(raw_method.clone()))?;

        let body = match self.body {
            Some(encoded) if self.is_base64_encoded => {
                Some(String::from_utf8(STANDARD.decode(encoded)?)?)
            }
            other => other,
        };

        Ok(Request {
            method,
            path_parameters: self.path_parameters.unwrap_or_default(),
            body,
            body_error: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl From<Response> for ProxyResponse {
    fn from(response: Response) -> Self {
        let headers = response
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        Self {
            status_code: response.status.as_u16(),
            headers,
            body: response.body,
            is_base64_encoded: false,
        }
    }
}
