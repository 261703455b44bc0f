//! # Dispatch Responses
//!
//! HTTP-shaped result of one request: status, headers, optional text body.

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;

use crate::model::User;

pub const APPLICATION_JSON: &str = "application/json";

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl Response {
    /// Response tagged `Content-Type: application/json`
    pub fn json(status: StatusCode, body: Option<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        Self {
            status,
            headers,
            body,
        }
    }

    /// Response with a text body and no content type
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Some(body.into()),
        }
    }

    /// JSON response carrying `user`
    pub fn user(status: StatusCode, user: &User) -> serde_json::Result<Self> {
        Ok(Self::json(status, Some(user.to_json()?)))
    }

    /// Content type header, if set
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Decode the body as a user
    pub fn user_body(&self) -> Option<User> {
        self.body
            .as_deref()
            .and_then(|b| User::from_json(b).ok())
    }
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        let body = match self.body {
            Some(text) => Body::from(text),
            None => Body::empty(),
        };
        (self.status, self.headers, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_response_sets_content_type() {
        let response = Response::json(StatusCode::NO_CONTENT, None);
        assert_eq!(response.content_type(), Some(APPLICATION_JSON));
        assert!(response.body.is_none());
    }

    #[test]
    fn test_text_response_has_no_headers() {
        let response = Response::text(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
        assert!(response.headers.is_empty());
        assert_eq!(response.content_type(), None);
    }

    #[test]
    fn test_user_response_body() {
        let user = User::new("u1").with_field("Name", "Alice");
        let response = Response::user(StatusCode::CREATED, &user).unwrap();
        assert_eq!(response.body.as_deref(), Some(r#"{"Sub":"u1","Name":"Alice"}"#));
        assert_eq!(response.user_body(), Some(user));
    }

    #[test]
    fn test_into_axum_response_keeps_status_and_headers() {
        let response = Response::json(StatusCode::OK, Some("{}".into())).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], APPLICATION_JSON);
    }
}
