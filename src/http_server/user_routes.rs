//! User resource routes
//!
//! Every verb on `/users` and `/users/:id` is handed to the dispatcher; it
//! decides which are allowed. The `:id` segment is exposed to the
//! dispatcher under the configured key parameter name.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::Method,
    routing::any,
    Router,
};

use crate::dispatcher::{DispatchPolicy, Dispatcher, Request, Response};
use crate::store::SharedStore;

/// State shared by the user routes
#[derive(Clone)]
pub struct UserState {
    store: SharedStore,
    policy: Arc<DispatchPolicy>,
}

impl UserState {
    pub fn new(store: SharedStore, policy: DispatchPolicy) -> Self {
        Self {
            store,
            policy: Arc::new(policy),
        }
    }

    /// Dispatcher owning its own handle to the shared store
    fn dispatcher(&self) -> Dispatcher<SharedStore> {
        Dispatcher::new(Arc::clone(&self.store), (*self.policy).clone())
    }
}

/// Create user routes
pub fn user_routes(state: UserState) -> Router {
    Router::new()
        .route("/users", any(collection_handler))
        .route("/users/:id", any(member_handler))
        .with_state(state)
}

/// `/users`
async fn collection_handler(
    State(state): State<UserState>,
    method: Method,
    body: Bytes,
) -> Response {
    let request = build_request(method, body);
    state.dispatcher().dispatch(request).await
}

/// `/users/:id`
async fn member_handler(
    State(state): State<UserState>,
    method: Method,
    Path(key): Path<String>,
    body: Bytes,
) -> Response {
    let request =
        build_request(method, body).with_path_parameter(state.policy.key_param.clone(), key);
    state.dispatcher().dispatch(request).await
}

fn build_request(method: Method, body: Bytes) -> Request {
    Request::new(method).with_body_bytes(&body)
}
