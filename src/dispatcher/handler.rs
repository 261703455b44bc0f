//! # Dispatcher
//!
//! Maps one request onto exactly one store operation and one response.
//!
//! | Method | Path key | Operation |
//! |--------|----------|-----------|
//! | GET    | required | read      |
//! | POST   | ignored  | create    |
//! | PUT    | required | update    |
//! | DELETE | required | delete    |
//!
//! Any other method is answered 405. A GET without a key matches no
//! operation and is answered 400 without a content type.

use axum::http::{Method, StatusCode};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::errors::{DispatchError, DispatchResult};
use super::policy::{DispatchPolicy, DuplicateKeyPolicy, IdentityPolicy, MalformedBodyPolicy};
use super::request::Request;
use super::response::Response;
use crate::model::{User, UserDraft};
use crate::store::UserStore;

/// Request router over a single store handle.
///
/// Holds no state besides the handle and its policy; build one per
/// invocation.
pub struct Dispatcher<S: UserStore> {
    store: S,
    policy: DispatchPolicy,
}

impl<S: UserStore> Dispatcher<S> {
    pub fn new(store: S, policy: DispatchPolicy) -> Self {
        Self { store, policy }
    }

    pub fn with_default_policy(store: S) -> Self {
        Self::new(store, DispatchPolicy::default())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> &DispatchPolicy {
        &self.policy
    }

    /// Handle one request. Never fails: every error becomes a response.
    #[instrument(name = "dispatch", skip(self, request), fields(method = %request.method))]
    pub async fn dispatch(&self, request: Request) -> Response {
        match self.route(&request).await {
            Ok(response) => {
                debug!(status = response.status.as_u16(), "Request handled");
                response
            }
            Err(err) => {
                let err = self.escalate(err);
                if err.is_internal() {
                    error!(status = err.status_code().as_u16(), error = %err, "Request failed");
                } else {
                    warn!(status = err.status_code().as_u16(), error = %err, "Request rejected");
                }
                err.into_response()
            }
        }
    }

    async fn route(&self, request: &Request) -> DispatchResult<Response> {
        let key = request.path_parameter(&self.policy.key_param);

        match request.method {
            Method::GET => {
                let Some(key) = key else {
                    return Err(DispatchError::InvalidRequest);
                };
                let user = self.read(key).await?;
                respond_with(StatusCode::OK, &user)
            }
            Method::POST => {
                let user = self.create(request.body()?).await?;
                respond_with(StatusCode::CREATED, &user)
            }
            Method::PUT => {
                let key = key.ok_or(DispatchError::MissingKey)?;
                let user = self.update(key, request.body()?).await?;
                respond_with(StatusCode::OK, &user)
            }
            Method::DELETE => {
                let key = key.ok_or(DispatchError::MissingKey)?;
                self.delete(key).await?;
                Ok(Response::json(StatusCode::NO_CONTENT, None))
            }
            _ => Err(DispatchError::MethodNotAllowed(request.method.clone())),
        }
    }

    /// Fetch the user stored under `key`.
    pub async fn read(&self, key: &str) -> DispatchResult<User> {
        debug!(key, "Reading user");
        self.store
            .find_by_key(key)
            .await?
            .ok_or(DispatchError::NotFound)
    }

    /// Store the user in `body` and return it as the store kept it.
    pub async fn create(&self, body: Option<&str>) -> DispatchResult<User> {
        let draft = parse_draft(body)?;

        let key = match (draft.supplied_key(), self.policy.identity) {
            (Some(key), _) => key.to_string(),
            (None, IdentityPolicy::GenerateWhenAbsent) => Uuid::new_v4().to_string(),
            (None, IdentityPolicy::ClientSupplied) => {
                return Err(DispatchError::MalformedBody(
                    "body carries no Sub".to_string(),
                ))
            }
        };

        if self.policy.duplicate_key == DuplicateKeyPolicy::Reject
            && self.store.find_by_key(&key).await?.is_some()
        {
            return Err(DispatchError::Conflict(key));
        }

        let user = self.store.insert(draft.with_key(key)).await?;
        info!(key = %user.sub, "User created");
        Ok(user)
    }

    /// Replace the user stored under `key` with `body`.
    ///
    /// `key` is authoritative: any `Sub` in the body is overwritten with it.
    pub async fn update(&self, key: &str, body: Option<&str>) -> DispatchResult<User> {
        if self.store.find_by_key(key).await?.is_none() {
            return Err(DispatchError::NotFound);
        }

        let draft = parse_draft(body)?;
        if let Some(supplied) = draft.supplied_key().filter(|s| *s != key) {
            debug!(key, supplied, "Body identity overridden by path key");
        }

        let user = self.store.replace(draft.with_key(key)).await?;
        info!(key, "User replaced");
        Ok(user)
    }

    /// Remove the user stored under `key`.
    pub async fn delete(&self, key: &str) -> DispatchResult<()> {
        let user = self
            .store
            .find_by_key(key)
            .await?
            .ok_or(DispatchError::NotFound)?;

        self.store.remove(&user).await?;
        info!(key, "User deleted");
        Ok(())
    }

    /// Apply the malformed-body policy
    fn escalate(&self, err: DispatchError) -> DispatchError {
        match err {
            DispatchError::MalformedBody(reason)
                if self.policy.malformed_body == MalformedBodyPolicy::Fatal =>
            {
                DispatchError::Internal(format!("Malformed body: {}", reason))
            }
            other => other,
        }
    }
}

fn parse_draft(body: Option<&str>) -> DispatchResult<UserDraft> {
    let body = body.ok_or_else(|| DispatchError::MalformedBody("body is empty".to_string()))?;
    UserDraft::parse(body).map_err(|e| DispatchError::MalformedBody(e.to_string()))
}

fn respond_with(status: StatusCode, user: &User) -> DispatchResult<Response> {
    Response::user(status, user).map_err(|e| DispatchError::Internal(e.to_string()))
}
