//! Dispatch policy
//!
//! Behaviour the request contract leaves to the deployment: which path
//! parameter carries the key, how duplicate creates and malformed bodies are
//! answered, and who assigns identities.

use serde::{Deserialize, Serialize};

/// What Create does when the key already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeyPolicy {
    /// Insert blindly; the store's uniqueness check fails the request (500)
    #[default]
    Defer,
    /// Look the key up first and answer 409
    Reject,
}

/// How an unparseable body is answered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedBodyPolicy {
    /// 400 Invalid request body
    #[default]
    Reject,
    /// Fail the request as an internal error (500)
    Fatal,
}

/// Where a created user's `Sub` comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityPolicy {
    /// The body must carry a non-empty `Sub`
    #[default]
    ClientSupplied,
    /// A v4 UUID is assigned when `Sub` is missing or empty
    GenerateWhenAbsent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchPolicy {
    /// Path parameter holding the user key (default: "id")
    #[serde(default = "default_key_param")]
    pub key_param: String,

    #[serde(default)]
    pub duplicate_key: DuplicateKeyPolicy,

    #[serde(default)]
    pub malformed_body: MalformedBodyPolicy,

    #[serde(default)]
    pub identity: IdentityPolicy,
}

fn default_key_param() -> String {
    "id".to_string()
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            key_param: default_key_param(),
            duplicate_key: DuplicateKeyPolicy::default(),
            malformed_body: MalformedBodyPolicy::default(),
            identity: IdentityPolicy::default(),
        }
    }
}

impl DispatchPolicy {
    pub fn with_duplicate_key(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.duplicate_key = policy;
        self
    }

    pub fn with_malformed_body(mut self, policy: MalformedBodyPolicy) -> Self {
        self.malformed_body = policy;
        self
    }

    pub fn with_identity(mut self, policy: IdentityPolicy) -> Self {
        self.identity = policy;
        self
    }
}
