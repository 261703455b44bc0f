//! User record and the request-body form it is built from.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored user.
///
/// `sub` is the primary key. All other members of the JSON object are kept
/// in `profile`, in the order the client sent them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "Sub")]
    pub sub: String,

    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl User {
    /// Create a user with an empty profile
    pub fn new(sub: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            profile: Map::new(),
        }
    }

    /// Builder-style profile member
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.profile.insert(name.into(), value.into());
        self
    }

    /// Parse a user from its JSON text
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Serialize to compact JSON text
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// A user as submitted in a request body.
///
/// The identity member is optional here: on update the path key replaces it,
/// and on create the identity policy decides whether a missing one is
/// acceptable.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserDraft {
    #[serde(rename = "Sub", default)]
    pub sub: Option<String>,

    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl UserDraft {
    /// Parse a request body
    pub fn parse(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }

    /// The identity the client supplied, if any and non-empty
    pub fn supplied_key(&self) -> Option<&str> {
        self.sub.as_deref().filter(|s| !s.is_empty())
    }

    /// Bind the draft to `key`, discarding any identity it carried.
    pub fn with_key(self, key: impl Into<String>) -> User {
        User {
            sub: key.into(),
            profile: self.profile,
        }
    }
}
