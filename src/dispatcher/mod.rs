//! # Request Dispatcher
//!
//! Routes a request (method, path key, body) onto the user store and shapes
//! the outcome into an HTTP-style response. Hosts build a `Request`, call
//! `Dispatcher::dispatch`, and translate the `Response` back out.

pub mod errors;
pub mod handler;
pub mod policy;
pub mod request;
pub mod response;

pub use errors::{DispatchError, DispatchResult};
pub use handler::Dispatcher;
pub use policy::{DispatchPolicy, DuplicateKeyPolicy, IdentityPolicy, MalformedBodyPolicy};
pub use request::Request;
pub use response::{Response, APPLICATION_JSON};
