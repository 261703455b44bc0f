//! User entity
//!
//! The only resource this service manages. A user is a flat JSON record
//! keyed by its `Sub` member; every other member is profile data the
//! service carries without interpreting.

mod user;

pub use user::{User, UserDraft};
