//! roadie-user - CRUD handler for user records
//!
//! A `Dispatcher` maps request verbs onto a `UserStore` and shapes the
//! outcome into an HTTP-style response. The `http_server` and `gateway`
//! modules host it over axum and proxy events respectively.

pub mod cli;
pub mod dispatcher;
pub mod gateway;
pub mod http_server;
pub mod model;
pub mod store;
