//! # Gateway Adapter
//!
//! Runs the dispatcher behind an HTTP-API v2 style proxy event: one JSON
//! event in, one JSON response out. This is how the service is driven by an
//! event-based host or by the `invoke` CLI command.

mod errors;
mod event;

pub use errors::{GatewayError, GatewayResult};
pub use event::{HttpDescription, ProxyRequest, ProxyResponse, RequestContext};

use tracing::debug;

use crate::dispatcher::Dispatcher;
use crate::store::UserStore;

/// Dispatch one decoded event
pub async fn invoke<S: UserStore>(
    dispatcher: &Dispatcher<S>,
    event: ProxyRequest,
) -> GatewayResult<ProxyResponse> {
    let request = event.into_request()?;
    let response = dispatcher.dispatch(request).await;
    debug!(status = response.status.as_u16(), "Proxy event handled");
    Ok(ProxyResponse::from(response))
}

/// Dispatch one event given as JSON text, returning the response as JSON text
pub async fn invoke_json<S: UserStore>(
    dispatcher: &Dispatcher<S>,
    event: &str,
) -> GatewayResult<String> {
    let event: ProxyRequest = serde_json::from_str(event)?;
    let response = invoke(dispatcher, event).await?;
    Ok(serde_json::to_string(&response)?)
}
