//! Ajax-fetch transport adapter.
//!
//! Implements the [`ajax::Transport`] trait over `reqwest` and owns the
//! process-wide shared client.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport details live here. The [`ajax`] crate
//! sees only [`ajax::Transport`] and [`ajax::TransportResponse`].
//!
//! ## Shared client
//!
//! [`shared`] returns a lazily initialised `'static` client built on first
//! use. Code that needs its own interceptors or error identity should build an
//! independent client with [`of`] or [`with_options`] instead of registering
//! interceptors on the shared one.

use std::sync::OnceLock;

use ajax::{AjaxFetch, ClientOptions, ClientSymbol};

pub mod transport;

pub use transport::{FetchError, FetchResponse, ReqwestTransport};

/// A client that sends requests with `reqwest`.
pub type Client = AjaxFetch<ReqwestTransport>;

static SHARED: OnceLock<Client> = OnceLock::new();

/// Returns the process-wide shared client, building it on first call.
///
/// The shared client has an auto-generated `serial-<n>` symbol and default
/// options.
///
/// # Errors
///
/// Returns [`FetchError::Request`] if the first initialisation cannot build a
/// `reqwest` client. A later call retries.
pub fn shared() -> Result<&'static Client, FetchError> {
    if let Some(client) = SHARED.get() {
        return Ok(client);
    }
    let client = of(None)?;
    Ok(SHARED.get_or_init(|| client))
}

/// Builds an independent client named `symbol`.
///
/// # Errors
///
/// Returns [`FetchError::Request`] if the `reqwest` client cannot be built.
pub fn of(symbol: Option<ClientSymbol>) -> Result<Client, FetchError> {
    Ok(AjaxFetch::of(symbol, ReqwestTransport::new()?))
}

/// Builds an independent client from [`ClientOptions`].
///
/// # Errors
///
/// Returns [`FetchError::Request`] if the `reqwest` client cannot be built.
pub fn with_options(options: ClientOptions) -> Result<Client, FetchError> {
    Ok(AjaxFetch::with_options(options, ReqwestTransport::new()?))
}
