//! Transport port traits.
//!
//! The client never performs I/O itself. It hands the final URL and
//! [`RequestInit`] to a [`Transport`] exactly once per request and reads the
//! body through [`TransportResponse`]. Concrete transports live in
//! infrastructure crates (see the `fetch` crate for the `reqwest` one).

use async_trait::async_trait;

use crate::{BoxError, RequestInit};

/// Performs a single network request.
///
/// Implementations must not retry: every call is attempted exactly once.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Response type handed to response interceptors.
    type Response: TransportResponse;

    /// Sends `init` to `url` and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be completed (connectivity,
    /// rejected redirect, invalid header, and so on).
    async fn perform_request(
        &self,
        url: &str,
        init: &RequestInit,
    ) -> Result<Self::Response, BoxError>;
}

/// A response whose body can be read as text.
#[async_trait]
pub trait TransportResponse: Send + 'static {
    /// Reads the full body as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be read or is not valid text.
    async fn text(self) -> Result<String, BoxError>;
}
