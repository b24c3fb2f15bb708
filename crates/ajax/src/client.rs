//! The client facade and pipeline executor.
//!
//! A request moves through these stages:
//!
//! 1. defaults, overrides and `url` are merged into a [`RequestConfig`];
//! 2. the base-URL transform runs, then every request interceptor, most
//!    recently registered first;
//! 3. the final `url` and [`RequestInit`] go to the [`Transport`] once;
//! 4. every response interceptor runs on the raw response, most recently
//!    registered first;
//! 5. the body is read as text and decoded as JSON; an empty body yields
//!    `None`.
//!
//! Network and body-read failures are tagged with the client symbol and
//! returned as [`AjaxError::Transport`].

use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::{
    resolve_base_url, tag_error, AjaxError, Body, ClientOptions, ClientSymbol, InterceptorRegistry,
    Interceptors, Method, RequestConfig, RequestInit, RequestOverrides, Transport,
    TransportResponse,
};

/// HTTP client with default request options and interceptor chains.
pub struct AjaxFetch<T: Transport> {
    symbol: ClientSymbol,
    base_url: Option<String>,
    defaults: RequestInit,
    interceptors: Interceptors<T::Response>,
    transport: T,
}

impl<T: Transport> AjaxFetch<T> {
    /// Creates a client named `symbol`, or `serial-<n>` when `symbol` is
    /// `None` or blank.
    pub fn of(symbol: Option<ClientSymbol>, transport: T) -> Self {
        Self::with_options(
            ClientOptions {
                symbol,
                ..ClientOptions::default()
            },
            transport,
        )
    }

    /// Creates a client with an auto-generated symbol.
    pub fn new(transport: T) -> Self {
        Self::of(None, transport)
    }

    /// Creates a client from loaded [`ClientOptions`].
    pub fn with_options(options: ClientOptions, transport: T) -> Self {
        let ClientOptions {
            symbol,
            base_url,
            defaults,
        } = options;
        Self {
            symbol: ClientSymbol::or_serial(symbol),
            base_url,
            defaults,
            interceptors: Interceptors::new(),
            transport,
        }
    }

    pub fn symbol(&self) -> &ClientSymbol {
        &self.symbol
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Request options every call starts from.
    pub fn defaults(&self) -> &RequestInit {
        &self.defaults
    }

    /// The request and response interceptor registries.
    pub fn interceptors(&self) -> &Interceptors<T::Response> {
        &self.interceptors
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // -----------------------------------------------------------------------
    // Facade
    // -----------------------------------------------------------------------

    /// Merges the defaults with `overrides`, sets `url`, and runs the pipeline.
    ///
    /// # Errors
    ///
    /// See [`AjaxFetch::intercepted_ajax`].
    pub async fn ajax<R>(
        &self,
        url: &str,
        overrides: RequestOverrides,
    ) -> Result<Option<R>, AjaxError>
    where
        R: DeserializeOwned,
    {
        self.intercepted_ajax(self.merge(url, overrides)).await
    }

    /// Issues a `GET`. Any body in `overrides` is passed through untouched.
    ///
    /// # Errors
    ///
    /// See [`AjaxFetch::intercepted_ajax`].
    pub async fn get<R>(&self, url: &str, overrides: RequestOverrides) -> Result<Option<R>, AjaxError>
    where
        R: DeserializeOwned,
    {
        let mut config = self.merge(url, overrides);
        config.init.method = Method::Get;
        self.intercepted_ajax(config).await
    }

    /// Issues a `POST` carrying `body`.
    ///
    /// # Errors
    ///
    /// See [`AjaxFetch::intercepted_ajax`].
    pub async fn post<R>(
        &self,
        url: &str,
        body: Option<Body>,
        overrides: RequestOverrides,
    ) -> Result<Option<R>, AjaxError>
    where
        R: DeserializeOwned,
    {
        self.send_with_body(url, Method::Post, body, overrides).await
    }

    /// Issues a `PUT` carrying `body`.
    ///
    /// # Errors
    ///
    /// See [`AjaxFetch::intercepted_ajax`].
    pub async fn put<R>(
        &self,
        url: &str,
        body: Option<Body>,
        overrides: RequestOverrides,
    ) -> Result<Option<R>, AjaxError>
    where
        R: DeserializeOwned,
    {
        self.send_with_body(url, Method::Put, body, overrides).await
    }

    /// Issues a `DELETE` carrying `body`.
    ///
    /// # Errors
    ///
    /// See [`AjaxFetch::intercepted_ajax`].
    pub async fn delete<R>(
        &self,
        url: &str,
        body: Option<Body>,
        overrides: RequestOverrides,
    ) -> Result<Option<R>, AjaxError>
    where
        R: DeserializeOwned,
    {
        self.send_with_body(url, Method::Delete, body, overrides).await
    }

    // The verb's body always replaces whatever the overrides carried,
    // including with `None`.
    async fn send_with_body<R>(
        &self,
        url: &str,
        method: Method,
        body: Option<Body>,
        overrides: RequestOverrides,
    ) -> Result<Option<R>, AjaxError>
    where
        R: DeserializeOwned,
    {
        let mut config = self.merge(url, overrides);
        config.init.method = method;
        config.init.body = body;
        self.intercepted_ajax(config).await
    }

    fn merge(&self, url: &str, overrides: RequestOverrides) -> RequestConfig {
        let base_url = overrides.base_url.clone().or_else(|| self.base_url.clone());
        RequestConfig {
            url: url.to_owned(),
            base_url,
            init: self.defaults.clone().merged(overrides),
        }
    }

    // -----------------------------------------------------------------------
    // Pipeline
    // -----------------------------------------------------------------------

    /// Runs a fully formed configuration through the interceptor chains and
    /// the transport. Client defaults are not merged in.
    ///
    /// # Errors
    ///
    /// - [`AjaxError::Interceptor`] if a request or response transform fails;
    ///   the transport is not called for request-side failures.
    /// - [`AjaxError::Transport`] if the network call or body read fails.
    /// - [`AjaxError::Decode`] if a non-empty body is not valid JSON for `R`.
    pub async fn intercepted_ajax<R>(&self, config: RequestConfig) -> Result<Option<R>, AjaxError>
    where
        R: DeserializeOwned,
    {
        let config = self.run_chain(&self.interceptors.request, resolve_base_url(config))?;
        let (url, init) = config.into_parts();

        debug!(symbol = %self.symbol, method = %init.method, %url, "dispatching request");
        let response = self
            .transport
            .perform_request(&url, &init)
            .await
            .map_err(|error| tag_error(&self.symbol, error))?;

        let response = self.run_chain(&self.interceptors.response, response)?;
        let text = response
            .text()
            .await
            .map_err(|error| tag_error(&self.symbol, error))?;
        debug!(symbol = %self.symbol, %url, bytes = text.len(), "response received");

        self.decode(&text)
    }

    fn run_chain<V>(&self, registry: &InterceptorRegistry<V>, value: V) -> Result<V, AjaxError> {
        let direction = registry.direction();
        registry
            .chain()
            .into_iter()
            .try_fold(value, |value, (id, transform)| {
                trace!(symbol = %self.symbol, %direction, %id, "applying interceptor");
                transform(value).map_err(|source| AjaxError::Interceptor {
                    symbol: self.symbol.clone(),
                    direction,
                    id,
                    source,
                })
            })
    }

    fn decode<R>(&self, text: &str) -> Result<Option<R>, AjaxError>
    where
        R: DeserializeOwned,
    {
        if text.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(text)
            .map(Some)
            .map_err(|source| AjaxError::Decode {
                symbol: self.symbol.clone(),
                source,
            })
    }
}

impl<T: Transport> std::fmt::Debug for AjaxFetch<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AjaxFetch")
            .field("symbol", &self.symbol)
            .field("base_url", &self.base_url)
            .field("defaults", &self.defaults)
            .field("interceptors", &self.interceptors)
            .finish_non_exhaustive()
    }
}
