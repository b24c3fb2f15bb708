//! `reqwest`-backed [`Transport`].
//!
//! Maps a [`RequestInit`] onto a `reqwest` request. Options that only make
//! sense inside a browser are translated where a native equivalent exists:
//!
//! | Option | Mapping |
//! |--------|---------|
//! | `redirect` | `Follow` uses the default policy; `Manual` and `Error` use a client with `Policy::none()` |
//! | `cache` | `no-store`, `reload` and `no-cache` add `cache-control`/`pragma: no-cache` unless already set |
//! | `credentials` | `omit` strips `authorization` and `cookie` headers |
//! | `referrer` | a URL value becomes the `referer` header |
//! | `mode` | no native meaning; logged only |

use ajax::{
    BoxError, Body, Method, Referrer, RequestCredentials, RequestInit, RequestRedirect, Transport,
    TransportResponse,
};
use async_trait::async_trait;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, CACHE_CONTROL, CONTENT_TYPE, PRAGMA, REFERER,
};
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::trace;

/// Headers dropped when credentials are omitted.
const CREDENTIAL_HEADERS: [&str; 2] = ["authorization", "cookie"];

/// Failures raised by [`ReqwestTransport`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// The underlying HTTP request failed (connect, TLS, I/O, client build).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A 3xx response arrived for a request made with `redirect: error`.
    #[error("Redirect rejected: {url} answered with {status}")]
    RedirectRejected {
        /// Redirect status code.
        status: u16,
        /// URL that answered with the redirect.
        url: String,
    },

    /// A header name or value cannot be sent over HTTP.
    #[error("Invalid header '{name}'")]
    InvalidHeader {
        /// Offending header name.
        name: String,
    },

    /// A JSON body could not be serialised.
    #[error("Request body could not be serialised: {0}")]
    Body(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Response handed to response interceptors.
#[derive(Debug)]
pub struct FetchResponse {
    inner: reqwest::Response,
}

impl FetchResponse {
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Final URL, after any followed redirects.
    pub fn url(&self) -> &str {
        self.inner.url().as_str()
    }

    /// Returns the wrapped `reqwest` response.
    pub fn into_inner(self) -> reqwest::Response {
        self.inner
    }
}

impl From<reqwest::Response> for FetchResponse {
    fn from(inner: reqwest::Response) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl TransportResponse for FetchResponse {
    async fn text(self) -> Result<String, BoxError> {
        Ok(self.inner.text().await?)
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Sends requests with `reqwest`. Cloning is cheap; clones share connection
/// pools.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    following: reqwest::Client,
    non_following: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a transport with default `reqwest` clients.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Request`] if a client cannot be built (for
    /// example, when the TLS backend fails to initialise).
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            following: reqwest::Client::builder().build()?,
            non_following: reqwest::Client::builder()
                .redirect(Policy::none())
                .build()?,
        })
    }

    /// Uses caller-built clients. `non_following` must not follow redirects.
    pub fn from_clients(following: reqwest::Client, non_following: reqwest::Client) -> Self {
        Self {
            following,
            non_following,
        }
    }

    async fn send(&self, url: &str, init: &RequestInit) -> Result<FetchResponse, FetchError> {
        let client = match init.redirect {
            RequestRedirect::Follow => &self.following,
            RequestRedirect::Manual | RequestRedirect::Error => &self.non_following,
        };
        trace!(mode = ?init.mode, %url, "mode has no native mapping");

        let mut request = client
            .request(to_reqwest_method(init.method), url)
            .headers(build_headers(init)?);
        if let Some(body) = &init.body {
            request = match body {
                Body::Text(text) => request.body(text.clone()),
                Body::Bytes(bytes) => request.body(bytes.clone()),
                Body::Json(value) => request.body(serde_json::to_vec(value)?),
            };
        }

        let response = request.send().await?;
        if init.redirect == RequestRedirect::Error && response.status().is_redirection() {
            return Err(FetchError::RedirectRejected {
                status: response.status().as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(FetchResponse::from(response))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    type Response = FetchResponse;

    async fn perform_request(
        &self,
        url: &str,
        init: &RequestInit,
    ) -> Result<Self::Response, BoxError> {
        Ok(self.send(url, init).await?)
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
        Method::Patch => reqwest::Method::PATCH,
        Method::Head => reqwest::Method::HEAD,
        Method::Options => reqwest::Method::OPTIONS,
    }
}

fn build_headers(init: &RequestInit) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::with_capacity(init.headers.len() + 2);
    for (name, value) in &init.headers {
        if init.credentials == RequestCredentials::Omit
            && CREDENTIAL_HEADERS
                .iter()
                .any(|credential| credential.eq_ignore_ascii_case(name))
        {
            continue;
        }
        let invalid = || FetchError::InvalidHeader { name: name.clone() };
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        headers.insert(header_name, header_value);
    }

    if init.cache.bypasses_cache() {
        let no_cache = HeaderValue::from_static("no-cache");
        if !headers.contains_key(CACHE_CONTROL) {
            headers.insert(CACHE_CONTROL, no_cache.clone());
        }
        if !headers.contains_key(PRAGMA) {
            headers.insert(PRAGMA, no_cache);
        }
    }

    if let Referrer::Url(url) = &init.referrer {
        let value = HeaderValue::from_str(url).map_err(|_| FetchError::InvalidHeader {
            name: REFERER.as_str().to_owned(),
        })?;
        headers.insert(REFERER, value);
    }

    if matches!(init.body, Some(Body::Json(_))) && !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ajax::{ClientOptions, RequestCache, RequestOverrides};
    use reqwest::header::{ACCEPT, AUTHORIZATION, COOKIE};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn default_init_sends_only_content_type() {
        let headers = build_headers(&RequestInit::default()).unwrap();

        assert_eq!(headers.len(), 1);
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn bypassing_cache_adds_no_cache_headers() {
        let init = RequestInit::default().merged(RequestOverrides::new().cache(RequestCache::Reload));

        let headers = build_headers(&init).unwrap();

        assert_eq!(headers[CACHE_CONTROL], "no-cache");
        assert_eq!(headers[PRAGMA], "no-cache");
    }

    #[test]
    fn caller_cache_control_is_kept() {
        let init = RequestInit::default().merged(
            RequestOverrides::new()
                .cache(RequestCache::NoStore)
                .headers([("Cache-Control", "max-age=0")]),
        );

        let headers = build_headers(&init).unwrap();

        assert_eq!(headers[CACHE_CONTROL], "max-age=0");
    }

    #[test]
    fn omitted_credentials_drop_auth_headers() {
        let init = RequestInit::default().merged(
            RequestOverrides::new()
                .credentials(RequestCredentials::Omit)
                .headers([("Authorization", "Bearer t"), ("X-Id", "7")]),
        );

        let headers = build_headers(&init).unwrap();

        assert!(!headers.contains_key("authorization"));
        assert_eq!(headers["x-id"], "7");
    }

    #[test]
    fn omitted_credentials_drop_mixed_case_headers_from_options() {
        let options = ClientOptions::from_json(
            r#"{"defaults":{"credentials":"omit","headers":{"Authorization":"Bearer t","Cookie":"s=1","Accept":"text/plain"}}}"#,
        )
        .unwrap();

        let headers = build_headers(&options.defaults).unwrap();

        assert!(!headers.contains_key(AUTHORIZATION));
        assert!(!headers.contains_key(COOKIE));
        assert_eq!(headers[ACCEPT], "text/plain");
    }

    #[test]
    fn directly_inserted_credential_header_is_stripped() {
        let mut init = RequestInit::default()
            .merged(RequestOverrides::new().credentials(RequestCredentials::Omit));
        init.headers.insert("COOKIE", "s=1");

        let headers = build_headers(&init).unwrap();

        assert!(!headers.contains_key(COOKIE));
    }

    #[test]
    fn referrer_url_becomes_referer_header() {
        let init = RequestInit::default().merged(
            RequestOverrides::new().referrer(Referrer::Url("https://app.example.com/".to_owned())),
        );

        let headers = build_headers(&init).unwrap();

        assert_eq!(headers[REFERER], "https://app.example.com/");
    }

    #[test]
    fn json_body_gets_content_type_when_headers_were_replaced() {
        let init = RequestInit::default().merged(
            RequestOverrides::new()
                .headers([("x-id", "7")])
                .body(json!({ "a": 1 })),
        );

        let headers = build_headers(&init).unwrap();

        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn invalid_header_is_reported_by_name() {
        let init =
            RequestInit::default().merged(RequestOverrides::new().headers([("bad header", "x")]));

        let err = build_headers(&init).unwrap_err();

        assert!(matches!(err, FetchError::InvalidHeader { name } if name == "bad header"));
    }
}
