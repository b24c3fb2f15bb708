//! Request value types.
//!
//! [`RequestInit`] is the transport-facing request shape: everything the
//! network call needs except the URL. [`RequestConfig`] adds the `url` and
//! optional `base_url` that flow through the request interceptor chain, and
//! [`RequestOverrides`] is the partial shape callers pass to the client facade.
//!
//! Option enums serialise to the same kebab-case strings a browser `fetch`
//! uses (`"same-origin"`, `"no-cors"`, `"only-if-cached"`, ...).

use std::collections::{btree_map, BTreeMap};

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

/// Request headers.
///
/// Names are lower-cased on every way in (`insert`, collection, and
/// deserialisation), so lookups are case-insensitive and `Content-Type` and
/// `content-type` can never both be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, returning the previous value.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.as_ref().to_ascii_lowercase(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(&name.to_ascii_lowercase())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates in name order. Names are lower case.
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        headers.extend(iter);
        headers
    }
}

impl<K, V> Extend<(K, V)> for Headers
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BTreeMap::<String, String>::deserialize(deserializer).map(Self::from_iter)
    }
}

// ---------------------------------------------------------------------------
// Option enums
// ---------------------------------------------------------------------------

/// Cache policy hint for the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestCache {
    #[default]
    Default,
    NoStore,
    Reload,
    NoCache,
    ForceCache,
    OnlyIfCached,
}

impl RequestCache {
    /// Returns `true` for policies that ask intermediaries to revalidate.
    pub fn bypasses_cache(self) -> bool {
        matches!(self, Self::NoStore | Self::Reload | Self::NoCache)
    }
}

/// Whether credentials (cookies, authorization) accompany the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestCredentials {
    Omit,
    #[default]
    SameOrigin,
    Include,
}

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl Method {
    /// Returns the upper-case wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cross-origin mode. Carried for parity with browser `fetch`; native
/// transports have no origin to enforce it against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    SameOrigin,
    NoCors,
    #[default]
    Cors,
    Navigate,
}

/// How the transport treats 3xx responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestRedirect {
    /// Follow redirects transparently.
    #[default]
    Follow,
    /// Return the 3xx response to the caller as is.
    Manual,
    /// Fail the request when a 3xx response arrives.
    Error,
}

/// Referrer sent with the request.
///
/// Serialises as `"client"`, `"no-referrer"`, or the URL itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Referrer {
    #[default]
    Client,
    NoReferrer,
    Url(String),
}

impl From<String> for Referrer {
    fn from(value: String) -> Self {
        match value.as_str() {
            "client" => Self::Client,
            "no-referrer" | "" => Self::NoReferrer,
            _ => Self::Url(value),
        }
    }
}

impl From<Referrer> for String {
    fn from(value: Referrer) -> Self {
        match value {
            Referrer::Client => "client".to_owned(),
            Referrer::NoReferrer => "no-referrer".to_owned(),
            Referrer::Url(url) => url,
        }
    }
}

// ---------------------------------------------------------------------------
// Body
// ---------------------------------------------------------------------------

/// Request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum Body {
    /// UTF-8 text, sent verbatim.
    Text(String),
    /// Raw bytes, sent verbatim.
    Bytes(Vec<u8>),
    /// Structured data, serialised to JSON by the transport.
    Json(serde_json::Value),
}

impl From<&str> for Body {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for Body {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

// ---------------------------------------------------------------------------
// Request shapes
// ---------------------------------------------------------------------------

/// Transport options for a single request.
///
/// The [`Default`] value is the baseline every client starts from: a JSON
/// `content-type`, `GET`, `cors` mode, following redirects, and the default
/// cache and credential policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestInit {
    pub cache: RequestCache,
    pub credentials: RequestCredentials,
    pub headers: Headers,
    pub method: Method,
    pub mode: RequestMode,
    pub redirect: RequestRedirect,
    pub referrer: Referrer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
}

impl Default for RequestInit {
    fn default() -> Self {
        let mut headers = Headers::new();
        headers.insert("content-type", "application/json");
        Self {
            cache: RequestCache::Default,
            credentials: RequestCredentials::SameOrigin,
            headers,
            method: Method::Get,
            mode: RequestMode::Cors,
            redirect: RequestRedirect::Follow,
            referrer: Referrer::Client,
            body: None,
        }
    }
}

impl RequestInit {
    /// Applies `overrides` on top of `self`. Every field set in `overrides`
    /// replaces the corresponding field wholesale; `headers` are not merged
    /// key by key.
    #[must_use]
    pub fn merged(mut self, overrides: RequestOverrides) -> Self {
        let RequestOverrides {
            base_url: _,
            cache,
            credentials,
            headers,
            method,
            mode,
            redirect,
            referrer,
            body,
        } = overrides;

        if let Some(cache) = cache {
            self.cache = cache;
        }
        if let Some(credentials) = credentials {
            self.credentials = credentials;
        }
        if let Some(headers) = headers {
            self.headers = headers;
        }
        if let Some(method) = method {
            self.method = method;
        }
        if let Some(mode) = mode {
            self.mode = mode;
        }
        if let Some(redirect) = redirect {
            self.redirect = redirect;
        }
        if let Some(referrer) = referrer {
            self.referrer = referrer;
        }
        if body.is_some() {
            self.body = body;
        }
        self
    }

    /// Returns the header value for `name`, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Sets a header, normalising the name to lower case.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name, value);
    }
}

/// Partial request options supplied per call. Unset fields fall back to the
/// client defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestOverrides {
    #[serde(rename = "baseURL")]
    pub base_url: Option<String>,
    pub cache: Option<RequestCache>,
    pub credentials: Option<RequestCredentials>,
    pub headers: Option<Headers>,
    pub method: Option<Method>,
    pub mode: Option<RequestMode>,
    pub redirect: Option<RequestRedirect>,
    pub referrer: Option<Referrer>,
    pub body: Option<Body>,
}

impl RequestOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn cache(mut self, cache: RequestCache) -> Self {
        self.cache = Some(cache);
        self
    }

    #[must_use]
    pub fn credentials(mut self, credentials: RequestCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Replaces the whole header set. Header names are lower-cased.
    #[must_use]
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.headers = Some(headers.into_iter().collect());
        self
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: RequestMode) -> Self {
        self.mode = Some(mode);
        self
    }

    #[must_use]
    pub fn redirect(mut self, redirect: RequestRedirect) -> Self {
        self.redirect = Some(redirect);
        self
    }

    #[must_use]
    pub fn referrer(mut self, referrer: Referrer) -> Self {
        self.referrer = Some(referrer);
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A request as seen by the request interceptor chain.
///
/// Interceptors receive the configuration by value and return a
/// configuration, so a transform can never alter a value another stage still
/// holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestConfig {
    pub url: String,
    #[serde(
        default,
        rename = "baseURL",
        skip_serializing_if = "Option::is_none"
    )]
    pub base_url: Option<String>,
    #[serde(flatten)]
    pub init: RequestInit,
}

impl RequestConfig {
    /// Creates a configuration for `url` with the baseline [`RequestInit`].
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            base_url: None,
            init: RequestInit::default(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_init(mut self, init: RequestInit) -> Self {
        self.init = init;
        self
    }

    /// Splits into the final URL and the transport options, dropping
    /// `base_url`.
    pub fn into_parts(self) -> (String, RequestInit) {
        (self.url, self.init)
    }
}
