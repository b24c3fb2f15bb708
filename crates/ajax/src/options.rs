//! Client-level configuration.
//!
//! [`ClientOptions`] describes how an [`AjaxFetch`](crate::AjaxFetch) is built:
//! its identity, an optional instance-wide base URL, and the default
//! [`RequestInit`] that per-call overrides are merged onto. Options can be
//! loaded from JSON or from the environment.

use serde::{Deserialize, Serialize};

use crate::{ClientSymbol, ConfigError, RequestInit};

/// Environment variable holding the instance-wide base URL.
pub const BASE_URL_ENV: &str = "AJAX_FETCH_BASE_URL";

/// Environment variable holding the client symbol.
pub const SYMBOL_ENV: &str = "AJAX_FETCH_SYMBOL";

/// Construction options for a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    /// Identity used to tag errors. `None` allocates a `serial-<n>` symbol.
    pub symbol: Option<ClientSymbol>,
    /// Base URL applied to relative request URLs unless a call supplies its own.
    #[serde(rename = "baseURL")]
    pub base_url: Option<String>,
    /// Default request shape.
    pub defaults: RequestInit,
}

impl ClientOptions {
    /// Parses options from a JSON document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads [`BASE_URL_ENV`] and [`SYMBOL_ENV`] from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds options from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v: &String| !v.is_empty());
        Self {
            symbol: non_empty(SYMBOL_ENV).map(ClientSymbol::from),
            base_url: non_empty(BASE_URL_ENV),
            defaults: RequestInit::default(),
        }
    }

    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<ClientSymbol>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_defaults(mut self, defaults: RequestInit) -> Self {
        self.defaults = defaults;
        self
    }
}
