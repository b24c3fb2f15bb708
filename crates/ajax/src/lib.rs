//! Core request domain for ajax-fetch.
//!
//! This crate contains the client facade, the interceptor pipeline, the request
//! value types and the error types. Transports implement the [`Transport`]
//! trait defined here; they never add request semantics.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* a request is and how it is transformed; infrastructure
//! crates define *how* it is sent.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | `ClientSymbol`, `InterceptorId` |
//! | [`types`] | `RequestInit`, `RequestConfig`, `RequestOverrides`, option enums, `Body` |
//! | [`options`] | `ClientOptions` loaded from JSON or the environment |
//! | [`interceptor`] | Per-direction interceptor registries |
//! | [`base_url`] | The built-in base-URL transform |
//! | [`transport`] | `Transport` and `TransportResponse` port traits |
//! | [`client`] | `AjaxFetch`: facade and pipeline executor |
//! | [`errors`] | `AjaxError`, `ErrorEnvelope`, `tag_error` |

pub mod base_url;
pub mod client;
pub mod errors;
pub mod identifiers;
pub mod interceptor;
pub mod options;
pub mod transport;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use base_url::resolve_base_url;
pub use client::AjaxFetch;
pub use errors::{tag_error, AjaxError, BoxError, ConfigError, ErrorEnvelope};
pub use identifiers::{ClientSymbol, InterceptorId};
pub use interceptor::{Direction, InterceptorRegistry, Interceptors, Transform};
pub use options::{ClientOptions, BASE_URL_ENV, SYMBOL_ENV};
pub use transport::{Transport, TransportResponse};
pub use types::{
    Body, Headers, Method, Referrer, RequestCache, RequestConfig, RequestCredentials, RequestInit,
    RequestMode, RequestOverrides, RequestRedirect,
};
