//! Error types and the error tagger.
//!
//! [`ErrorEnvelope`] pairs a failure with the [`ClientSymbol`] of the client
//! that produced it, so errors can be attributed when several clients are in
//! use. [`tag_error`] is the only place envelopes are created; it also emits
//! the envelope to the diagnostic sink.
//!
//! [`AjaxError`] is what the client facade returns. Every variant carries the
//! owning client's symbol.

use thiserror::Error;

use crate::{ClientSymbol, Direction, InterceptorId};

/// Type-erased failure payload used by transforms and transports.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ---------------------------------------------------------------------------
// Error envelope
// ---------------------------------------------------------------------------

/// A failure tagged with the identity of the client it came from.
#[derive(Debug, Error)]
#[error("[{symbol}] {error}")]
pub struct ErrorEnvelope {
    symbol: ClientSymbol,
    #[source]
    error: BoxError,
}

impl ErrorEnvelope {
    /// Identity of the client that produced the failure.
    pub fn symbol(&self) -> &ClientSymbol {
        &self.symbol
    }

    /// The underlying failure.
    pub fn error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.error.as_ref()
    }

    /// Consumes the envelope, returning the underlying failure.
    pub fn into_error(self) -> BoxError {
        self.error
    }
}

/// Wraps `error` in an [`ErrorEnvelope`] for `symbol` and logs it at `error`
/// level.
pub fn tag_error(symbol: &ClientSymbol, error: impl Into<BoxError>) -> ErrorEnvelope {
    let envelope = ErrorEnvelope {
        symbol: symbol.clone(),
        error: error.into(),
    };
    tracing::error!(
        symbol = %envelope.symbol,
        error = %envelope.error,
        "ajax request failed"
    );
    envelope
}

// ---------------------------------------------------------------------------
// Request errors
// ---------------------------------------------------------------------------

/// Failure of a single request issued through [`AjaxFetch`](crate::AjaxFetch).
///
/// A call either resolves with a decoded value, resolves with `None` for an
/// empty body, or fails with one of these variants. Network failures are never
/// turned into successful values.
#[derive(Debug, Error)]
pub enum AjaxError {
    /// The network call or the body read failed.
    ///
    /// Produced by: the transport, via [`tag_error`].
    #[error(transparent)]
    Transport(#[from] ErrorEnvelope),

    /// The response body was non-empty but did not decode to the requested type.
    #[error("[{symbol}] Response body is not valid JSON: {source}")]
    Decode {
        /// Identity of the client that issued the request.
        symbol: ClientSymbol,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },

    /// A registered interceptor returned an error. The remaining chain is not run.
    #[error("[{symbol}] {direction} interceptor {id} failed: {source}")]
    Interceptor {
        /// Identity of the client that issued the request.
        symbol: ClientSymbol,
        /// Chain the failing transform was registered on.
        direction: Direction,
        /// Handle of the failing transform.
        id: InterceptorId,
        /// Error returned by the transform.
        #[source]
        source: BoxError,
    },
}

impl AjaxError {
    /// Identity of the client that issued the failing request.
    pub fn symbol(&self) -> &ClientSymbol {
        match self {
            Self::Transport(envelope) => envelope.symbol(),
            Self::Decode { symbol, .. } | Self::Interceptor { symbol, .. } => symbol,
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Client options could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The options document is not valid JSON or has the wrong shape.
    #[error("Client options could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn envelope_carries_symbol_and_error() {
        let envelope = tag_error(&ClientSymbol::from("search"), "connection refused");

        assert_eq!(envelope.symbol(), &ClientSymbol::from("search"));
        assert_eq!(envelope.error().to_string(), "connection refused");
        assert_eq!(envelope.to_string(), "[search] connection refused");
    }

    #[test]
    fn transport_error_reports_envelope_symbol() {
        let error = AjaxError::from(tag_error(&ClientSymbol::from(3_i64), "boom"));

        assert_eq!(error.symbol(), &ClientSymbol::Number(3));
        assert_eq!(error.to_string(), "[3] boom");
    }

    #[test]
    fn interceptor_error_names_direction_and_handle() {
        let error = AjaxError::Interceptor {
            symbol: ClientSymbol::from("api"),
            direction: Direction::Response,
            id: InterceptorId::new(4),
            source: "unauthorised".into(),
        };

        assert_eq!(
            error.to_string(),
            "[api] response interceptor 4 failed: unauthorised"
        );
    }
}
