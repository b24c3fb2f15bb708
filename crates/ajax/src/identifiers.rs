//! Newtype identifiers.
//!
//! Two identities exist in this crate: the [`ClientSymbol`] that names a client
//! instance for error attribution, and the [`InterceptorId`] handle returned
//! when a transform is registered. Both are distinct types so that a handle can
//! never be passed where a client identity is expected.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Process-wide counter backing auto-generated client symbols.
static INSTANCE_SERIAL: AtomicU64 = AtomicU64::new(0);

// ---------------------------------------------------------------------------
// Interceptor handle
// ---------------------------------------------------------------------------

/// Opaque handle for a registered interceptor.
///
/// Handles are assigned from a counter owned by each
/// [`InterceptorRegistry`](crate::InterceptorRegistry), so they are unique per
/// direction and per client and are never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InterceptorId(u64);

impl InterceptorId {
    /// Creates a handle from a raw integer.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying integer value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for InterceptorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Client identity
// ---------------------------------------------------------------------------

/// Symbolic identity of a client instance, used to tag errors.
///
/// A symbol is either a caller-supplied string or integer, or an
/// auto-generated `serial-<n>` string. An empty string or the integer `0` is
/// treated as "not supplied" and is replaced by a serial.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClientSymbol {
    /// Integer identity.
    Number(i64),
    /// String identity.
    Text(String),
}

impl ClientSymbol {
    /// Allocates the next `serial-<n>` symbol for this process.
    pub fn next_serial() -> Self {
        let serial = INSTANCE_SERIAL.fetch_add(1, Ordering::Relaxed);
        Self::Text(format!("serial-{serial}"))
    }

    /// Returns `symbol` if it is present and non-blank, otherwise a fresh serial.
    pub fn or_serial(symbol: Option<ClientSymbol>) -> Self {
        match symbol {
            Some(symbol) if !symbol.is_blank() => symbol,
            _ => Self::next_serial(),
        }
    }

    /// Returns `true` for the empty string and for `0`.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Number(n) => *n == 0,
            Self::Text(s) => s.is_empty(),
        }
    }

    /// Returns the string form if this is a [`ClientSymbol::Text`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    /// Returns the integer form if this is a [`ClientSymbol::Number`].
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl std::fmt::Display for ClientSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for ClientSymbol {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ClientSymbol {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ClientSymbol {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn interceptor_id_displays_and_serialises_as_its_integer() {
        let id = InterceptorId::new(12);

        assert_eq!(id.as_u64(), 12);
        assert_eq!(id.to_string(), "12");
        assert_eq!(serde_json::to_string(&id).unwrap(), "12");
    }

    #[test]
    fn serials_are_distinct_and_prefixed() {
        let a = ClientSymbol::next_serial();
        let b = ClientSymbol::next_serial();

        assert_ne!(a, b);
        assert!(a.as_str().is_some_and(|s| s.starts_with("serial-")));
        assert!(b.as_str().is_some_and(|s| s.starts_with("serial-")));
    }

    #[test]
    fn supplied_symbol_is_kept() {
        assert_eq!(
            ClientSymbol::or_serial(Some("billing".into())),
            ClientSymbol::Text("billing".to_owned())
        );
        assert_eq!(
            ClientSymbol::or_serial(Some(7_i64.into())),
            ClientSymbol::Number(7)
        );
    }

    #[test]
    fn blank_symbols_fall_back_to_serial() {
        for blank in [ClientSymbol::from(""), ClientSymbol::from(0_i64)] {
            let symbol = ClientSymbol::or_serial(Some(blank));
            assert!(symbol.as_str().is_some_and(|s| s.starts_with("serial-")));
        }
    }

    #[test]
    fn symbol_deserialises_from_string_or_number() {
        let text: ClientSymbol = serde_json::from_str(r#""api""#).unwrap();
        let number: ClientSymbol = serde_json::from_str("42").unwrap();

        assert_eq!(text, ClientSymbol::Text("api".to_owned()));
        assert_eq!(number, ClientSymbol::Number(42));
        assert_eq!(number.to_string(), "42");
    }
}
