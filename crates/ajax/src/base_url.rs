//! Built-in base-URL request transform.

use crate::RequestConfig;

/// Prefixes a relative `url` with `base_url`.
///
/// URLs starting with `http` or `//` are left alone, as is any configuration
/// without a non-empty `base_url`. No other URL validation happens here.
pub fn resolve_base_url(config: RequestConfig) -> RequestConfig {
    if config.url.starts_with("http") || config.url.starts_with("//") {
        return config;
    }
    let url = match config.base_url.as_deref() {
        Some(base) if !base.is_empty() => format!("{base}{}", config.url),
        _ => return config,
    };
    RequestConfig { url, ..config }
}
