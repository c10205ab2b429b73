//! URL utilities for consistent URL handling
//!
//! Normalizes base URLs so endpoint construction never produces double
//! slashes regardless of how the base URL was configured.

/// Normalize a base URL by removing trailing slashes.
///
/// # Examples
///
/// ```
/// use fraga::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:8000"), "http://localhost:8000");
/// assert_eq!(normalize_base_url("http://localhost:8000/"), "http://localhost:8000");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Construct a complete endpoint URL from a base URL and a path.
///
/// The base URL is normalized and the path's leading slashes are stripped,
/// so both `"/query"` and `"query"` resolve to the same URL.
///
/// # Examples
///
/// ```
/// use fraga::utils::url::build_endpoint_url;
///
/// assert_eq!(
///     build_endpoint_url("http://localhost:8000/", "/query"),
///     "http://localhost:8000/query"
/// );
/// ```
pub fn build_endpoint_url(base_url: &str, path: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let path = path.trim_start_matches('/');
    format!("{}/{}", normalized_base, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_trailing_slashes() {
        assert_eq!(
            normalize_base_url("http://localhost:8000"),
            "http://localhost:8000"
        );
        assert_eq!(
            normalize_base_url("http://localhost:8000/"),
            "http://localhost:8000"
        );
        assert_eq!(
            normalize_base_url("http://localhost:8000///"),
            "http://localhost:8000"
        );
        assert_eq!(normalize_base_url(""), "");
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn build_endpoint_url_joins_cleanly() {
        assert_eq!(
            build_endpoint_url("http://localhost:8000", "query"),
            "http://localhost:8000/query"
        );
        assert_eq!(
            build_endpoint_url("http://localhost:8000/", "query"),
            "http://localhost:8000/query"
        );
        assert_eq!(
            build_endpoint_url("http://localhost:8000", "/query"),
            "http://localhost:8000/query"
        );
        assert_eq!(
            build_endpoint_url("http://localhost:8000///", "//workspaces/abc"),
            "http://localhost:8000/workspaces/abc"
        );
        assert_eq!(
            build_endpoint_url("https://api.example.com/", "/billing/subscription"),
            "https://api.example.com/billing/subscription"
        );
    }
}
