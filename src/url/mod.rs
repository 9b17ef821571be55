//! URL helpers for building chained requests
//!
//! Chaining treats URLs as plain strings: the propagated value is appended as
//! one more path segment, and output file names come from the last segment.

/// Appends `value` to `base` as a path segment
///
/// An empty value leaves the base untouched. A trailing slash on the base is
/// not doubled.
///
/// # Examples
///
/// ```
/// use getter::url::join_value;
///
/// assert_eq!(join_value("https://example.com/dl", "bar"), "https://example.com/dl/bar");
/// assert_eq!(join_value("https://example.com/dl/", "bar"), "https://example.com/dl/bar");
/// assert_eq!(join_value("https://example.com/dl", ""), "https://example.com/dl");
/// ```
pub fn join_value(base: &str, value: &str) -> String {
    if value.is_empty() {
        return base.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), value)
}

/// Returns the final path segment of `s`
///
/// Trailing slashes are ignored. An empty input yields `"."` and an input made
/// only of slashes yields `"/"`.
///
/// # Examples
///
/// ```
/// use getter::url::basename;
///
/// assert_eq!(basename("/b/bar"), "bar");
/// assert_eq!(basename("https://example.com/pkg/app.tar.gz"), "app.tar.gz");
/// assert_eq!(basename("https://example.com/"), "example.com");
/// ```
pub fn basename(s: &str) -> &str {
    if s.is_empty() {
        return ".";
    }
    let trimmed = s.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    match trimmed.rfind('/') {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    }
}

/// Prefixes `https://` unless the input already names http or https
///
/// Used for URLs typed on the command line, where the scheme is usually left
/// out.
pub fn ensure_scheme(s: &str) -> String {
    if s.starts_with("https://") || s.starts_with("http://") {
        s.to_string()
    } else {
        format!("https://{}", s)
    }
}
