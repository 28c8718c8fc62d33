// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

/// Resolve a potentially relative URL against a base URL string.
///
/// Falls back to the raw `href` when the base cannot be parsed or the join fails.
///
/// # Examples
///
/// ```
/// use diploma_digest::utils::url::resolve;
///
/// assert_eq!(
///     resolve("https://example.com/path/", "doc.pdf"),
///     "https://example.com/path/doc.pdf"
/// );
/// ```
pub fn resolve(base: &str, href: &str) -> String {
    Url::parse(base)
        .and_then(|base| base.join(href))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Prefix a relative link with the portal base URL.
///
/// The result is a plain concatenation, so the same href always yields the
/// same string. Links that are already absolute are returned unchanged.
///
/// # Examples
///
/// ```
/// use diploma_digest::utils::url::join_base;
///
/// assert_eq!(
///     join_base("https://www.parlamento.pt", "/Paginas/X.aspx?BID=1"),
///     "https://www.parlamento.pt/Paginas/X.aspx?BID=1"
/// );
/// ```
pub fn join_base(base: &str, href: &str) -> String {
    if is_absolute(href) {
        href.to_string()
    } else {
        format!("{base}{href}")
    }
}

fn is_absolute(href: &str) -> bool {
    Url::parse(href).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}
