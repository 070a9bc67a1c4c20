/// Request path utilities
///
/// All functions are pure and return `Cow::Borrowed` when the input needs no
/// change, so the common case allocates nothing.

use std::borrow::Cow;
use std::string::FromUtf8Error;

/// Escapes `decode_uri` leaves encoded: `; / ? : @ & = + $ , #`
const RESERVED_ESCAPES: [&str; 11] = [
    "%3B", "%2F", "%3F", "%3A", "%40", "%26", "%3D", "%2B", "%24", "%2C", "%23",
];

/// Decodes percent-escapes the way a browser's `decodeURI` does
///
/// Escapes that decode to a reserved URI character (`; / ? : @ & = + $ , #`)
/// are kept as-is so that `%2F` never turns into a path separator. Multi-byte
/// escapes must form valid UTF-8; otherwise the path is returned unchanged.
///
/// # Examples
///
/// ```
/// use route_manifest::path::decode_uri;
/// use std::borrow::Cow;
///
/// assert_eq!(decode_uri("/caf%C3%A9"), "/café");
/// assert_eq!(decode_uri("/a%2Fb"), "/a%2Fb");
/// assert!(matches!(decode_uri("/about"), Cow::Borrowed("/about")));
/// ```
pub fn decode_uri(path: &str) -> Cow<'_, str> {
    if !path.contains('%') {
        return Cow::Borrowed(path);
    }

    match try_decode_uri(path) {
        Ok(decoded) if decoded != path => Cow::Owned(decoded),
        _ => Cow::Borrowed(path),
    }
}

/// Decodes the runs between reserved escapes, copying the escapes through
fn try_decode_uri(path: &str) -> Result<String, FromUtf8Error> {
    let mut out = String::with_capacity(path.len());
    let mut run_start = 0;

    for (at, _) in path.match_indices('%') {
        if at >= run_start && is_reserved_escape(path, at) {
            out.push_str(&urlencoding::decode(&path[run_start..at])?);
            out.push_str(&path[at..at + 3]);
            run_start = at + 3;
        }
    }

    out.push_str(&urlencoding::decode(&path[run_start..])?);
    Ok(out)
}

fn is_reserved_escape(path: &str, at: usize) -> bool {
    path.get(at..at + 3).is_some_and(|escape| {
        RESERVED_ESCAPES
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(escape))
    })
}

/// Percent-encodes `?` and `#`, the characters a literal route segment
/// stores encoded
///
/// # Examples
///
/// ```
/// use route_manifest::path::encode_reserved;
///
/// assert_eq!(encode_reserved("/faq?"), "/faq%3F");
/// assert_eq!(encode_reserved("/c#"), "/c%23");
/// ```
pub fn encode_reserved(path: &str) -> Cow<'_, str> {
    if !path.contains(['?', '#']) {
        return Cow::Borrowed(path);
    }
    Cow::Owned(path.replace('?', "%3F").replace('#', "%23"))
}

/// Removes a deployment base from the front of a request path
///
/// A base of `""` or `"/"` is a no-op. The base only matches on a segment
/// boundary, so `/docs` does not strip `/docsearch`. Paths outside the base
/// are returned unchanged.
///
/// # Examples
///
/// ```
/// use route_manifest::path::strip_base;
///
/// assert_eq!(strip_base("/docs/en/about-us", "/docs/"), "/en/about-us");
/// assert_eq!(strip_base("/docs", "/docs"), "");
/// assert_eq!(strip_base("/docsearch", "/docs"), "/docsearch");
/// ```
pub fn strip_base<'a>(path: &'a str, base: &str) -> &'a str {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        return path;
    }

    match path.strip_prefix(base) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    }
}

/// Prefixes `/` when missing
pub fn ensure_leading_slash(path: &str) -> Cow<'_, str> {
    if path.starts_with('/') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("/{}", path))
    }
}
