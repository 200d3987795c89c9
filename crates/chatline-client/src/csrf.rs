use std::borrow::Cow;

/// Look up cookie `name` in a `Cookie` header value and percent-decode it.
///
/// Pairs are separated by `;` and surrounding whitespace is ignored. The
/// first pair whose name matches exactly wins. A value that is not valid
/// percent-encoded UTF-8 is returned as-is.
///
/// ```rust
/// use chatline_client::cookie_value;
///
/// let header = "sessionid=abc123; csrftoken=Zm9v%2Bbar";
/// assert_eq!(cookie_value(header, "csrftoken").as_deref(), Some("Zm9v+bar"));
/// assert_eq!(cookie_value(header, "missing"), None);
/// ```
#[must_use]
pub fn cookie_value(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
        .map(|raw| urlencoding::decode(raw).map_or_else(|_| raw.to_owned(), Cow::into_owned))
}
