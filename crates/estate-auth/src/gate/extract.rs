//! Bearer token extraction.

const BEARER_SCHEME: &str = "Bearer";

/// Pull the token out of an `Authorization` header value.
///
/// The scheme name is matched case-insensitively (RFC 7235). Anything other
/// than `Bearer <non-empty token>` yields `None`, which the gate treats as an
/// anonymous request.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let (scheme, token) = header?.trim_start().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }
    let token = token.trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }
    Some(token)
}
