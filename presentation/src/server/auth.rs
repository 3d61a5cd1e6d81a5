//! Bearer-token authorization for the chat endpoint

/// Whether a request carrying `header` may use the API.
///
/// With no configured key the API is open. Otherwise the header must be
/// exactly `Bearer <key>`.
pub fn is_authorized(expected_key: Option<&str>, header: Option<&str>) -> bool {
    match expected_key {
        None => true,
        Some(key) => header.is_some_and(|h| h.strip_prefix("Bearer ") == Some(key)),
    }
}

/// Masked form of an `Authorization` header value for logs.
///
/// The `Bearer ` scheme is dropped; short tokens become `***`, longer ones
/// keep their first four and last two characters.
pub fn mask_authorization(value: &str) -> String {
    let token = strip_bearer(value);
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 6 {
        return "***".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}***{tail}")
}

fn strip_bearer(value: &str) -> &str {
    let trimmed = value.trim_start();
    match trimmed.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim_start(),
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_without_key() {
        assert!(is_authorized(None, None));
        assert!(is_authorized(None, Some("Bearer anything")));
    }

    #[test]
    fn test_requires_exact_bearer() {
        let key = Some("s3cret-key");
        assert!(is_authorized(key, Some("Bearer s3cret-key")));
        assert!(!is_authorized(key, Some("Bearer wrong")));
        assert!(!is_authorized(key, Some("s3cret-key")));
        assert!(!is_authorized(key, None));
    }

    #[test]
    fn test_mask_authorization() {
        assert_eq!(mask_authorization("Bearer abcdefghij"), "abcd***ij");
        assert_eq!(mask_authorization("bearer   abcdefghij"), "abcd***ij");
        assert_eq!(mask_authorization("Bearer abcdef"), "***");
        assert_eq!(mask_authorization("abcdefg"), "abcd***fg");
        assert_eq!(mask_authorization(""), "***");
    }
}
