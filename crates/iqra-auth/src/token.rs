use rand::RngCore;

/// Length of a hex-encoded token key.
pub const TOKEN_KEY_LENGTH: usize = 40;

const TOKEN_SCHEMES: [&str; 2] = ["Token", "Bearer"];

/// Generates a fresh 40-character hex key from 20 random bytes.
pub fn generate_token_key() -> String {
    let mut bytes = [0u8; TOKEN_KEY_LENGTH / 2];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Extracts the key from `Token <key>` or `Bearer <key>`.
///
/// Returns `None` for any other scheme, a missing key, or trailing parts.
pub fn parse_authorization_header(value: &str) -> Option<&str> {
    let mut parts = value.split_whitespace();
    let scheme = parts.next()?;
    let key = parts.next()?;

    if parts.next().is_some() {
        return None;
    }

    TOKEN_SCHEMES
        .iter()
        .any(|s| s.eq_ignore_ascii_case(scheme))
        .then_some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_key_is_hex() {
        let key = generate_token_key();
        assert_eq!(key.len(), TOKEN_KEY_LENGTH);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generated_keys_differ() {
        assert_ne!(generate_token_key(), generate_token_key());
    }

    #[test]
    fn test_parse_token_and_bearer_schemes() {
        assert_eq!(parse_authorization_header("Token abc123"), Some("abc123"));
        assert_eq!(parse_authorization_header("Bearer abc123"), Some("abc123"));
        assert_eq!(parse_authorization_header("token abc123"), Some("abc123"));
    }

    #[test]
    fn test_parse_rejects_malformed_headers() {
        assert_eq!(parse_authorization_header("Token"), None);
        assert_eq!(parse_authorization_header("Basic dXNlcjpwYXNz"), None);
        assert_eq!(parse_authorization_header("Token a b"), None);
        assert_eq!(parse_authorization_header(""), None);
    }
}
