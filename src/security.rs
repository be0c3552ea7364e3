use subtle::ConstantTimeEq;

/// Constant-time string comparison to prevent timing attacks
/// Use this for comparing API keys and other sensitive values
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Check a presented admin key against the configured one.
///
/// This is the entire authorization model: one shared key, no roles beyond
/// "holds the key". Anyone presenting it gets the full admin surface.
pub fn is_admin(presented: Option<&str>, configured: &str) -> bool {
    match presented {
        Some(key) => constant_time_compare(key, configured),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("secret123", "secret123"));
        assert!(!constant_time_compare("secret123", "secret124"));
        assert!(!constant_time_compare("secret123", "secret12"));
        assert!(!constant_time_compare("", "secret"));
    }

    #[test]
    fn test_is_admin() {
        assert!(is_admin(Some("adminkey"), "adminkey"));
        assert!(!is_admin(Some("wrong"), "adminkey"));
        assert!(!is_admin(None, "adminkey"));
    }
}
