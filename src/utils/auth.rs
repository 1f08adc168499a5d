/// Compare a submitted password against the stored secret.
///
/// Secrets are kept as plain text in the credential registry, so this is a
/// direct byte comparison. It runs in constant time for equal-length inputs.
pub fn verify_password(provided: &str, stored: &str) -> bool {
    provided.len() == stored.len()
        && provided
            .as_bytes()
            .iter()
            .zip(stored.as_bytes().iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_password_valid() {
        assert!(verify_password("secret1", "secret1"));
    }

    #[test]
    fn test_verify_password_invalid() {
        assert!(!verify_password("secret2", "secret1"));
    }

    #[test]
    fn test_verify_password_different_length() {
        assert!(!verify_password("short", "much-longer-secret"));
    }

    #[test]
    fn test_verify_password_case_sensitive() {
        assert!(!verify_password("Secret1", "secret1"));
    }
}
