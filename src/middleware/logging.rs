//! Logging middleware
//!
//! Request-level logging for the auth endpoints. Identifiers are logged;
//! secrets and hashes never are, and tokens only as a short prefix at debug.

use log::{debug, info, warn};

/// Log a login attempt before verification
pub fn log_login_attempt(identifier: &str) {
    info!("Login attempt for '{}'", identifier);
}

/// Log a successful login
pub fn log_login_success(identifier: &str, token: &str) {
    info!("Login succeeded for '{}'", identifier);
    debug!("Issued session {}…", token_prefix(token));
}

/// Log a failed login (generic; the response never says why)
pub fn log_login_failure(identifier: &str, reason: &str) {
    warn!("Login failed for '{}': {}", identifier, reason);
}

/// Log a logout
pub fn log_logout(token: &str) {
    debug!("Revoked session {}…", token_prefix(token));
}

fn token_prefix(token: &str) -> &str {
    // Cookie values come from the wire; guard against non-ASCII boundaries
    token.get(..8).unwrap_or(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_prefix_never_exceeds_input() {
        assert_eq!(token_prefix("abc"), "abc");
        assert_eq!(token_prefix("abcdefgh1234"), "abcdefgh");
        assert_eq!(token_prefix(""), "");
    }
}
