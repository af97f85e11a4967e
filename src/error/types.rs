//! Error types
//!
//! Defines domain-specific error types for each module of the auth server.

use std::fmt;
use std::io;

/// Authentication module errors
///
/// Display impls never include the submitted secret or any stored hash.
#[derive(Debug)]
pub enum AuthError {
    InvalidInput(String),
    Unauthenticated,
    BadCredentialRecord(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidInput(s) => write!(f, "Invalid input: {}", s),
            AuthError::Unauthenticated => write!(f, "Authentication failed"),
            AuthError::BadCredentialRecord(id) => {
                write!(f, "Unusable credential record for identifier: {}", id)
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// Store module errors
#[derive(Debug)]
pub enum StoreError {
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(op) => write!(f, "Store unavailable during: {}", op),
        }
    }
}

impl std::error::Error for StoreError {}

/// General auth server error that encompasses all error types
#[derive(Debug)]
pub enum AuthServerError {
    Auth(AuthError),
    Store(StoreError),
    Config(config::ConfigError),
    IoError(io::Error),
}

impl fmt::Display for AuthServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthServerError::Auth(e) => write!(f, "Authentication error: {}", e),
            AuthServerError::Store(e) => write!(f, "Store error: {}", e),
            AuthServerError::Config(e) => write!(f, "Configuration error: {}", e),
            AuthServerError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for AuthServerError {}

impl From<AuthError> for AuthServerError {
    fn from(error: AuthError) -> Self {
        AuthServerError::Auth(error)
    }
}

impl From<StoreError> for AuthServerError {
    fn from(error: StoreError) -> Self {
        AuthServerError::Store(error)
    }
}

impl From<config::ConfigError> for AuthServerError {
    fn from(error: config::ConfigError) -> Self {
        AuthServerError::Config(error)
    }
}

impl From<io::Error> for AuthServerError {
    fn from(error: io::Error) -> Self {
        AuthServerError::IoError(error)
    }
}
