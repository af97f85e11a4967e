//! Authentication system
//!
//! Handles credential storage and verification with Argon2id hashing.

pub mod credentials;
pub mod verifier;

pub use credentials::{CredentialRecord, CredentialStore};
pub use verifier::CredentialVerifier;
