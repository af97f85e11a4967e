//! RAX Auth Server
//!
//! A minimal authentication core: Argon2id credential verification and
//! token-based session issuance behind a small HTTP surface.

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod server;
pub mod session;
pub mod store;

pub use server::Server;
