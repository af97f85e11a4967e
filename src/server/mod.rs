//! Server core functionality
//!
//! This module contains the HTTP server implementation and its handlers.

pub mod core;
pub mod handlers;

pub use core::Server;
