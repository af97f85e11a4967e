//! Middleware
//!
//! Cross-cutting request concerns for the HTTP layer.

pub mod logging;
