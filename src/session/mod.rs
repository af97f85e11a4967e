//! Session management
//!
//! Token generation, session records, and the issue/validate/revoke lifecycle.

pub mod issuer;
pub mod record;
pub mod token;

pub use issuer::SessionIssuer;
pub use record::SessionRecord;
