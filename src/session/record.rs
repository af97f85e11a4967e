//! Session record
//!
//! One record per live session, keyed by its token. Lifecycle is
//! `Active -> Expired` (time-driven) or `Active -> Revoked` (explicit);
//! both transitions are terminal and remove the record from the store.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub token: String,
    pub subject_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
