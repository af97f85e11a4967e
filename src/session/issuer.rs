//! Session issuance and validation
//!
//! Creates session records on successful verification, answers token
//! validation queries, and revokes sessions on logout. Expired records are
//! dropped lazily when observed; the periodic sweep catches the rest.

use chrono::Utc;

use crate::config::ServerConfig;
use crate::error::StoreError;
use crate::session::record::SessionRecord;
use crate::session::token::generate_token;
use crate::store::ShardedMap;

pub struct SessionIssuer {
    sessions: ShardedMap<SessionRecord>,
    ttl: chrono::Duration,
    sliding_expiry: bool,
}

impl SessionIssuer {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            sessions: ShardedMap::new(config.store_shards, config.store_timeout()),
            ttl: config.session_ttl(),
            sliding_expiry: config.sliding_expiry,
        }
    }

    /// Create a session for the subject and return its token
    pub async fn issue(&self, subject_id: &str) -> Result<String, StoreError> {
        let token = generate_token();
        let now = Utc::now();
        let record = SessionRecord {
            token: token.clone(),
            subject_id: subject_id.to_string(),
            created_at: now,
            expires_at: now + self.ttl,
        };
        self.sessions.insert(token.clone(), record).await?;
        Ok(token)
    }

    /// Resolve a token to its subject, if the session is live.
    ///
    /// Missing and expired tokens both come back as `Ok(None)`. With sliding
    /// expiry enabled, a successful validation pushes the deadline forward by
    /// one TTL.
    pub async fn validate(&self, token: &str) -> Result<Option<String>, StoreError> {
        let Some(record) = self.sessions.get(token).await? else {
            return Ok(None);
        };

        let now = Utc::now();
        if record.is_expired(now) {
            self.sessions.remove(token).await?;
            return Ok(None);
        }

        if self.sliding_expiry {
            let deadline = now + self.ttl;
            self.sessions
                .update(token, |record| record.expires_at = deadline)
                .await?;
        }

        Ok(Some(record.subject_id))
    }

    /// Delete the session if present; idempotent
    pub async fn revoke(&self, token: &str) -> Result<(), StoreError> {
        self.sessions.remove(token).await?;
        Ok(())
    }

    /// Drop every expired record, returning how many were removed
    pub async fn purge_expired(&self) -> Result<usize, StoreError> {
        let now = Utc::now();
        self.sessions.retain(|_, record| !record.is_expired(now)).await
    }

    pub async fn live_sessions(&self) -> Result<usize, StoreError> {
        self.sessions.len().await
    }
}
