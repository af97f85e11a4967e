//! Credential storage and management
//!
//! Stores one record per identifier with the secret kept only as a PHC-format
//! Argon2id hash. Records are immutable once inserted; re-registering an
//! identifier replaces the whole record.

use argon2::password_hash::{PasswordHash, PasswordHasher, SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, Version};
use log::{info, warn};

use crate::config::{CredentialSeed, ServerConfig};
use crate::error::{AuthError, AuthServerError, StoreError};
use crate::store::ShardedMap;

/// A stored credential. The PHC string carries the salt and KDF parameters
/// alongside the digest, so the record never holds them separately.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub identifier: String,
    pub secret_hash: String,
}

/// In-memory credential store with Argon2id hashing
pub struct CredentialStore {
    records: ShardedMap<CredentialRecord>,
    hasher: Argon2<'static>,
    min_time_cost: u32,
    dummy_hash: String,
}

impl CredentialStore {
    pub fn new(config: &ServerConfig) -> Result<Self, AuthServerError> {
        let params = Params::new(
            config.kdf_memory_kib,
            config.kdf_time_cost,
            config.kdf_parallelism,
            None,
        )
        .map_err(|e| config::ConfigError::Message(format!("invalid Argon2 parameters: {}", e)))?;

        let hasher = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        // Fixed hash used when an identifier is unknown, so the lookup-miss
        // path still pays for a full KDF comparison. Built with the same
        // parameters as real records to keep the timing comparable.
        let dummy_hash = hash_with(&hasher, "dummy")
            .map_err(|e| config::ConfigError::Message(format!("dummy hash failed: {}", e)))?;

        Ok(Self {
            records: ShardedMap::new(config.store_shards, config.store_timeout()),
            hasher,
            min_time_cost: config.kdf_min_time_cost,
            dummy_hash,
        })
    }

    /// Hash a plaintext secret and store the record
    pub async fn register(&self, identifier: &str, secret: &str) -> Result<(), AuthServerError> {
        let secret_hash = hash_with(&self.hasher, secret)
            .map_err(|_| AuthError::BadCredentialRecord(identifier.to_string()))?;
        self.insert(identifier, secret_hash).await
    }

    /// Store a record from an externally supplied PHC hash
    pub async fn register_hashed(
        &self,
        identifier: &str,
        secret_hash: &str,
    ) -> Result<(), AuthServerError> {
        self.check_hash(identifier, secret_hash)?;
        self.insert(identifier, secret_hash.to_string()).await
    }

    /// Load seeded credentials from configuration
    pub async fn seed(&self, seeds: &[CredentialSeed]) -> Result<(), AuthServerError> {
        for seed in seeds {
            match (&seed.secret_hash, &seed.secret) {
                (Some(hash), _) => self.register_hashed(&seed.identifier, hash).await?,
                (None, Some(secret)) => {
                    warn!(
                        "Seeding plaintext secret for '{}'; use secret_hash outside development",
                        seed.identifier
                    );
                    self.register(&seed.identifier, secret).await?;
                }
                (None, None) => {
                    return Err(AuthError::BadCredentialRecord(seed.identifier.clone()).into());
                }
            }
        }
        if !seeds.is_empty() {
            info!("Seeded {} credential record(s)", seeds.len());
        }
        Ok(())
    }

    pub async fn lookup(&self, identifier: &str) -> Result<Option<CredentialRecord>, StoreError> {
        self.records.get(identifier).await
    }

    /// PHC hash for the unknown-identifier comparison path
    pub fn dummy_hash(&self) -> &str {
        &self.dummy_hash
    }

    async fn insert(&self, identifier: &str, secret_hash: String) -> Result<(), AuthServerError> {
        let record = CredentialRecord {
            identifier: identifier.to_string(),
            secret_hash,
        };
        self.records.insert(identifier.to_string(), record).await?;
        Ok(())
    }

    /// Reject hashes that are not parseable Argon2 PHC strings or that were
    /// produced below the configured minimum work factor.
    fn check_hash(&self, identifier: &str, secret_hash: &str) -> Result<(), AuthError> {
        let parsed = PasswordHash::new(secret_hash)
            .map_err(|_| AuthError::BadCredentialRecord(identifier.to_string()))?;
        let params = Params::try_from(&parsed)
            .map_err(|_| AuthError::BadCredentialRecord(identifier.to_string()))?;
        if params.t_cost() < self.min_time_cost {
            return Err(AuthError::BadCredentialRecord(identifier.to_string()));
        }
        Ok(())
    }
}

fn hash_with(hasher: &Argon2<'_>, secret: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(hasher.hash_password(secret.as_bytes(), &salt)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CredentialStore {
        CredentialStore::new(&ServerConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_register_and_lookup() {
        let store = store();
        store.register("alice@example.com", "alice123").await.unwrap();

        let record = store.lookup("alice@example.com").await.unwrap().unwrap();
        assert_eq!(record.identifier, "alice@example.com");
        assert!(record.secret_hash.starts_with("$argon2id$"));
        assert!(!record.secret_hash.contains("alice123"));

        assert!(store.lookup("bob@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_hashed_accepts_own_output() {
        let store = store();
        store.register("alice@example.com", "alice123").await.unwrap();
        let hash = store
            .lookup("alice@example.com")
            .await
            .unwrap()
            .unwrap()
            .secret_hash;

        store.register_hashed("bob@example.com", &hash).await.unwrap();
        assert!(store.lookup("bob@example.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_register_hashed_rejects_garbage() {
        let store = store();
        let result = store.register_hashed("alice@example.com", "not-a-phc-hash").await;
        assert!(matches!(
            result,
            Err(AuthServerError::Auth(AuthError::BadCredentialRecord(_)))
        ));
    }

    #[tokio::test]
    async fn test_register_hashed_enforces_min_time_cost() {
        // Hash produced at t=1 must be rejected by a store demanding t>=2
        let weak = store();
        weak.register("alice@example.com", "alice123").await.unwrap();
        let hash = weak
            .lookup("alice@example.com")
            .await
            .unwrap()
            .unwrap()
            .secret_hash;

        let mut config = ServerConfig::default();
        config.kdf_time_cost = 2;
        config.kdf_min_time_cost = 2;
        let strict = CredentialStore::new(&config).unwrap();

        let result = strict.register_hashed("alice@example.com", &hash).await;
        assert!(matches!(
            result,
            Err(AuthServerError::Auth(AuthError::BadCredentialRecord(_)))
        ));
    }

    #[tokio::test]
    async fn test_seed_mixed_entries() {
        let store = store();
        let hashed = {
            let tmp = self::store();
            tmp.register("x", "y").await.unwrap();
            tmp.lookup("x").await.unwrap().unwrap().secret_hash
        };

        let seeds = vec![
            CredentialSeed {
                identifier: "alice@example.com".to_string(),
                secret_hash: None,
                secret: Some("alice123".to_string()),
            },
            CredentialSeed {
                identifier: "bob@example.com".to_string(),
                secret_hash: Some(hashed),
                secret: None,
            },
        ];

        store.seed(&seeds).await.unwrap();
        assert!(store.lookup("alice@example.com").await.unwrap().is_some());
        assert!(store.lookup("bob@example.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_dummy_hash_is_valid_phc() {
        let store = store();
        assert!(PasswordHash::new(store.dummy_hash()).is_ok());
    }
}
